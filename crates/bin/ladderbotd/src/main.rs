//! # ladderbotd — ladderbot daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Register the slash commands with Discord
//! - Spawn the auto-confirm worker
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use ladderbot_adapter_discord_axum::rest::DiscordClient;
use ladderbot_adapter_discord_axum::signature::SignatureVerifier;
use ladderbot_adapter_discord_axum::state::AppState;
use ladderbot_adapter_storage_sqlite_sqlx::{
    SqliteChallengeRepository, SqliteLadderRepository, SqliteReportRepository,
};
use ladderbot_app::auto_confirm::AutoConfirmWorker;
use ladderbot_app::services::Store;
use ladderbot_app::services::challenge_service::ChallengeService;
use ladderbot_app::services::ladder_service::LadderService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let credentials = config.credentials()?;

    // Database
    let db = ladderbot_adapter_storage_sqlite_sqlx::Config::new(config.database_url())
        .build()
        .await?;
    let pool = db.pool().clone();

    // Repositories
    let store = Arc::new(Store::new(
        SqliteLadderRepository::new(pool.clone()),
        SqliteChallengeRepository::new(pool.clone()),
        SqliteReportRepository::new(pool),
    ));

    // Services
    let ladder_service = Arc::new(LadderService::new(Arc::clone(&store)));
    let challenge_service = Arc::new(
        ChallengeService::new(store).with_auto_confirm_after(config.auto_confirm_after()),
    );

    // Discord
    let verifier = SignatureVerifier::from_hex(credentials.public_key)?;
    let discord = DiscordClient::new(
        config.discord.api_base.as_str(),
        credentials.application_id,
        credentials.bot_token,
    )?;
    if config.discord.register_commands {
        if let Err(err) = discord.register_commands(config.command_guild()).await {
            tracing::warn!(error = %err, "failed to register commands");
        }
    }

    // Background worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = AutoConfirmWorker::new(
        Arc::clone(&challenge_service),
        discord,
        config.sweep_interval(),
    );
    let worker = tokio::spawn(worker.run(shutdown_rx));

    // HTTP
    let state = AppState::new(ladder_service, challenge_service, verifier);
    let app = ladderbot_adapter_discord_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "ladderbotd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    worker.await?;
    db.close().await;
    tracing::info!("ladderbotd stopped");

    Ok(())
}

/// Resolve on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
