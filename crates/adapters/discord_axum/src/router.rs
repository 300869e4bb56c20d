//! Axum router assembly and the interactions endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use ladderbot_app::ports::{ChallengeRepository, LadderRepository, ReportRepository};

use crate::error::Rejection;
use crate::interactions;
use crate::model::{Interaction, InteractionResponse};
use crate::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves `GET /health` and Discord's `POST /interactions` webhook.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<LR, CR, RR>(state: AppState<LR, CR, RR>) -> Router
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/interactions", post(interaction::<LR, CR, RR>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn interaction<LR, CR, RR>(
    State(state): State<AppState<LR, CR, RR>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, Rejection>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    let (Some(signature), Some(timestamp)) = (header(SIGNATURE_HEADER), header(TIMESTAMP_HEADER))
    else {
        return Err(Rejection::MissingSignature);
    };
    state.verifier.verify(signature, timestamp, &body)?;

    let interaction: Interaction = serde_json::from_slice(&body)?;
    Ok(Json(interactions::handle(&state, &interaction).await))
}
