//! End-to-end smoke tests for the full ladderbotd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the interactions endpoint
//! with signed requests via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ed25519_dalek::{Signer, SigningKey};
use http_body_util::BodyExt;
use ladderbot_adapter_discord_axum::router;
use ladderbot_adapter_discord_axum::signature::{
    SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER,
};
use ladderbot_adapter_discord_axum::state::AppState;
use ladderbot_adapter_storage_sqlite_sqlx::{
    Config, SqliteChallengeRepository, SqliteLadderRepository, SqliteReportRepository,
};
use ladderbot_app::services::Store;
use ladderbot_app::services::challenge_service::ChallengeService;
use ladderbot_app::services::ladder_service::LadderService;
use serde_json::{Value, json};
use tower::ServiceExt;

fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[3u8; 32])
}

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> axum::Router {
    let db = Config::new("sqlite::memory:")
        .build()
        .await
        .expect("in-memory database should initialise");

    let pool = db.pool().clone();
    let store = Arc::new(Store::new(
        SqliteLadderRepository::new(pool.clone()),
        SqliteChallengeRepository::new(pool.clone()),
        SqliteReportRepository::new(pool),
    ));
    let public_key = hex::encode(signing_key().verifying_key().as_bytes());
    let verifier = SignatureVerifier::from_hex(&public_key).expect("key should decode");

    let state = AppState::new(
        Arc::new(LadderService::new(Arc::clone(&store))),
        Arc::new(ChallengeService::new(store)),
        verifier,
    );

    router::build(state)
}

fn signed(body: &Value) -> Request<Body> {
    let body = body.to_string();
    let timestamp = "1700000000";
    let signature = signing_key().sign(format!("{timestamp}{body}").as_bytes());
    Request::builder()
        .method("POST")
        .uri("/interactions")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, hex::encode(signature.to_bytes()))
        .header(TIMESTAMP_HEADER, timestamp)
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &axum::Router, body: &Value) -> Value {
    let resp = app.clone().oneshot(signed(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn member(user: u64, permissions: &str) -> Value {
    json!({
        "user": {"id": user.to_string(), "username": format!("player{user}")},
        "permissions": permissions
    })
}

fn command(user: u64, name: &str, sub: &str, options: Value) -> Value {
    json!({
        "type": 2,
        "guild_id": "100",
        "channel_id": "200",
        "member": member(user, "0"),
        "data": {"name": name, "options": [{"name": sub, "type": 1, "options": options}]}
    })
}

fn description(response: &Value) -> &str {
    response["data"]["embeds"][0]["description"]
        .as_str()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Health check & ping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn should_answer_signed_ping() {
    let app = app().await;
    let response = send(&app, &json!({"type": 1})).await;
    assert_eq!(response, json!({"type": 1}));
}

#[tokio::test]
async fn should_reject_request_signed_with_another_key() {
    let app = app().await;
    let body = json!({"type": 1}).to_string();
    let signature = SigningKey::from_bytes(&[4u8; 32]).sign(format!("1{body}").as_bytes());
    let request = Request::builder()
        .method("POST")
        .uri("/interactions")
        .header(SIGNATURE_HEADER, hex::encode(signature.to_bytes()))
        .header(TIMESTAMP_HEADER, "1")
        .body(Body::from(body))
        .unwrap();

    let resp = app.oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Ladder lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_swap_ranks_after_confirmed_upset() {
    let app = app().await;

    let mut create = command(
        1,
        "ladder",
        "create",
        json!([{"name": "are_you_sure", "type": 5, "value": true}]),
    );
    create["member"] = member(1, "32");
    let created = send(&app, &create).await;
    assert_eq!(created["type"], 4);

    for user in [1, 2] {
        let joined = send(&app, &command(user, "ladder", "join", json!([]))).await;
        assert!(description(&joined).contains(&format!("<@{user}> has joined")));
    }

    let challenged = send(
        &app,
        &command(
            2,
            "challenge",
            "someone",
            json!([{"name": "user", "type": 6, "value": "1"}]),
        ),
    )
    .await;
    assert_eq!(challenged["data"]["content"], "<@1>");

    let reported = send(
        &app,
        &command(
            2,
            "challenge",
            "report",
            json!([
                {"name": "versus", "type": 6, "value": "1"},
                {"name": "winner", "type": 6, "value": "2"},
                {"name": "score", "type": 3, "value": "3-1"}
            ]),
        ),
    )
    .await;
    let custom_id = reported["data"]["components"][0]["components"][0]["custom_id"]
        .as_str()
        .expect("report should carry a confirm button")
        .to_string();
    assert!(custom_id.starts_with("confirm:"));

    let confirmed = send(
        &app,
        &json!({
            "type": 3,
            "guild_id": "100",
            "channel_id": "200",
            "member": member(1, "0"),
            "data": {"custom_id": custom_id, "component_type": 2}
        }),
    )
    .await;
    assert_eq!(confirmed["type"], 7);
    assert_eq!(
        description(&confirmed),
        "<@2> has defeated <@1>!\nThey have climbed from 2nd to 1st."
    );

    let rankings = send(&app, &command(1, "ladder", "rankings", json!([]))).await;
    assert_eq!(
        description(&rankings),
        "**1.** <@2>\n**2.** <@1>\n\nPage 1/1"
    );
}

#[tokio::test]
async fn should_refuse_create_without_permission() {
    let app = app().await;

    let response = send(
        &app,
        &command(
            1,
            "ladder",
            "create",
            json!([{"name": "are_you_sure", "type": 5, "value": true}]),
        ),
    )
    .await;

    assert_eq!(
        response["data"]["content"],
        "You need the Manage Server permission to create a ladder."
    );
    assert_eq!(response["data"]["flags"], 64);
}
