//! Adapter error types: REST failures and rejected interaction requests.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ladderbot_domain::error::LadderError;

use crate::signature::SignatureError;

/// Errors returned by the Discord REST client.
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    /// The request could not be sent or its body not decoded.
    #[error("discord request failed")]
    Http(#[from] reqwest::Error),

    /// Discord answered with a non-success status.
    #[error("discord answered {status}: {body}")]
    Api { status: u16, body: String },
}

impl From<DiscordError> for LadderError {
    fn from(err: DiscordError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Why an incoming interaction request was refused before dispatch.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("missing signature headers")]
    MissingSignature,

    #[error("invalid signature")]
    BadSignature(#[from] SignatureError),

    #[error("malformed interaction body")]
    BadBody(#[from] serde_json::Error),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingSignature | Self::BadSignature(_) => StatusCode::UNAUTHORIZED,
            Self::BadBody(_) => StatusCode::BAD_REQUEST,
        };
        tracing::debug!(error = %self, %status, "rejected interaction request");
        (status, self.to_string()).into_response()
    }
}
