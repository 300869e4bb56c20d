//! Shared application state for axum handlers.

use std::sync::Arc;

use ladderbot_app::ports::{ChallengeRepository, LadderRepository, ReportRepository};
use ladderbot_app::services::challenge_service::ChallengeService;
use ladderbot_app::services::ladder_service::LadderService;

use crate::signature::SignatureVerifier;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch. `Clone` is
/// implemented manually so only the `Arc` wrappers are cloned.
pub struct AppState<LR, CR, RR> {
    /// Ladder membership and rankings.
    pub ladder_service: Arc<LadderService<LR, CR, RR>>,
    /// Challenge lifecycle.
    pub challenge_service: Arc<ChallengeService<LR, CR, RR>>,
    /// Checks that requests really come from Discord.
    pub verifier: Arc<SignatureVerifier>,
}

impl<LR, CR, RR> Clone for AppState<LR, CR, RR> {
    fn clone(&self) -> Self {
        Self {
            ladder_service: Arc::clone(&self.ladder_service),
            challenge_service: Arc::clone(&self.challenge_service),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<LR, CR, RR> AppState<LR, CR, RR>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    /// Create the state from services already shared with background tasks.
    pub fn new(
        ladder_service: Arc<LadderService<LR, CR, RR>>,
        challenge_service: Arc<ChallengeService<LR, CR, RR>>,
        verifier: SignatureVerifier,
    ) -> Self {
        Self {
            ladder_service,
            challenge_service,
            verifier: Arc::new(verifier),
        }
    }
}
