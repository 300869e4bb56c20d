//! In-memory repositories and interaction builders for this crate's tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use ed25519_dalek::SigningKey;
use serde_json::{Value, json};

use ladderbot_app::ports::{ChallengeRepository, LadderRepository, ReportRepository};
use ladderbot_app::services::Store;
use ladderbot_app::services::challenge_service::ChallengeService;
use ladderbot_app::services::ladder_service::LadderService;
use ladderbot_domain::challenge::Challenge;
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::{ChallengeId, GuildId, ReportId, UserId};
use ladderbot_domain::ladder::Ladder;
use ladderbot_domain::report::PendingReport;
use ladderbot_domain::time::{self, Timestamp};

use crate::model::{Interaction, InteractionResponse};
use crate::signature::SignatureVerifier;
use crate::state::AppState;

/// Guild every test interaction comes from.
pub(crate) const GUILD: GuildId = GuildId::new(10);

#[derive(Default)]
pub(crate) struct MemLadders(Mutex<HashMap<GuildId, Ladder>>);

impl LadderRepository for MemLadders {
    fn get(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<Option<Ladder>, LadderError>> + Send {
        let result = self.0.lock().unwrap().get(&guild_id).cloned();
        async { Ok(result) }
    }

    fn save(&self, ladder: Ladder) -> impl Future<Output = Result<Ladder, LadderError>> + Send {
        self.0.lock().unwrap().insert(ladder.guild_id, ladder.clone());
        async { Ok(ladder) }
    }

    fn delete(&self, guild_id: GuildId) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.0.lock().unwrap().remove(&guild_id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub(crate) struct MemChallenges(Mutex<Vec<Challenge>>);

impl ChallengeRepository for MemChallenges {
    fn create(
        &self,
        challenge: Challenge,
    ) -> impl Future<Output = Result<Challenge, LadderError>> + Send {
        self.0.lock().unwrap().push(challenge.clone());
        async { Ok(challenge) }
    }

    fn get_by_id(
        &self,
        id: ChallengeId,
    ) -> impl Future<Output = Result<Option<Challenge>, LadderError>> + Send {
        let result = self.0.lock().unwrap().iter().find(|c| c.id == id).cloned();
        async { Ok(result) }
    }

    fn find_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<Vec<Challenge>, LadderError>> + Send {
        let result: Vec<Challenge> = self
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.guild_id == guild_id)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn update(
        &self,
        challenge: Challenge,
    ) -> impl Future<Output = Result<Challenge, LadderError>> + Send {
        for existing in self.0.lock().unwrap().iter_mut() {
            if existing.id == challenge.id {
                *existing = challenge.clone();
            }
        }
        async { Ok(challenge) }
    }

    fn delete(&self, id: ChallengeId) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.0.lock().unwrap().retain(|c| c.id != id);
        async { Ok(()) }
    }

    fn delete_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.0.lock().unwrap().retain(|c| c.guild_id != guild_id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub(crate) struct MemReports(Mutex<HashMap<ChallengeId, PendingReport>>);

impl ReportRepository for MemReports {
    fn upsert(
        &self,
        report: PendingReport,
    ) -> impl Future<Output = Result<PendingReport, LadderError>> + Send {
        self.0
            .lock()
            .unwrap()
            .insert(report.challenge_id, report.clone());
        async { Ok(report) }
    }

    fn get_by_id(
        &self,
        id: ReportId,
    ) -> impl Future<Output = Result<Option<PendingReport>, LadderError>> + Send {
        let result = self.0.lock().unwrap().values().find(|r| r.id == id).cloned();
        async { Ok(result) }
    }

    fn find_due(
        &self,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<PendingReport>, LadderError>> + Send {
        let result: Vec<PendingReport> = self
            .0
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.is_due(now))
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn delete_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.0.lock().unwrap().remove(&challenge_id);
        async { Ok(()) }
    }

    fn delete_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.0.lock().unwrap().retain(|_, r| r.guild_id != guild_id);
        async { Ok(()) }
    }
}

pub(crate) type TestState = AppState<MemLadders, MemChallenges, MemReports>;

pub(crate) fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

pub(crate) fn app_state() -> TestState {
    let store = Arc::new(Store::new(
        MemLadders::default(),
        MemChallenges::default(),
        MemReports::default(),
    ));
    let verifier = SignatureVerifier::new(signing_key().verifying_key());
    AppState::new(
        Arc::new(LadderService::new(Arc::clone(&store))),
        Arc::new(ChallengeService::new(store)),
        verifier,
    )
}

/// Create the test guild's ladder and join `ids` in order.
pub(crate) async fn join_all(state: &TestState, ids: &[u64]) {
    let now = time::now();
    state.ladder_service.create_ladder(GUILD, now).await.unwrap();
    for id in ids {
        state
            .ladder_service
            .join(GUILD, UserId::new(*id), &format!("u{id}"), now)
            .await
            .unwrap();
    }
}

fn member(user: u64) -> Value {
    json!({"user": {"id": user.to_string(), "username": format!("u{user}")}})
}

/// Command `data` for `/{command} {sub}` with the given subcommand options.
pub(crate) fn subcommand(command: &str, sub: &str, options: Value) -> Value {
    json!({
        "name": command,
        "options": [{"name": sub, "type": 1, "options": options}]
    })
}

/// A command invoked in a DM.
pub(crate) fn command(data: Value) -> Interaction {
    serde_json::from_value(json!({
        "type": 2,
        "channel_id": "20",
        "user": {"id": "1", "username": "u1"},
        "data": data
    }))
    .unwrap()
}

/// A command invoked by `user` in the test guild.
pub(crate) fn guild_command(user: u64, data: Value) -> Interaction {
    serde_json::from_value(json!({
        "type": 2,
        "guild_id": GUILD.to_string(),
        "channel_id": "20",
        "member": member(user),
        "data": data
    }))
    .unwrap()
}

/// A component click by `user` in the test guild.
pub(crate) fn click(user: u64, data: Value) -> Interaction {
    serde_json::from_value(json!({
        "type": 3,
        "guild_id": GUILD.to_string(),
        "channel_id": "20",
        "member": member(user),
        "data": data
    }))
    .unwrap()
}

pub(crate) fn content(response: &InteractionResponse) -> &str {
    response
        .data
        .as_ref()
        .and_then(|data| data.content.as_deref())
        .unwrap()
}

pub(crate) fn description(response: &InteractionResponse) -> &str {
    response.data.as_ref().unwrap().embeds[0]
        .description
        .as_deref()
        .unwrap()
}
