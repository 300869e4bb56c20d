//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use ladderbot_domain::challenge::{Challenge, ChallengeOutcome};
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::{ChallengeId, ChannelId, GuildId, ReportId};
use ladderbot_domain::ladder::Ladder;
use ladderbot_domain::report::PendingReport;
use ladderbot_domain::time::Timestamp;

use crate::ports::{ChallengeRepository, LadderRepository, Notifier, ReportRepository};
use crate::services::Store;

pub(crate) type MemoryStore = Store<InMemoryLadderRepo, InMemoryChallengeRepo, InMemoryReportRepo>;

pub(crate) fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub(crate) fn store() -> Arc<MemoryStore> {
    Arc::new(Store::new(
        InMemoryLadderRepo::default(),
        InMemoryChallengeRepo::default(),
        InMemoryReportRepo::default(),
    ))
}

#[derive(Default)]
pub(crate) struct InMemoryLadderRepo {
    store: Mutex<HashMap<GuildId, Ladder>>,
}

impl LadderRepository for InMemoryLadderRepo {
    fn get(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<Option<Ladder>, LadderError>> + Send {
        let result = self.store.lock().unwrap().get(&guild_id).cloned();
        async { Ok(result) }
    }

    fn save(&self, ladder: Ladder) -> impl Future<Output = Result<Ladder, LadderError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(ladder.guild_id, ladder.clone());
        async { Ok(ladder) }
    }

    fn delete(&self, guild_id: GuildId) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.store.lock().unwrap().remove(&guild_id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub(crate) struct InMemoryChallengeRepo {
    store: Mutex<Vec<Challenge>>,
}

impl ChallengeRepository for InMemoryChallengeRepo {
    fn create(
        &self,
        challenge: Challenge,
    ) -> impl Future<Output = Result<Challenge, LadderError>> + Send {
        self.store.lock().unwrap().push(challenge.clone());
        async { Ok(challenge) }
    }

    fn get_by_id(
        &self,
        id: ChallengeId,
    ) -> impl Future<Output = Result<Option<Challenge>, LadderError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned();
        async { Ok(result) }
    }

    fn find_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<Vec<Challenge>, LadderError>> + Send {
        let result: Vec<Challenge> = self
            .store
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
        let mut store = self.store.lock().unwrap();
        if let Some(existing) = store.iter_mut().find(|c| c.id == challenge.id) {
            *existing = challenge.clone();
        }
        async { Ok(challenge) }
    }

    fn delete(&self, id: ChallengeId) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.store.lock().unwrap().retain(|c| c.id != id);
        async { Ok(()) }
    }

    fn delete_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.store.lock().unwrap().retain(|c| c.guild_id != guild_id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub(crate) struct InMemoryReportRepo {
    store: Mutex<HashMap<ChallengeId, PendingReport>>,
}

impl ReportRepository for InMemoryReportRepo {
    fn upsert(
        &self,
        report: PendingReport,
    ) -> impl Future<Output = Result<PendingReport, LadderError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(report.challenge_id, report.clone());
        async { Ok(report) }
    }

    fn get_by_id(
        &self,
        id: ReportId,
    ) -> impl Future<Output = Result<Option<PendingReport>, LadderError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .values()
            .find(|r| r.id == id)
            .cloned();
        async { Ok(result) }
    }

    fn find_due(
        &self,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<PendingReport>, LadderError>> + Send {
        let mut result: Vec<PendingReport> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.is_due(now))
            .cloned()
            .collect();
        result.sort_by_key(|r| r.confirm_after);
        async { Ok(result) }
    }

    fn delete_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.store.lock().unwrap().remove(&challenge_id);
        async { Ok(()) }
    }

    fn delete_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.store
            .lock()
            .unwrap()
            .retain(|_, r| r.guild_id != guild_id);
        async { Ok(()) }
    }
}

/// Notifier that remembers every announcement.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) sent: Mutex<Vec<(ChannelId, ChallengeOutcome)>>,
}

impl Notifier for RecordingNotifier {
    fn announce_outcome(
        &self,
        channel_id: ChannelId,
        outcome: &ChallengeOutcome,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        self.sent
            .lock()
            .unwrap()
            .push((channel_id, outcome.clone()));
        async { Ok(()) }
    }
}
