//! `SQLite` implementation of [`ReportRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use ladderbot_app::ports::ReportRepository;
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::{ChallengeId, GuildId, ReportId};
use ladderbot_domain::report::PendingReport;
use ladderbot_domain::score::Score;
use ladderbot_domain::time::Timestamp;

use crate::codec::{decode_id, decode_ts, decode_u8, encode_ts};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`PendingReport`].
struct Wrapper(PendingReport);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let challenge_id: String = row.try_get("challenge_id")?;
        let guild_id: String = row.try_get("guild_id")?;
        let channel_id: String = row.try_get("channel_id")?;
        let reporter_id: String = row.try_get("reporter_id")?;
        let confirmer_id: String = row.try_get("confirmer_id")?;
        let winner_id: String = row.try_get("winner_id")?;
        let score_high: i64 = row.try_get("score_high")?;
        let score_low: i64 = row.try_get("score_low")?;
        let reported_at: String = row.try_get("reported_at")?;
        let confirm_after: String = row.try_get("confirm_after")?;

        let score = Score::new(decode_u8(score_high)?, decode_u8(score_low)?)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(PendingReport {
            id: decode_id(&id)?,
            challenge_id: decode_id(&challenge_id)?,
            guild_id: decode_id(&guild_id)?,
            channel_id: decode_id(&channel_id)?,
            reporter_id: decode_id(&reporter_id)?,
            confirmer_id: decode_id(&confirmer_id)?,
            winner_id: decode_id(&winner_id)?,
            score,
            reported_at: decode_ts(&reported_at)?,
            confirm_after: decode_ts(&confirm_after)?,
        }))
    }
}

// A newer report for the same challenge replaces the old one, id included,
// so buttons carrying the old report id stop working.
const UPSERT: &str = r"
    INSERT INTO reports
        (id, challenge_id, guild_id, channel_id, reporter_id, confirmer_id,
         winner_id, score_high, score_low, reported_at, confirm_after)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(challenge_id) DO UPDATE SET
        id = excluded.id,
        guild_id = excluded.guild_id,
        channel_id = excluded.channel_id,
        reporter_id = excluded.reporter_id,
        confirmer_id = excluded.confirmer_id,
        winner_id = excluded.winner_id,
        score_high = excluded.score_high,
        score_low = excluded.score_low,
        reported_at = excluded.reported_at,
        confirm_after = excluded.confirm_after
";
const SELECT_BY_ID: &str = "SELECT * FROM reports WHERE id = ?";
const SELECT_DUE: &str = "SELECT * FROM reports WHERE confirm_after <= ? ORDER BY confirm_after";
const DELETE_BY_CHALLENGE: &str = "DELETE FROM reports WHERE challenge_id = ?";
const DELETE_BY_GUILD: &str = "DELETE FROM reports WHERE guild_id = ?";

/// `SQLite`-backed pending report repository.
pub struct SqliteReportRepository {
    pool: SqlitePool,
}

impl SqliteReportRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReportRepository for SqliteReportRepository {
    fn upsert(
        &self,
        report: PendingReport,
    ) -> impl Future<Output = Result<PendingReport, LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(report.id.to_string())
                .bind(report.challenge_id.to_string())
                .bind(report.guild_id.to_string())
                .bind(report.channel_id.to_string())
                .bind(report.reporter_id.to_string())
                .bind(report.confirmer_id.to_string())
                .bind(report.winner_id.to_string())
                .bind(i64::from(report.score.high()))
                .bind(i64::from(report.score.low()))
                .bind(encode_ts(report.reported_at))
                .bind(encode_ts(report.confirm_after))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(report)
        }
    }

    fn get_by_id(
        &self,
        id: ReportId,
    ) -> impl Future<Output = Result<Option<PendingReport>, LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn find_due(
        &self,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<PendingReport>, LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_DUE)
                .bind(encode_ts(now))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn delete_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_CHALLENGE)
                .bind(challenge_id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn delete_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_GUILD)
                .bind(guild_id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
