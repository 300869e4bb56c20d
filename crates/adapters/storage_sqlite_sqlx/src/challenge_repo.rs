//! `SQLite` implementation of [`ChallengeRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use ladderbot_app::ports::ChallengeRepository;
use ladderbot_domain::challenge::Challenge;
use ladderbot_domain::error::{LadderError, NotFoundError};
use ladderbot_domain::id::{ChallengeId, GuildId};

use crate::codec::{decode_id, decode_ts, decode_u8, encode_ts};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Challenge`].
struct Wrapper(Challenge);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Challenge> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let guild_id: String = row.try_get("guild_id")?;
        let challenger_id: String = row.try_get("challenger_id")?;
        let challenged_id: String = row.try_get("challenged_id")?;
        let issued_at: String = row.try_get("issued_at")?;
        let completed_at: Option<String> = row.try_get("completed_at")?;
        let challenger_score: Option<i64> = row.try_get("challenger_score")?;
        let challenged_score: Option<i64> = row.try_get("challenged_score")?;

        Ok(Self(Challenge {
            id: decode_id(&id)?,
            guild_id: decode_id(&guild_id)?,
            challenger_id: decode_id(&challenger_id)?,
            challenged_id: decode_id(&challenged_id)?,
            issued_at: decode_ts(&issued_at)?,
            completed_at: completed_at.as_deref().map(decode_ts).transpose()?,
            challenger_score: challenger_score.map(decode_u8).transpose()?,
            challenged_score: challenged_score.map(decode_u8).transpose()?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO challenges
        (id, guild_id, challenger_id, challenged_id, issued_at,
         completed_at, challenger_score, challenged_score)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM challenges WHERE id = ?";
const SELECT_BY_GUILD: &str =
    "SELECT * FROM challenges WHERE guild_id = ? ORDER BY issued_at, rowid";
const UPDATE: &str = r"
    UPDATE challenges
    SET completed_at = ?, challenger_score = ?, challenged_score = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM challenges WHERE id = ?";
const DELETE_BY_GUILD: &str = "DELETE FROM challenges WHERE guild_id = ?";

/// `SQLite`-backed challenge repository.
pub struct SqliteChallengeRepository {
    pool: SqlitePool,
}

impl SqliteChallengeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ChallengeRepository for SqliteChallengeRepository {
    fn create(
        &self,
        challenge: Challenge,
    ) -> impl Future<Output = Result<Challenge, LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(challenge.id.to_string())
                .bind(challenge.guild_id.to_string())
                .bind(challenge.challenger_id.to_string())
                .bind(challenge.challenged_id.to_string())
                .bind(encode_ts(challenge.issued_at))
                .bind(challenge.completed_at.map(encode_ts))
                .bind(challenge.challenger_score.map(i64::from))
                .bind(challenge.challenged_score.map(i64::from))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(challenge)
        }
    }

    fn get_by_id(
        &self,
        id: ChallengeId,
    ) -> impl Future<Output = Result<Option<Challenge>, LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<Vec<Challenge>, LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_GUILD)
                .bind(guild_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        challenge: Challenge,
    ) -> impl Future<Output = Result<Challenge, LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(challenge.completed_at.map(encode_ts))
                .bind(challenge.challenger_score.map(i64::from))
                .bind(challenge.challenged_score.map(i64::from))
                .bind(challenge.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "Challenge",
                    id: challenge.id.to_string(),
                }
                .into());
            }

            Ok(challenge)
        }
    }

    fn delete(&self, id: ChallengeId) -> impl Future<Output = Result<(), LadderError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
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
