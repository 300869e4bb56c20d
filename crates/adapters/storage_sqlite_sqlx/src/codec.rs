//! Column encoding shared by the repositories.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that SQL
//! string comparison orders them chronologically.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat};

use ladderbot_domain::time::Timestamp;

pub(crate) fn encode_ts(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_ts(raw: &str) -> Result<Timestamp, sqlx::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Parse an id column (snowflake or UUID) into its typed identifier.
pub(crate) fn decode_id<T>(raw: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn decode_u8(raw: i64) -> Result<u8, sqlx::Error> {
    u8::try_from(raw).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}
