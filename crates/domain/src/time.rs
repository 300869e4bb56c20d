//! Time and timestamp helpers.

use chrono::{DateTime, Duration, Utc};

/// UTC timestamp used for activity, issue and completion times.
pub type Timestamp = DateTime<Utc>;

/// Days without challenge activity after which a player becomes inactive.
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Days before the same two players may challenge each other again.
pub const REMATCH_COOLDOWN_DAYS: i64 = 7;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Length of the activity window.
#[must_use]
pub fn activity_window() -> Duration {
    Duration::days(ACTIVITY_WINDOW_DAYS)
}

/// Length of the rematch cooldown.
#[must_use]
pub fn rematch_cooldown() -> Duration {
    Duration::days(REMATCH_COOLDOWN_DAYS)
}
