//! # ladderbot-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `ladderbot-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `ladderbot-app` (for port traits) and `ladderbot-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod codec;
pub mod error;
pub mod pool;

pub mod challenge_repo;
pub mod ladder_repo;
pub mod report_repo;

pub use challenge_repo::SqliteChallengeRepository;
pub use error::StorageError;
pub use ladder_repo::SqliteLadderRepository;
pub use pool::{Config, Database};
pub use report_repo::SqliteReportRepository;
