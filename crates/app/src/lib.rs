//! # ladderbot-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `LadderRepository` — load/save a server's ranking
//!   - `ChallengeRepository` — CRUD for challenges
//!   - `ReportRepository` — pending reports awaiting confirmation
//!   - `Notifier` — announce results outside of an interaction
//! - Define **driving/inbound ports** as use-case structs:
//!   - `LadderService` — create, join, leave, rankings, activate
//!   - `ChallengeService` — send, cancel, list, history, report, confirm
//!   - `AutoConfirmWorker` — confirm reports nobody confirmed in time
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `ladderbot-domain` only (plus `tokio::sync` / `tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod auto_confirm;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
