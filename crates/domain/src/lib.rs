//! # ladderbot-domain
//!
//! Pure domain model for the ladderbot ranking system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Players** (ladder members with an activity window)
//! - Define **Ladders** (the per-server ordered ranking and the challenge range rule)
//! - Define **Challenges** (a match between two players and its result)
//! - Define **Scores** (best-of-5 set results)
//! - Define **Pending reports** (a reported result waiting for confirmation)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod challenge;
pub mod ladder;
pub mod player;
pub mod report;
pub mod score;
