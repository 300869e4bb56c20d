//! # ladderbot-adapter-discord-axum
//!
//! Discord adapter built on [axum](https://docs.rs/axum) and
//! [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Serve Discord's **interactions endpoint**: verify the Ed25519 request
//!   signature, answer pings, route slash commands and component clicks
//!   into application service calls (driving adapter)
//! - Render service results as Discord messages: embeds, buttons and
//!   select menus whose `custom_id` carries all the state a click needs
//! - Talk to the **Discord REST API**: register the slash commands and post
//!   channel messages; implements the app's `Notifier` port (driven adapter)
//!
//! ## Dependency rule
//! Depends on `ladderbot-app` (for port traits and services) and
//! `ladderbot-domain` (for domain types used in rendering). Never leaks
//! axum or Discord wire types into the domain.

pub mod commands;
pub mod components;
pub mod error;
pub mod interactions;
pub mod model;
pub mod render;
pub mod rest;
pub mod router;
pub mod signature;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
