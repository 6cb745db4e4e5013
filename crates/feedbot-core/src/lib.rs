//! Core logic for Feedbot, a suggestion-box relay bot.
//!
//! This crate is platform-agnostic. Discord lives behind the
//! [`ChatPort`](messaging::port::ChatPort) trait implemented in the adapter crate.

pub mod bot;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod relay;
pub mod store;

pub use errors::{Error, Result};
