//! Support desk operator tooling
//!
//! Wraps the `ticketing` engine with file-backed collaborators:
//! a TOML users file, a JSON ticket store shared between invocations and an
//! administrator notifier that either logs or POSTs to a webhook.

pub mod cli;
pub mod config;
pub mod desk;
pub mod webhook;

pub use cli::{run, Args, Command};
pub use config::DeskConfig;
pub use desk::Desk;
