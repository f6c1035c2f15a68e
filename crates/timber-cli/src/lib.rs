//! Timber CLI library.
//!
//! This crate provides the command-line interface for the timber task
//! tracker.

mod cli;
pub mod commands;
mod config;
mod session;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use session::{Session, StartOutcome, StopOutcome};
