//! CLI subcommand implementations.

pub mod describe;
pub mod remove;
pub mod shell;
pub mod start;
pub mod status;
pub mod stop;
pub mod tree;
