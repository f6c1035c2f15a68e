//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hierarchical task time tracker.
///
/// Tracks time against a tree of slash-addressed tasks, through one-shot
/// subcommands or an interactive shell.
#[derive(Debug, Parser)]
#[command(name = "timber", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the task store file, overriding configuration.
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive shell.
    Shell,

    /// Start tracking a task, stopping whichever one was running.
    Start {
        /// Path of the task to start, created if missing.
        path: String,

        /// Offset applied to the start time, e.g. -15m to backdate.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        at: String,
    },

    /// Stop the running task.
    Stop {
        /// Offset applied to the stop time, e.g. -5m to backdate.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        at: String,
    },

    /// Show the running task and the recorded total.
    Status,

    /// Render a subtree with per-task recorded durations.
    Tree {
        /// Path of the subtree to render; defaults to the whole tree.
        #[arg(default_value = "/")]
        path: String,
    },

    /// Remove a task, folding its recorded time into its parent.
    Remove {
        /// Path of the task to remove.
        path: String,
    },

    /// Set a task's description.
    Describe {
        /// Path of the task, created if missing.
        path: String,

        /// New description text.
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn offsets_accept_leading_hyphens() {
        let cli = Cli::parse_from(["timber", "start", "work", "--at", "-15m"]);
        match cli.command {
            Some(Commands::Start { path, at }) => {
                assert_eq!(path, "work");
                assert_eq!(at, "-15m");
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }
}
