use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use timber_cli::commands::{describe, remove, shell, start, status, stop, tree};
use timber_cli::{Cli, Commands, Config, Session};
use timber_core::TimeValue;

/// Load config and bind a session to the store file, honoring a path
/// override from the command line.
fn open_session(cli: &Cli) -> Result<Session> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let store_path = cli.store.clone().unwrap_or(config.store_path);
    Ok(Session::open(store_path))
}

fn parse_offset(at: &str) -> Result<TimeValue> {
    Ok(at.parse()?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Shell) => {
            let mut session = open_session(&cli)?;
            let stdin = std::io::stdin();
            shell::run(&mut stdin.lock(), &mut stdout, &mut session)?;
        }
        Some(Commands::Start { path, at }) => {
            let mut session = open_session(&cli)?;
            start::run(&mut stdout, &mut session, path, parse_offset(at)?)?;
        }
        Some(Commands::Stop { at }) => {
            let mut session = open_session(&cli)?;
            stop::run(&mut stdout, &mut session, parse_offset(at)?)?;
        }
        Some(Commands::Status) => {
            let session = open_session(&cli)?;
            status::run(&mut stdout, &session)?;
        }
        Some(Commands::Tree { path }) => {
            let mut session = open_session(&cli)?;
            tree::run(&mut stdout, &mut session, path)?;
        }
        Some(Commands::Remove { path }) => {
            let mut session = open_session(&cli)?;
            remove::run(&mut stdout, &mut session, path)?;
        }
        Some(Commands::Describe { path, text }) => {
            let mut session = open_session(&cli)?;
            describe::run(&mut stdout, &mut session, path, text)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
