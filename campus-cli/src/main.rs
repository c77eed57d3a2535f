//! `campus` binary: reads commands from stdin, answers on stdout and logs to
//! stderr.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use campus_cli::{AreaStore, CampusConfig, Interpreter, SystemManager};

/// Campus simulation command interpreter.
#[derive(Parser, Debug)]
#[command(name = "campus")]
#[command(about = "Manage campus services and students from a command stream")]
struct Args {
    /// Configuration file (defaults to ./campus.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory where areas are saved
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn setup_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = CampusConfig::resolve(args.config.as_deref()).context("loading configuration")?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    if args.verbose {
        config.log_level = "debug".to_string();
    }

    setup_tracing(&config.log_level);
    info!(data_dir = %config.data_dir.display(), "starting campus session");

    let manager = SystemManager::new(AreaStore::new(config.data_dir));
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut interpreter = Interpreter::new(stdin.lock(), stdout.lock(), manager);
    interpreter.run().context("command session failed")?;
    Ok(())
}
