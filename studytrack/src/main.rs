//! studytrack - collaborative study tracker CLI
//!
//! Record study sessions, track streaks, and compare progress with a
//! study group.

mod cli;
mod commands;
mod render;
mod timer;

use anyhow::{Context, Result};
use clap::Parser;
use studytrack_core::{Config, Database};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Logging goes to the XDG state dir; stdout stays clean for reports
    let _log_guard = studytrack_core::logging::init(&config.logging).ok();

    tracing::info!("studytrack starting");

    // Open database
    let db_path = config.database_path();
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    commands::run(&db, &config, cli.command)
}
