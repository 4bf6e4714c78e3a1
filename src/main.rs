mod app;
mod auth;
mod catalog;
mod config;
mod console;
mod db;
mod models;
mod utils;
mod workflows;

use anyhow::{Context, Result};
use app::App;
use config::Config;
use console::Console;
use crossterm::tty::IsTty;
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_logging();

    let config = Config::load()?;
    let conn = db::open(&config.database_path, config.seed_rooms)
        .context("Database connection error")?;
    let verifier = auth::admin_verifier(&config)?;

    let interactive = io::stdin().is_tty();
    let console = Console::new(io::stdin().lock(), io::stdout(), config.max_attempts)
        .with_masked_secrets(interactive);
    let mut app = App::new(conn, console, verifier);
    let res = app.run();

    if let Err(e) = res {
        eprintln!("Application Error: {e:#}");
    }
    Ok(())
}

/// Sends `tracing` output to stderr so it never interleaves with the menus.
/// `RUST_LOG` selects the level, defaulting to warnings.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
