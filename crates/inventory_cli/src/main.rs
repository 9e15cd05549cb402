//! Inventory manager entry point.
//!
//! # Responsibility
//! - Resolve configuration, start file logging, and prepare the database.
//! - Hand stdin/stdout to the interactive menu session.
//!
//! # Invariants
//! - A database that cannot be prepared at startup is reported, not fatal.
//!   The menu still runs and each operation reports its own storage error.

mod config;
mod menu;

use anyhow::{Context, Result};
use clap::Parser;
use config::{AppConfig, CliArgs};
use inventory_core::{init_logging, Palette, Store};
use log::{info, warn};
use menu::Session;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    let config = AppConfig::from_args(CliArgs::parse())?;

    if let Some((level, dir)) = &config.logging {
        init_logging(*level, dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok version={} color={}",
        inventory_core::core_version(),
        config.color
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(
        Store::new(&config.db_path),
        Palette::new(config.color),
        stdin.lock(),
        stdout.lock(),
    )
    .context("terminal I/O failed")?;

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

/// Prepares `store`, then runs the menu loop over `input`/`output`.
fn run_session<R: BufRead, W: Write>(
    store: Store,
    palette: Palette,
    input: R,
    mut output: W,
) -> io::Result<()> {
    if let Err(err) = store.ensure_ready() {
        warn!(
            "event=db_prepare module=cli status=error path={} error={err}",
            store.path().display()
        );
        let message = format!("Error: database error: {err}");
        writeln!(output, "{}", palette.error(&message))?;
    }
    Session::new(store, palette, input, output).run()
}
