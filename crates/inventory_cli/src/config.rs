//! Command-line and environment configuration.
//!
//! # Responsibility
//! - Parse flags (with environment fallbacks) into an [`AppConfig`].
//! - Resolve the colour capability once, at startup.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use inventory_core::LogLevel;
use std::io::IsTerminal;
use std::path::PathBuf;

const DEFAULT_DB_FILE: &str = "inventario.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "inventory", about = "Terminal inventory manager", version)]
pub struct CliArgs {
    #[arg(
        long,
        env = "INVENTORY_DB_PATH",
        value_name = "FILE",
        default_value = DEFAULT_DB_FILE,
        help = "SQLite database file (created when missing)"
    )]
    pub db_path: PathBuf,

    #[arg(
        long,
        env = "INVENTORY_LOG_DIR",
        value_name = "DIR",
        help = "Directory for rolling log files; logging is off when unset"
    )]
    pub log_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "INVENTORY_LOG_LEVEL",
        value_name = "LEVEL",
        help = "trace|debug|info|warn|error (default depends on build mode)"
    )]
    pub log_level: Option<String>,

    #[arg(
        long,
        env = "INVENTORY_COLOR",
        value_enum,
        value_name = "WHEN",
        default_value = "auto",
        help = "Colorize terminal output"
    )]
    pub color: ColorChoice,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// `(level, absolute dir)` when file logging is requested.
    pub logging: Option<(LogLevel, PathBuf)>,
    pub color: bool,
}

impl AppConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let level = match args.log_level.as_deref() {
            Some(raw) => LogLevel::parse(raw)?,
            None => LogLevel::build_default(),
        };

        let logging = match args.log_dir {
            Some(dir) if dir.is_absolute() => Some((level, dir)),
            Some(dir) => {
                let cwd = std::env::current_dir().context("failed to resolve working directory")?;
                Some((level, cwd.join(dir)))
            }
            None => None,
        };

        let color = resolve_color(
            args.color,
            std::io::stdout().is_terminal(),
            std::env::var_os("NO_COLOR").is_some(),
        );

        Ok(Self {
            db_path: args.db_path,
            logging,
            color,
        })
    }
}

fn resolve_color(choice: ColorChoice, stdout_is_terminal: bool, no_color: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => stdout_is_terminal && !no_color,
    }
}
