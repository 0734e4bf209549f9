// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `procdog`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procdog",
    version,
    about = "Restart a long-lived process when its heartbeat goes stale.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Procdog.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Procdog.toml")]
    pub config: String,

    /// Evaluate liveness and report the decision; never terminate or
    /// launch anything.
    #[arg(long)]
    pub check: bool,

    /// Parse + validate, print the resolved config, but don't act.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCDOG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
