//! CLI argument definitions for userload.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use userload_store::StoreConfig;

#[derive(Parser)]
#[command(
    name = "userload",
    version,
    about = "Import users from a CSV file into PostgreSQL",
    long_about = "Import users from a CSV file into PostgreSQL.\n\n\
                  Each data row (name, surname, email) is validated, normalized,\n\
                  and inserted unless a user with the same email already exists.\n\
                  Use --dry-run to run every check without writing to the database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import users from a CSV file.
    Load(LoadArgs),

    /// Create the users table and exit without processing any file.
    CreateTable(ConnectionArgs),
}

#[derive(Parser)]
pub struct LoadArgs {
    /// CSV file to import (name, surname, email; the first line is a header).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Run every check and report outcomes without writing to the database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write a JSON run report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConnectionArgs {
    /// PostgreSQL user name.
    #[arg(short = 'u', long = "user")]
    pub user: String,

    /// PostgreSQL password.
    #[arg(
        short = 'p',
        long = "password",
        env = "PGPASSWORD",
        hide_env_values = true
    )]
    pub password: String,

    /// Database server host.
    #[arg(long = "host", default_value = "localhost")]
    pub host: String,

    /// Database server port.
    #[arg(long = "port", default_value_t = 5432)]
    pub port: u16,

    /// Database name.
    #[arg(short = 'd', long = "database", default_value = "userload")]
    pub database: String,
}

impl ConnectionArgs {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
