use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Log level options for the global `--log-level` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl LogLevel {
    /// Directive level understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Parser)]
#[command(name = "lap")]
#[command(about = "lap - polish rough vault notes with a language model")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (defaults to ~/.config/lapidary/lapidary.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enhance one batch of unprocessed inbox notes
    Run {
        /// Vault root (overrides the config file and LAPIDARY_VAULT)
        #[arg(long)]
        vault: Option<PathBuf>,

        /// Most notes to attempt this run (overrides the config file)
        #[arg(long)]
        max_notes: Option<usize>,

        /// List what a run would process without touching any file or
        /// calling any provider
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how the next run would treat one note
    Inspect {
        /// Note path, relative to the vault root
        file: PathBuf,
    },
}
