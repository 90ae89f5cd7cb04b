//! Command line arguments
//!
//! Global options configure logging and select the queue file; the
//! subcommand says what to do with it. Values missing on the command line
//! may be filled in from the TOML configuration file (see `config.rs`).

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Priority levels used when neither flags nor config name a count
pub const DEFAULT_PRIORITIES: u64 = 10;

#[derive(Parser, Debug, Clone)]
#[command(name = "prioq")]
#[command(about = "Inspect and feed persistent priority queue files")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Queue file (a trailing '/' creates a new file in that directory)
    #[arg(short = 'q', long = "queue", value_name = "FILE")]
    pub queue: Option<PathBuf>,

    /// Number of priority levels (priorities run from 0 to N-1)
    #[arg(short = 'n', long = "priorities", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub priorities: Option<u64>,

    /// Force colored log output
    #[arg(long = "color", overrides_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color", overrides_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    // Set from the config file `color` key when neither flag is given
    #[arg(skip)]
    pub config_color: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add values to the queue
    Enqueue {
        /// Priority of the new values
        #[arg(short = 'p', long = "priority", default_value_t = 0)]
        priority: u64,

        /// Values to add, in order
        #[arg(required = true, value_name = "VALUE")]
        values: Vec<String>,
    },
    /// Remove values and print them, highest priority first
    Dequeue {
        /// Maximum number of values to remove
        #[arg(short = 'C', long = "count", default_value_t = 1)]
        count: usize,
    },
    /// Print the number of stored values
    Size {
        /// Only count this priority
        #[arg(short = 'p', long = "priority")]
        priority: Option<u64>,
    },
    /// Print per-priority sizes
    Stats {
        /// Print as JSON
        #[arg(long = "json")]
        json: bool,
    },
}

impl Args {
    /// Whether log output should be colored
    ///
    /// Flags win over the config file; without either, color follows
    /// whether stderr is a terminal.
    pub fn use_color(&self) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            self.config_color
                .unwrap_or_else(|| std::io::stderr().is_terminal())
        }
    }

    pub fn priorities_or_default(&self) -> u64 {
        self.priorities.unwrap_or(DEFAULT_PRIORITIES)
    }

    /// Queue file to open, falling back to the per-user data directory
    pub fn queue_path(&self) -> Option<PathBuf> {
        self.queue.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join("prioq").join("default.db"))
        })
    }

    /// Log file, treating the magic values `none` and `-` as "no file"
    pub fn effective_log_file(&self) -> Option<&std::path::Path> {
        self.log_file
            .as_deref()
            .filter(|path| !matches!(path.to_str(), Some("none") | Some("-")))
    }
}
