//! Configuration types and CLI options.
//!
//! The [`Config`] struct doubles as the clap CLI surface for the binary and
//! the programmatic configuration for library callers.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use super::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Pipeline configuration.
///
/// Parsed from the command line in the binary; library callers can construct
/// it directly and rely on [`Default`] for everything but the input path.
///
/// # Examples
///
/// ```no_run
/// use ip_spatial_index::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: PathBuf::from("ip_group_city.csv"),
///     workers: 2,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ip_spatial_index",
    about = "Builds a multi-resolution spatial index from an IP geolocation CSV dump."
)]
pub struct Config {
    /// CSV file with IP geolocation records (plain or gzip-compressed)
    pub input: PathBuf,

    /// SQLite database to write the index into
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Capacity of the bounded queue between the parser and the writers
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Number of writer workers draining the queue
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Seconds a worker waits on an empty queue before re-checking shutdown
    #[arg(long, default_value_t = DEFAULT_POP_TIMEOUT_SECS)]
    pub pop_timeout_secs: u64,

    /// Coarsest tile resolution level
    #[arg(long, default_value_t = DEFAULT_MIN_TILE_LEVEL)]
    pub min_level: u8,

    /// Finest tile resolution level
    #[arg(long, default_value_t = DEFAULT_MAX_TILE_LEVEL)]
    pub max_level: u8,

    /// Log a progress line every N documents
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: usize,

    /// Depth of the storage sink's internal submission queue
    #[arg(long, default_value_t = DEFAULT_SINK_QUEUE_DEPTH)]
    pub sink_queue_depth: usize,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("ip_group_city.csv"),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
            pop_timeout_secs: DEFAULT_POP_TIMEOUT_SECS,
            min_level: DEFAULT_MIN_TILE_LEVEL,
            max_level: DEFAULT_MAX_TILE_LEVEL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            sink_queue_depth: DEFAULT_SINK_QUEUE_DEPTH,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the configuration for values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending option if the queue capacity or
    /// worker count is zero, the pop timeout is zero, the tile level range is
    /// inverted, or the finest level exceeds what the grid math supports.
    pub fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("--queue-capacity must be at least 1".into());
        }
        if self.workers == 0 {
            return Err("--workers must be at least 1".into());
        }
        if self.pop_timeout_secs == 0 {
            return Err("--pop-timeout-secs must be at least 1".into());
        }
        if self.min_level > self.max_level {
            return Err(format!(
                "--min-level ({}) must not exceed --max-level ({})",
                self.min_level, self.max_level
            ));
        }
        if self.max_level > MAX_SUPPORTED_TILE_LEVEL {
            return Err(format!(
                "--max-level ({}) must not exceed {}",
                self.max_level, MAX_SUPPORTED_TILE_LEVEL
            ));
        }
        Ok(())
    }

    /// The inclusive range of tile resolution levels to compute per record.
    pub fn tile_levels(&self) -> std::ops::RangeInclusive<u8> {
        self.min_level..=self.max_level
    }
}
