//! Command line configuration

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub(crate) log_format: LogFormat,
}

/// Local storage and display settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Directory holding the device's key-value storage
    #[arg(long, env = "SKYRITING_DATA_DIR", default_value = ".skyriting", global = true)]
    pub(crate) data_dir: PathBuf,

    /// Rupees per US dollar used when displaying prices
    #[arg(long, env = "SKYRITING_INR_RATE", default_value = "83", global = true)]
    pub(crate) inr_rate: Decimal,
}
