//! Configuration errors
//!
//! Gameplay itself never fails; only loading settings and content can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Table '{table}' must not be empty")]
    EmptyTable { table: &'static str },

    #[error("Unknown call-to-action category: {id}")]
    UnknownCategory { id: String },

    #[error("Invalid duration for {field}: {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}
