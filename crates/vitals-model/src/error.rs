use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid record type name: {0:?}")]
    InvalidRecordTypeName(String),

    #[error("invalid year range: {start}..={end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("duplicate record type in configuration: {0}")]
    DuplicateRecordType(String),

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
