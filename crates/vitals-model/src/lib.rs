//! Shared types for the yearly vital-statistics consolidation pipeline.

pub mod config;
pub mod error;
pub mod ids;
pub mod record_type;
pub mod schema;
pub mod stats;

pub use config::{OutputNames, RunConfig};
pub use error::{ModelError, Result};
pub use ids::{RecordTypeName, Year, YearRange};
pub use record_type::{
    DEFAULT_PRIMARY_CODE, DEFAULT_SECONDARY_CODE, DEFAULT_YEAR_COLUMN, KeyFields, NumericField,
    NumericKind, RecordType, default_record_types,
};
pub use schema::{NormalizedRow, UnifiedSchema, normalize_column_name};
pub use stats::CleanStats;
