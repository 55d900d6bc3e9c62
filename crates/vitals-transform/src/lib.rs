//! Row-level cleaning: numeric coercion, mandatory key exclusion and
//! duplicate detection.

pub mod coerce;
pub mod dedupe;
pub mod exclusion;
pub mod processor;
pub mod signature;

pub use coerce::{CoerceOutcome, FieldCoercer, coerce_value, format_decimal, parse_finite};
pub use dedupe::{DuplicateDetector, DuplicateStatus, SeenSet};
pub use exclusion::{Exclusion, KeyPositions, check_mandatory_keys};
pub use processor::{RowOutcome, RowProcessor};
pub use signature::Signature;
