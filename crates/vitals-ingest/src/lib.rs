//! Year-file ingestion: discovery, header unification and row normalization.

pub mod discovery;
pub mod error;
pub mod normalize;
pub mod reader;
pub mod schema;

pub use discovery::{YearFile, discover_year_files, list_csv_files, year_file_stem};
pub use error::{IngestError, Result};
pub use normalize::{HeaderIndex, RawRecord};
pub use reader::YearFileReader;
pub use schema::{HeaderProblem, UnifiedInputs, read_header, unify_schema};
