//! Output generation for consolidated record types.
//!
//! - **Consolidated dataset**: one CSV per record type, streamed row by row
//! - **Quality report**: long-format CSV aggregating every record type of a run

pub mod consolidated;
pub mod error;
pub mod quality;
pub mod staging;

pub use consolidated::ConsolidationWriter;
pub use error::{ReportError, Result};
pub use quality::{
    REPORT_HEADER, ReportRow, Section, build_report_rows, write_quality_report, write_report,
};
pub use staging::part_path;
