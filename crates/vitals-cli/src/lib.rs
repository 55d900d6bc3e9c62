//! Library components of the `vitals` consolidation CLI.

pub mod logging;
pub mod pipeline;
pub mod types;
