//! Output module for exporting records and reporting runs
//!
//! This module handles:
//! - Projecting records onto the configured column schema
//! - Writing the CSV table
//! - Recording and printing run statistics

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{write_csv_file, CsvExporter};
pub use stats::{print_statistics, RunStatistics, UrlSource};
pub use traits::{project_row, RecordExporter};
