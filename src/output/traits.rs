//! Exporter trait
//!
//! An exporter projects an ordered record set onto a fixed column list. The
//! columns decide the table shape; which fields a record happens to carry
//! never does.

use crate::record::{Field, Record};
use crate::Result;

/// Trait for record exporters
pub trait RecordExporter {
    /// Writes the header row and one row per record
    ///
    /// # Arguments
    ///
    /// * `columns` - Column order and membership
    /// * `records` - Records in discovery order
    fn export(&mut self, columns: &[Field], records: &[Record]) -> Result<()>;
}

/// Projects one record onto the column list, empty cells for unset fields
pub fn project_row<'r>(record: &'r Record, columns: &[Field]) -> Vec<&'r str> {
    columns.iter().map(|field| record.value(*field)).collect()
}
