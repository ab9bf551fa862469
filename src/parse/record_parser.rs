use super::csv::read_records;
use super::record::{Record, RowError};

/// A row dropped while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Line (1-indexed) on which the row starts
    pub line: usize,
    /// Source text of the row
    pub raw: String,
    pub reason: RowError,
}

/// Parse every row after the first one into entities.
///
/// The first row is the header and is never interpreted, whatever it holds.
/// Rows that fail to parse are returned alongside the entities instead of
/// aborting the load.
pub fn parse_records<T: Record>(source: &str) -> (Vec<T>, Vec<SkippedRow>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for row in read_records(source).into_iter().skip(1) {
        match T::from_fields(&row.fields) {
            Ok(record) => records.push(record),
            Err(reason) => skipped.push(SkippedRow {
                line: row.line,
                raw: row.raw,
                reason,
            }),
        }
    }

    (records, skipped)
}
