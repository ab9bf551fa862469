use super::csv::write_record;
use super::record::Record;

/// Serialize a header row followed by one row per entity, in slice order
pub fn serialize_records<T: Record>(records: &[T]) -> String {
    let mut out = String::new();
    write_record(&mut out, T::HEADER);
    for record in records {
        write_record(&mut out, &record.to_fields());
    }
    out
}

/// Serialize just the header row
pub fn serialize_header(header: &[&str]) -> String {
    let mut out = String::new();
    write_record(&mut out, header);
    out
}
