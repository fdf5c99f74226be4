use csv::{QuoteStyle, WriterBuilder};
use itertools::Itertools;

use crate::domain::record::Record;

pub const COLUMNS: [&str; 8] = [
    "Name",
    "Header Location",
    "Organization",
    "Address Line 1",
    "Address Line 2",
    "Phone",
    "Fax",
    "Certification Details",
];

/// Trims and collapses every whitespace run to a single space.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// One header row plus one row per record. The header names are written bare;
/// every record field is quoted, embedded quotes are doubled.
pub fn to_csv(records: &[Record]) -> anyhow::Result<String> {
    let header = format!("{}\n", COLUMNS.join(","));
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(header.into_bytes());

    for record in records {
        writer.write_record(record.fields().map(clean_text))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn to_json(records: &[Record]) -> anyhow::Result<String> {
    let cleaned: Vec<Record> = records
        .iter()
        .map(|record| record.map_fields(clean_text))
        .collect();

    Ok(serde_json::to_string_pretty(&cleaned)?)
}
