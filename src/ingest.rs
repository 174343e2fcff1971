//! CSV ingestion
//!
//! Reads one dataset file into rows keyed by trimmed header name. The
//! dataset mixes UTF-8 exports with legacy Windows-1252 files (German
//! umlauts), so each file is decoded with the first encoding in a fallback
//! chain that accepts every byte.

use crate::error::PipelineError;
use crate::neo4j::models::CsvRow;
use anyhow::{Context, Result};
use encoding_rs::Encoding;
use std::path::Path;

/// UTF-8 first, then Windows-1252 (the WHATWG superset of Latin-1).
pub const DEFAULT_ENCODINGS: &[&Encoding] = &[encoding_rs::UTF_8, encoding_rs::WINDOWS_1252];

/// Read `dir/filename` with the default encoding chain.
pub fn read_table(dir: &Path, filename: &str) -> Result<Vec<CsvRow>> {
    read_table_with(dir, filename, DEFAULT_ENCODINGS)
}

/// Read `dir/filename`, decoding with the first of `encodings` that succeeds.
///
/// Header names and values are trimmed. Short rows are padded with empty
/// values; fields beyond the header are dropped.
pub fn read_table_with(
    dir: &Path,
    filename: &str,
    encodings: &[&'static Encoding],
) -> Result<Vec<CsvRow>> {
    let path = dir.join(filename);
    let bytes =
        std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    let text = decode(&bytes, encodings).ok_or_else(|| PipelineError::Decode {
        file: path.clone(),
        encodings: encodings.iter().map(|e| e.name()).collect(),
    })?;

    parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn decode(bytes: &[u8], encodings: &[&'static Encoding]) -> Option<String> {
    encodings.iter().find_map(|encoding| {
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| match text.strip_prefix('\u{feff}') {
                Some(rest) => rest.to_string(),
                None => text.into_owned(),
            })
    })
}

fn parse(text: &str) -> Result<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: CsvRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = record.get(i).unwrap_or("").trim().to_string();
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
