use std::fs;
use std::path::Path;

use blake3::Hasher;
use csv::{ByteRecord, ReaderBuilder};

use crate::errors::ParserError;
use crate::model::{ExtractMetadata, RawRecord, RawTable, REQUIRED_COLUMNS};

/// Reads a headered CSV extract from disk. The returned table carries the path and the
/// blake3 hash of the file contents.
pub fn read_extract(path: &Path) -> Result<RawTable, ParserError> {
    let contents = fs::read(path).map_err(|source| ParserError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut table = parse_bytes(&contents)?;
    if let Some(metadata) = table.metadata.as_mut() {
        metadata.path = Some(path.to_path_buf());
    }
    Ok(table)
}

pub fn parse_extract(content: &str) -> Result<RawTable, ParserError> {
    parse_bytes(content.as_bytes())
}

fn parse_bytes(contents: &[u8]) -> Result<RawTable, ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents);

    let columns: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|name| String::from_utf8_lossy(name).trim().to_string())
        .collect();

    if columns.iter().all(|name| name.is_empty()) {
        return Err(ParserError::MissingHeader);
    }
    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == required) {
            return Err(ParserError::MissingColumn { column: required });
        }
    }

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        // Cells past the header width are dropped; missing trailing cells stay absent.
        let record = RawRecord::from_pairs(
            columns
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.clone(), String::from_utf8_lossy(value).into_owned())),
        );
        records.push(record);
    }

    Ok(RawTable {
        metadata: Some(ExtractMetadata {
            path: None,
            file_hash: compute_hash(contents),
            columns,
        }),
        records,
    })
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    hasher.finalize().to_hex().to_string()
}
