use std::io::Read;

use crate::error::ImportError;
use crate::source::{RawCell, RawRow, SourceFile};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Picks `;` when the first line has more semicolons than commas, as
/// spreadsheet exports in comma-decimal locales do.
pub fn detect_delimiter(data: &[u8]) -> u8 {
    let first_line = data.split(|b| *b == b'\n').next().unwrap_or_default();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

pub fn read_csv<R: Read>(name: &str, data: R, delimiter: u8) -> Result<SourceFile, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 1);
        rows.push(RawRow {
            line,
            cells: record
                .iter()
                .map(|field| RawCell::Text(field.to_string()))
                .collect(),
        });
    }

    Ok(SourceFile {
        name: name.to_string(),
        rows,
    })
}

pub fn read_csv_bytes(name: &str, data: &[u8]) -> Result<SourceFile, ImportError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    read_csv(name, data, detect_delimiter(data))
}
