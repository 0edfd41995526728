use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;

use crate::error::ImportError;

/// A cell as read from the source, before any field mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel date serial number.
    DateSerial(f64),
    Error(String),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The cell as text. Text cells come back verbatim; whole numbers are
    /// rendered without a fractional part so identifiers stored as numbers
    /// do not grow a trailing `.0`.
    pub fn to_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) | RawCell::DateSerial(f) => float_to_text(*f),
            RawCell::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
            RawCell::Error(e) => e.clone(),
        }
    }
}

fn float_to_text(f: f64) -> String {
    // 2^53: beyond this an f64 no longer holds every integer exactly.
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

impl From<&Data> for RawCell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => RawCell::Empty,
            Data::String(s) => RawCell::Text(s.clone()),
            Data::Int(i) => RawCell::Int(*i),
            Data::Float(f) => RawCell::Float(*f),
            Data::Bool(b) => RawCell::Bool(*b),
            Data::DateTime(dt) => RawCell::DateSerial(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
            Data::Error(e) => RawCell::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row number in the source sheet.
    pub line: usize,
    /// Cells indexed by absolute column (column A is 0).
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn cell(&self, column: usize) -> Option<&RawCell> {
        self.cells.get(column)
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

/// One uploaded file, read but not yet mapped.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// Reads an uploaded file, choosing the reader from its extension.
pub fn read_upload(name: &str, bytes: Vec<u8>) -> Result<SourceFile, ImportError> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "csv" | "txt" => crate::csv::read_csv_bytes(name, &bytes),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(name, bytes),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}

pub fn read_path(path: &Path) -> Result<SourceFile, ImportError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    read_upload(&name, bytes)
}

/// Reads the first worksheet of an xlsx/xls/xlsb/ods workbook.
pub fn read_workbook(name: &str, bytes: Vec<u8>) -> Result<SourceFile, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)??;

    // The used range may not start at A1; pad so indices stay absolute.
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let rows = range
        .rows()
        .enumerate()
        .map(|(offset, cells)| {
            let mut raw = vec![RawCell::Empty; first_col as usize];
            raw.extend(cells.iter().map(RawCell::from));
            RawRow {
                line: first_row as usize + offset + 1,
                cells: raw,
            }
        })
        .collect();

    Ok(SourceFile {
        name: name.to_string(),
        rows,
    })
}
