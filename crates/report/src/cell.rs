use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_ROWS: u32 = 1_048_576;
const MAX_COLS: u16 = 16_384;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid cell reference '{0}'")]
pub struct InvalidCellRef(pub String);

/// A zero-based worksheet coordinate, written and parsed in A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }
}

/// Converts a 0-based column index to letters (0 = A, 25 = Z, 26 = AA).
pub fn col_to_letters(col: u16) -> String {
    let mut letters = String::new();
    let mut n = col as u32;
    loop {
        letters.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = InvalidCellRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCellRef(s.to_string());
        let s_trimmed = s.trim();
        let split = s_trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = s_trimmed.split_at(split);
        if letters.is_empty() || letters.len() > 3 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let col = letters
            .chars()
            .fold(0u32, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
            - 1;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 || row > MAX_ROWS || col >= MAX_COLS as u32 {
            return Err(invalid());
        }

        Ok(CellRef {
            row: row - 1,
            col: col as u16,
        })
    }
}

impl TryFrom<String> for CellRef {
    type Error = InvalidCellRef;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(cell: CellRef) -> Self {
        cell.to_string()
    }
}
