use rust_xlsxwriter::{Workbook, XlsxError};
use umbral_core::TransactionRecord;

use crate::config::RejectionConfig;

pub const STATUS_REJECTED: &str = "Rejected";
pub const COLUMNS: [&str; 4] = ["reference", "status", "rejection_code", "rejection_description"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionRow {
    pub reference: String,
    pub status: &'static str,
    pub rejection_code: String,
    pub rejection_description: String,
}

pub fn build_rows(selected: &[&TransactionRecord], config: &RejectionConfig) -> Vec<RejectionRow> {
    selected
        .iter()
        .map(|record| RejectionRow {
            reference: record.reference.clone(),
            status: STATUS_REJECTED,
            rejection_code: config.rejection_code.clone(),
            rejection_description: config.rejection_description.clone(),
        })
        .collect()
}

/// Every cell is written as a string; references are identifiers.
pub fn to_xlsx(rows: &[RejectionRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, row.reference.as_str())?;
        worksheet.write_string(r, 1, row.status)?;
        worksheet.write_string(r, 2, row.rejection_code.as_str())?;
        worksheet.write_string(r, 3, row.rejection_description.as_str())?;
    }

    workbook.save_to_buffer()
}
