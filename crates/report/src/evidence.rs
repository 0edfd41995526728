use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;
use umbral_core::TransactionRecord;

use crate::{dated_file_name, RenderedReport, ReportError};

pub const FILE_PREFIX: &str = "Evidencias_Clientes_Observados";
pub const SHEET_NAME: &str = "Evidencias";
pub const HEADERS: [&str; 6] = [
    "DOCUMENTO",
    "NUMERO_DOCUMENTO",
    "NOMBRE",
    "REFERENCIA",
    "MONTO",
    "ARCHIVO_ORIGEN",
];

const AMOUNT_COL: u16 = 4;
const WIDTH_PADDING: usize = 5;

/// Writes the classified records as a single-sheet workbook, one row per
/// record, with each column sized to its longest value.
pub fn render_evidence(
    records: &[TransactionRecord],
    today: NaiveDate,
) -> Result<RenderedReport, ReportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let text_cells = [
            (0, &record.document_type),
            (1, &record.document_number),
            (2, &record.holder_name),
            (3, &record.reference),
            (5, &record.source_file),
        ];
        for (col, value) in text_cells {
            // Identifiers stay text so leading zeros survive.
            worksheet.write_string(row, col, value.as_str())?;
            let width = &mut widths[col as usize];
            *width = (*width).max(value.chars().count());
        }

        if let Some(amount) = record.amount {
            worksheet.write_number_with_format(row, AMOUNT_COL, amount.to_f64(), &amount_format)?;
            let width = &mut widths[AMOUNT_COL as usize];
            *width = (*width).max(amount.to_string().len());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, (width + WIDTH_PADDING) as f64)?;
    }

    let bytes = workbook.save_to_buffer()?;
    info!(rows = records.len(), size = bytes.len(), "Rendered evidence export");

    Ok(RenderedReport {
        file_name: dated_file_name(FILE_PREFIX, today),
        bytes,
    })
}
