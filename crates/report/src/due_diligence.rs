//! Fills the due-diligence form template.
//!
//! The template is read with calamine and its formulas and cell values are
//! copied into a fresh workbook; the record table is then written on the
//! first sheet. Cell styling and merged ranges of the template are not
//! carried over.

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};
use umbral_core::TransactionRecord;

use crate::cell::CellRef;
use crate::{dated_file_name, RenderedReport, ReportError};

pub const FILE_PREFIX: &str = "Formato_Due_Diligence";
pub const DEFAULT_TEMPLATE_PATH: &str = "plantillas/Formato_Due_Diligence_Template.xlsx";

/// Document type, document number and holder name.
const TABLE_COLUMNS: u16 = 3;

/// Where the form expects its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    pub template_path: PathBuf,
    /// First cell of the record table; rows grow downward from here.
    pub table_origin: CellRef,
    pub area_cell: Option<CellRef>,
    pub area_label: String,
    pub date_cell: Option<CellRef>,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            table_origin: CellRef::new(12, 0),
            area_cell: Some(CellRef::new(8, 2)),
            area_label: "Operaciones".to_string(),
            date_cell: Some(CellRef::new(10, 2)),
        }
    }
}

impl TemplateLayout {
    /// True when `(row, col)` lies in the record table columns at or below
    /// the table origin. Template values there are dropped before filling.
    fn in_table_region(&self, row: u32, col: u16) -> bool {
        let origin = self.table_origin;
        row >= origin.row && col >= origin.col && col < origin.col + TABLE_COLUMNS
    }
}

pub fn render_due_diligence(
    layout: &TemplateLayout,
    records: &[TransactionRecord],
    today: NaiveDate,
) -> Result<RenderedReport, ReportError> {
    let path = &layout.template_path;
    if !path.is_file() {
        return Err(ReportError::TemplateMissing(path.clone()));
    }

    let template_error = |source| ReportError::Template {
        path: path.clone(),
        source,
    };
    let mut template = open_workbook_auto(path).map_err(template_error)?;
    let sheet_names = template.sheet_names();
    if sheet_names.is_empty() {
        return Err(ReportError::EmptyTemplate(path.clone()));
    }

    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let mut workbook = Workbook::new();

    for (index, name) in sheet_names.iter().enumerate() {
        let values = template.worksheet_range(name).map_err(template_error)?;
        let formulas = template.worksheet_formula(name).map_err(template_error)?;
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;

        let kept = if index == 0 {
            copy_cells(worksheet, &values, &formulas, &date_format, |row, col| {
                !layout.in_table_region(row, col)
            })?
        } else {
            copy_cells(worksheet, &values, &formulas, &date_format, |_, _| true)?
        };
        debug!(sheet = %name, cells = kept, "Copied template sheet");
        if index == 0 {
            fill_form(worksheet, layout, records, today)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    info!(
        template = %path.display(),
        rows = records.len(),
        "Rendered due diligence form"
    );

    Ok(RenderedReport {
        file_name: dated_file_name(FILE_PREFIX, today),
        bytes,
    })
}

/// Copies every formula and non-empty value for which `keep` holds, at its
/// original absolute position. A formula cell keeps its cached value as the
/// stored result. Returns how many cells were written.
fn copy_cells(
    worksheet: &mut Worksheet,
    values: &Range<Data>,
    formulas: &Range<String>,
    date_format: &Format,
    keep: impl Fn(u32, u16) -> bool,
) -> Result<usize, ReportError> {
    let mut written = 0;
    let mut formula_cells = HashSet::new();

    if let Some((first_row, first_col)) = formulas.start() {
        for (row_offset, col_offset, text) in formulas.used_cells() {
            let row = first_row + row_offset as u32;
            let col = (first_col as usize + col_offset) as u16;
            if text.is_empty() || !keep(row, col) {
                continue;
            }
            let mut formula = Formula::new(text.as_str());
            if let Some(cached) = values.get_value((row, col as u32)).and_then(cached_result) {
                formula = formula.set_result(cached);
            }
            worksheet.write_formula(row, col, formula)?;
            formula_cells.insert((row, col));
            written += 1;
        }
    }

    let Some((first_row, first_col)) = values.start() else {
        return Ok(written);
    };
    for (row_offset, cells) in values.rows().enumerate() {
        let row = first_row + row_offset as u32;
        for (col_offset, value) in cells.iter().enumerate() {
            let col = (first_col as usize + col_offset) as u16;
            if formula_cells.contains(&(row, col)) || !keep(row, col) {
                continue;
            }
            match value {
                Data::Empty => continue,
                Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                Data::Int(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                Data::Float(f) => {
                    worksheet.write_number(row, col, *f)?;
                }
                Data::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Data::DateTime(dt) => {
                    worksheet.write_number_with_format(row, col, dt.as_f64(), date_format)?;
                }
                // A literal error value, e.g. `#N/A` typed into the cell.
                Data::Error(e) => {
                    worksheet.write_formula(row, col, Formula::new(format!("={e}")))?;
                }
            }
            written += 1;
        }
    }
    Ok(written)
}

fn cached_result(value: &Data) -> Option<String> {
    match value {
        Data::Empty => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(String::from(if *b { "TRUE" } else { "FALSE" })),
        Data::DateTime(dt) => Some(dt.as_f64().to_string()),
        Data::Error(e) => Some(e.to_string()),
    }
}

fn fill_form(
    worksheet: &mut Worksheet,
    layout: &TemplateLayout,
    records: &[TransactionRecord],
    today: NaiveDate,
) -> Result<(), ReportError> {
    if let Some(cell) = layout.area_cell {
        worksheet.write_string(cell.row, cell.col, layout.area_label.as_str())?;
    }
    if let Some(cell) = layout.date_cell {
        worksheet.write_string(cell.row, cell.col, today.format("%d/%m/%Y").to_string())?;
    }

    let origin = layout.table_origin;
    for (i, record) in records.iter().enumerate() {
        let row = origin.row + i as u32;
        worksheet.write_string(row, origin.col, record.document_type.as_str())?;
        worksheet.write_string(row, origin.col + 1, record.document_number.as_str())?;
        worksheet.write_string(row, origin.col + 2, record.holder_name.as_str())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::open_workbook_auto_from_rs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;
    use umbral_core::{Money, RecordId};

    fn record(id: u64, doc_type: &str, number: &str, name: &str) -> TransactionRecord {
        TransactionRecord {
            id: RecordId(id),
            document_type: doc_type.to_string(),
            document_number: number.to_string(),
            holder_name: name.to_string(),
            reference: format!("REF{id}"),
            amount: Some(Money::from_major(40_000)),
            source_file: "payout.xlsx".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    /// A form with labels, a row-count formula, a table header on row 12,
    /// three stale rows (one a formula) and a note next to the table, plus an
    /// instructions sheet.
    fn write_template(dir: &Path) -> PathBuf {
        let path = dir.join("Formato_Due_Diligence_Template.xlsx");
        let mut workbook = Workbook::new();

        let form = workbook.add_worksheet();
        form.set_name("Formato").unwrap();
        form.write_string(0, 0, "FORMATO DE DEBIDA DILIGENCIA").unwrap();
        form.write_string(8, 1, "Área:").unwrap();
        form.write_string(10, 1, "Fecha:").unwrap();
        form.write_string(11, 0, "TIPO DOC").unwrap();
        form.write_string(11, 1, "NUMERO").unwrap();
        form.write_string(11, 2, "NOMBRE").unwrap();
        for row in 12..15 {
            form.write_string(row, 0, "DNI").unwrap();
            form.write_string(row, 1, "99999999").unwrap();
            form.write_string(row, 2, "Stale Holder").unwrap();
        }
        form.write_string(12, 4, "Revisado por:").unwrap();
        form.write_formula(5, 0, "=COUNTA(A13:A100)").unwrap();
        form.write_formula(14, 2, "=\"Stale Holder\"").unwrap();

        let notes = workbook.add_worksheet();
        notes.set_name("Instrucciones").unwrap();
        notes.write_string(0, 0, "Completar por cada cliente observado").unwrap();
        notes.write_number(1, 0, 3.0).unwrap();

        workbook.save(&path).unwrap();
        path
    }

    fn layout(template_path: PathBuf) -> TemplateLayout {
        TemplateLayout {
            template_path,
            ..TemplateLayout::default()
        }
    }

    fn sheet(bytes: &[u8], name: &str) -> Range<Data> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).unwrap();
        workbook.worksheet_range(name).unwrap()
    }

    fn text(range: &Range<Data>, row: u32, col: u32) -> String {
        match range.get_value((row, col)) {
            Some(Data::String(s)) => s.clone(),
            Some(Data::Float(f)) => f.to_string(),
            _ => String::new(),
        }
    }

    // ── form fields ───────────────────────────────────────────────────────────

    #[test]
    fn writes_area_date_and_records() {
        let dir = TempDir::new().unwrap();
        let records = vec![
            record(1, "RUC", "20512345678", "Motoservice SAC"),
            record(2, "DNI", "00123456", "Ana Quispe"),
        ];

        let report = render_due_diligence(&layout(write_template(dir.path())), &records, today())
            .unwrap();
        let form = sheet(&report.bytes, "Formato");

        assert_eq!(text(&form, 8, 2), "Operaciones");
        assert_eq!(text(&form, 10, 2), "16/10/2026");
        assert_eq!(text(&form, 12, 0), "RUC");
        assert_eq!(text(&form, 12, 1), "20512345678");
        assert_eq!(text(&form, 12, 2), "Motoservice SAC");
        assert_eq!(text(&form, 13, 1), "00123456");
        assert_eq!(text(&form, 13, 2), "Ana Quispe");
    }

    #[test]
    fn template_content_outside_table_survives() {
        let dir = TempDir::new().unwrap();
        let records = vec![record(1, "RUC", "20512345678", "Motoservice SAC")];

        let report = render_due_diligence(&layout(write_template(dir.path())), &records, today())
            .unwrap();
        let form = sheet(&report.bytes, "Formato");

        assert_eq!(text(&form, 0, 0), "FORMATO DE DEBIDA DILIGENCIA");
        assert_eq!(text(&form, 8, 1), "Área:");
        assert_eq!(text(&form, 11, 2), "NOMBRE");
        assert_eq!(text(&form, 12, 4), "Revisado por:");

        let notes = sheet(&report.bytes, "Instrucciones");
        assert_eq!(text(&notes, 0, 0), "Completar por cada cliente observado");
        assert_eq!(text(&notes, 1, 0), "3");
    }

    #[test]
    fn template_formulas_are_kept_as_formulas() {
        let dir = TempDir::new().unwrap();
        let records = vec![record(1, "RUC", "20512345678", "Motoservice SAC")];

        let report = render_due_diligence(&layout(write_template(dir.path())), &records, today())
            .unwrap();
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(report.bytes)).unwrap();
        let formulas = workbook.worksheet_formula("Formato").unwrap();

        assert_eq!(
            formulas.get_value((5, 0)).map(String::as_str),
            Some("COUNTA(A13:A100)")
        );
        // Formulas inside the record table are stale rows like any other.
        assert!(matches!(
            formulas.get_value((14, 2)).map(String::as_str),
            None | Some("")
        ));
    }

    // ── stale rows ────────────────────────────────────────────────────────────

    #[test]
    fn stale_rows_below_records_are_cleared() {
        let dir = TempDir::new().unwrap();
        let records = vec![record(1, "RUC", "20512345678", "Motoservice SAC")];

        let report = render_due_diligence(&layout(write_template(dir.path())), &records, today())
            .unwrap();
        let form = sheet(&report.bytes, "Formato");

        for row in 13..15 {
            for col in 0..3 {
                assert_eq!(text(&form, row, col), "", "cell ({row}, {col}) should be blank");
            }
        }
    }

    #[test]
    fn rerender_with_fewer_records_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let layout = layout(write_template(dir.path()));
        let many: Vec<_> = (1..=5)
            .map(|i| record(i, "RUC", &format!("2050000000{i}"), "Holder"))
            .collect();

        render_due_diligence(&layout, &many, today()).unwrap();
        let report = render_due_diligence(&layout, &many[..1], today()).unwrap();
        let form = sheet(&report.bytes, "Formato");

        assert_eq!(text(&form, 12, 1), "20500000001");
        for row in 13..18 {
            assert_eq!(text(&form, row, 1), "");
        }
    }

    #[test]
    fn empty_record_set_still_fills_header_fields() {
        let dir = TempDir::new().unwrap();
        let report =
            render_due_diligence(&layout(write_template(dir.path())), &[], today()).unwrap();
        let form = sheet(&report.bytes, "Formato");

        assert_eq!(text(&form, 8, 2), "Operaciones");
        assert_eq!(text(&form, 12, 0), "");
        assert_eq!(report.file_name, "Formato_Due_Diligence_16.10.26.xlsx");
    }

    // ── layout configuration ──────────────────────────────────────────────────

    #[test]
    fn custom_origin_and_no_date_cell() {
        let dir = TempDir::new().unwrap();
        let layout = TemplateLayout {
            template_path: write_template(dir.path()),
            table_origin: "B20".parse().unwrap(),
            area_cell: None,
            area_label: String::new(),
            date_cell: None,
        };
        let records = vec![record(1, "RUC", "20512345678", "Motoservice SAC")];

        let report = render_due_diligence(&layout, &records, today()).unwrap();
        let form = sheet(&report.bytes, "Formato");

        assert_eq!(text(&form, 19, 1), "RUC");
        assert_eq!(text(&form, 19, 3), "Motoservice SAC");
        assert_eq!(text(&form, 10, 2), "");
        // Origin moved, so the old table rows are ordinary template content.
        assert_eq!(text(&form, 12, 0), "DNI");
    }

    #[test]
    fn layout_from_toml_uses_a1_refs() {
        let layout: TemplateLayout = toml::from_str(
            r#"
            template_path = "forms/dd.xlsx"
            table_origin = "A15"
            area_cell = "D9"
            "#,
        )
        .unwrap();

        assert_eq!(layout.template_path, PathBuf::from("forms/dd.xlsx"));
        assert_eq!(layout.table_origin, CellRef::new(14, 0));
        assert_eq!(layout.area_cell, Some(CellRef::new(8, 3)));
        assert_eq!(layout.date_cell, Some(CellRef::new(10, 2)));
        assert_eq!(layout.area_label, "Operaciones");
    }

    // ── errors ────────────────────────────────────────────────────────────────

    #[test]
    fn missing_template_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.xlsx");
        let records = vec![record(1, "RUC", "20512345678", "Motoservice SAC")];

        let err = render_due_diligence(&layout(missing.clone()), &records, today()).unwrap_err();
        match err {
            ReportError::TemplateMissing(path) => assert_eq!(path, missing),
            other => panic!("expected TemplateMissing, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_template_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let err = render_due_diligence(&layout(path), &[], today()).unwrap_err();
        assert!(matches!(err, ReportError::Template { .. }));
    }
}
