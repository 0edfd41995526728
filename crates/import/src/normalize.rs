use tracing::{debug, info, warn};
use umbral_core::{RecordId, TransactionRecord};

use crate::amount::parse_amount;
use crate::error::ImportError;
use crate::schema::ColumnSchema;
use crate::source::{read_upload, RawRow, SourceFile};

/// A file as received from the operator: display name plus raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A file that contributed no records, and why.
#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: ImportError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records from every file that normalized cleanly, in upload order.
    pub records: Vec<TransactionRecord>,
    pub failures: Vec<FileFailure>,
}

/// Maps source rows to records under one schema, numbering records across
/// every file it is fed.
pub struct Normalizer<'a> {
    schema: &'a ColumnSchema,
    next_id: u64,
}

impl<'a> Normalizer<'a> {
    pub fn new(schema: &'a ColumnSchema) -> Self {
        Self { schema, next_id: 0 }
    }

    /// Normalizes one file. On error no ids are consumed and the file
    /// yields nothing.
    pub fn normalize(&mut self, file: &SourceFile) -> Result<Vec<TransactionRecord>, ImportError> {
        let schema = self.schema;
        let mut records = Vec::new();
        let mut next_id = self.next_id;
        let mut header_seen = false;

        for row in &file.rows {
            if row.line <= schema.header_rows {
                if row.line == schema.header_rows && schema.expects_header() {
                    schema.verify_header(row)?;
                    header_seen = true;
                }
                continue;
            }
            if schema.is_blank(row) {
                debug!(file = %file.name, line = row.line, "skipping blank row");
                continue;
            }
            if schema.expects_header() && !header_seen {
                return Err(ImportError::MissingHeader(schema.header_rows));
            }
            schema.check_width(row)?;

            let record = map_row(schema, row, RecordId(next_id), &file.name);
            if record.amount.is_none() {
                debug!(file = %file.name, line = row.line, "unreadable amount, treated as missing");
            }
            records.push(record);
            next_id += 1;
        }

        self.next_id = next_id;
        Ok(records)
    }
}

fn map_row(schema: &ColumnSchema, row: &RawRow, id: RecordId, source_file: &str) -> TransactionRecord {
    let text = |col: usize| row.cell(col).map(|c| c.to_text()).unwrap_or_default();
    TransactionRecord {
        id,
        document_type: text(schema.document_type).trim().to_string(),
        document_number: text(schema.document_number),
        holder_name: text(schema.holder_name).trim().to_string(),
        reference: text(schema.reference),
        amount: row.cell(schema.amount).and_then(parse_amount),
        source_file: source_file.to_string(),
    }
}

/// Reads and normalizes every upload independently. A file that cannot be
/// read or mapped is reported in `failures` and the rest carry on.
pub fn normalize_batch(
    uploads: impl IntoIterator<Item = Upload>,
    schema: &ColumnSchema,
) -> BatchOutcome {
    let mut normalizer = Normalizer::new(schema);
    let mut outcome = BatchOutcome::default();

    for upload in uploads {
        let result = read_upload(&upload.name, upload.bytes)
            .and_then(|file| normalizer.normalize(&file));
        match result {
            Ok(records) => {
                info!(file = %upload.name, records = records.len(), schema = %schema, "file normalized");
                outcome.records.extend(records);
            }
            Err(error) => {
                warn!(file = %upload.name, schema = %schema, %error, "file skipped");
                outcome.failures.push(FileFailure {
                    file: upload.name,
                    error,
                });
            }
        }
    }

    outcome
}
