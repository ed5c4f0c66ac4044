//! One upload event: bytes + filename → preview table + downloadable workbook

use crate::error::ConvertResult;
use crate::excel::SheetEncoder;
use crate::loader::TableLoader;
use crate::types::{Delimiter, Table};
use tracing::info;

pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const CSV_EXTENSION: &str = ".csv";
const XLSX_EXTENSION: &str = ".xlsx";

/// Encoded workbook ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Result of converting one upload
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Delimiter the loader settled on
    pub delimiter: Delimiter,
    /// Parsed table, for previews
    pub table: Table,
    pub document: Document,
}

/// Loader and encoder configured together
#[derive(Debug, Clone, Default)]
pub struct Converter {
    loader: TableLoader,
    encoder: SheetEncoder,
}

impl Converter {
    pub fn new(loader: TableLoader, encoder: SheetEncoder) -> Self {
        Self { loader, encoder }
    }

    pub fn with_sheet_name(sheet_name: impl Into<String>) -> Self {
        Self::new(
            TableLoader::default(),
            SheetEncoder::new().with_sheet_name(sheet_name),
        )
    }

    pub fn loader(&self) -> &TableLoader {
        &self.loader
    }

    pub fn encoder(&self) -> &SheetEncoder {
        &self.encoder
    }

    /// Load and encode. The filename only names the output document.
    pub fn convert(&self, bytes: &[u8], filename: &str) -> ConvertResult<Conversion> {
        let (delimiter, table) = self.loader.detect(bytes)?;
        let encoded = self.encoder.encode(&table)?;
        let document = Document {
            bytes: encoded,
            filename: output_filename(filename),
            mime_type: XLSX_MIME_TYPE,
        };

        info!(
            input = filename,
            output = %document.filename,
            delimiter = delimiter.name(),
            rows = table.row_count(),
            columns = table.column_count(),
            "converted upload"
        );

        Ok(Conversion {
            delimiter,
            table,
            document,
        })
    }
}

/// Derive the download name: a case-insensitive `.csv` suffix becomes `.xlsx`,
/// anything else gets `.xlsx` appended
pub fn output_filename(input: &str) -> String {
    let stem = input
        .len()
        .checked_sub(CSV_EXTENSION.len())
        .and_then(|split| {
            input
                .get(split..)
                .filter(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
                .map(|_| &input[..split])
        })
        .unwrap_or(input);

    format!("{}{}", stem, XLSX_EXTENSION)
}

/// Convert with the default loader and encoder
pub fn convert(bytes: &[u8], filename: &str) -> ConvertResult<Conversion> {
    Converter::default().convert(bytes, filename)
}
