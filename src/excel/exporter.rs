//! Spreadsheet encoder: [`Table`] → styled .xlsx bytes

use crate::error::EncodeError;
use crate::types::{CellValue, Table};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

/// Upper bound on a column's width, in characters
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Characters added to the longest value in a column
pub const COLUMN_PADDING: usize = 2;

pub const DEFAULT_SHEET_NAME: &str = "Dados";

/// Light gray header fill
const HEADER_FILL: u32 = 0xD9D9D9;

/// Encodes a table into a single-sheet workbook with a styled header row
#[derive(Debug, Clone)]
pub struct SheetEncoder {
    sheet_name: String,
}

impl Default for SheetEncoder {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl SheetEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worksheet name (Excel rules apply: at most 31 characters, no `[]:*?/\`)
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Encode the table and return the complete workbook bytes.
    ///
    /// Nothing is returned unless every cell, width and the container were
    /// written successfully.
    pub fn encode(&self, table: &Table) -> Result<Vec<u8>, EncodeError> {
        let mut workbook = Workbook::new();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name).map_err(|e| {
            EncodeError::new(format!(
                "Failed to set worksheet name '{}': {}",
                self.sheet_name, e
            ))
        })?;

        Self::write_header(worksheet, table)?;
        Self::write_rows(worksheet, table)?;
        Self::apply_column_widths(worksheet, table)?;

        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| EncodeError::new(format!("Failed to save workbook: {}", e)))?;

        debug!(
            sheet = %self.sheet_name,
            rows = table.row_count(),
            columns = table.column_count(),
            bytes = bytes.len(),
            "encoded workbook"
        );
        Ok(bytes)
    }

    /// Bold, centered, thin-bordered, light gray, no wrapping
    pub fn header_format() -> Format {
        Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_border(FormatBorder::Thin)
    }

    fn write_header(worksheet: &mut Worksheet, table: &Table) -> Result<(), EncodeError> {
        let format = Self::header_format();

        for (col_idx, column) in table.columns.iter().enumerate() {
            let col = column_number(col_idx)?;
            worksheet
                .write_string_with_format(0, col, &column.name, &format)
                .map_err(|e| {
                    EncodeError::new(format!("Failed to write header '{}': {}", column.name, e))
                })?;
        }
        Ok(())
    }

    /// Data rows start at row 1, one cell per column, default format
    fn write_rows(worksheet: &mut Worksheet, table: &Table) -> Result<(), EncodeError> {
        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1)
                .map_err(|_| EncodeError::new(format!("Row {} is out of range", row_idx + 1)))?;

            for (col_idx, value) in row.iter().enumerate() {
                let col = column_number(col_idx)?;
                Self::write_cell_value(worksheet, excel_row, col, value)?;
            }
        }
        Ok(())
    }

    /// Write a single cell, keeping numbers numeric
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
    ) -> Result<(), EncodeError> {
        match value {
            CellValue::Integer(i) => {
                worksheet.write_number(row, col, *i as f64).map_err(|e| {
                    EncodeError::new(format!("Failed to write number at ({}, {}): {}", row, col, e))
                })?;
            }
            CellValue::Float(f) => {
                worksheet.write_number(row, col, *f).map_err(|e| {
                    EncodeError::new(format!("Failed to write number at ({}, {}): {}", row, col, e))
                })?;
            }
            CellValue::Text(s) => {
                worksheet.write_string(row, col, s).map_err(|e| {
                    EncodeError::new(format!("Failed to write text at ({}, {}): {}", row, col, e))
                })?;
            }
            CellValue::Empty => {}
        }
        Ok(())
    }

    fn apply_column_widths(worksheet: &mut Worksheet, table: &Table) -> Result<(), EncodeError> {
        for (col_idx, width) in column_widths(table).into_iter().enumerate() {
            let col = column_number(col_idx)?;
            worksheet.set_column_width(col, width as f64).map_err(|e| {
                EncodeError::new(format!("Failed to set width of column {}: {}", col_idx, e))
            })?;
        }
        Ok(())
    }
}

fn column_number(index: usize) -> Result<u16, EncodeError> {
    u16::try_from(index).map_err(|_| EncodeError::new(format!("Column {} is out of range", index)))
}

/// Display width of one column: the longest of its name and displayed values,
/// plus padding, capped at [`MAX_COLUMN_WIDTH`]
pub fn column_width(table: &Table, index: usize) -> usize {
    let name_len = table
        .columns
        .get(index)
        .map(|c| c.name.chars().count())
        .unwrap_or(0);

    let longest = table
        .column_values(index)
        .map(CellValue::display_len)
        .fold(name_len, usize::max);

    (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
}

/// Widths for every column, left to right
pub fn column_widths(table: &Table) -> Vec<usize> {
    (0..table.column_count())
        .map(|idx| column_width(table, idx))
        .collect()
}

/// Encode with the default sheet name
pub fn encode(table: &Table) -> Result<Vec<u8>, EncodeError> {
    SheetEncoder::default().encode(table)
}
