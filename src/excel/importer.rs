//! Document reader: .xlsx bytes → [`Table`]

use crate::error::{ConvertError, ConvertResult};
use crate::types::{CellValue, Table};
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;

/// Reads the first worksheet of a workbook back into a table
pub struct DocumentReader {
    bytes: Vec<u8>,
}

impl DocumentReader {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read row 0 as the header and the remaining rows as data.
    ///
    /// Cells are rendered to text the way the encoder displays them and typed
    /// again with the loader's column inference.
    pub fn read(&self) -> ConvertResult<Table> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(self.bytes.as_slice()))
            .map_err(|e| ConvertError::Import(format!("Failed to open workbook: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ConvertError::Import("Workbook has no worksheets".to_string()))?
            .map_err(|e| ConvertError::Import(format!("Failed to read worksheet: {}", e)))?;

        Ok(Self::range_to_table(&range))
    }

    fn range_to_table(range: &Range<Data>) -> Table {
        let Some((end_row, end_col)) = range.end() else {
            return Table::from_records(Vec::new(), Vec::new());
        };

        let cell_text = |row: u32, col: u32| -> String {
            range
                .get_value((row, col))
                .map(Self::render_cell)
                .unwrap_or_default()
        };

        let header: Vec<String> = (0..=end_col).map(|col| cell_text(0, col)).collect();
        let records: Vec<Vec<String>> = (1..=end_row)
            .map(|row| (0..=end_col).map(|col| cell_text(row, col)).collect())
            .collect();

        Table::from_records(header, records)
    }

    /// Render a cell as the encoder would display the same value
    fn render_cell(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Int(i) => CellValue::Integer(*i).to_string(),
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                CellValue::Integer(*f as i64).to_string()
            }
            Data::Float(f) => CellValue::Float(*f).to_string(),
            other => other.to_string(),
        }
    }
}
