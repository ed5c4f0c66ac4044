//! csvsheet - CSV to styled Excel conversion
//!
//! This library loads delimited text into a typed in-memory table and encodes
//! it as a single-sheet .xlsx workbook with a styled header row and
//! content-sized columns.
//!
//! # Features
//!
//! - Delimiter detection (comma, then semicolon fallback)
//! - Per-column type inference (integer, float, text, empty cells)
//! - Bold, centered, bordered, shaded header row
//! - Column widths derived from content, capped at 50 characters
//! - CLI (`csvsheet`) and HTTP upload API (`csvsheet-server`)
//!
//! # Example
//!
//! ```no_run
//! use csvsheet::convert;
//!
//! let bytes = std::fs::read("report.csv")?;
//! let conversion = convert(&bytes, "report.csv")?;
//!
//! println!("Columns: {:?}", conversion.table.column_names());
//! std::fs::write(&conversion.document.filename, &conversion.document.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod cli;
pub mod convert;
pub mod error;
pub mod excel;
pub mod loader;
pub mod types;

// Re-export commonly used types
pub use convert::{convert, output_filename, Conversion, Converter, Document, XLSX_MIME_TYPE};
pub use error::{ConvertError, ConvertResult, EncodeError, ParseError};
pub use excel::{encode, DocumentReader, SheetEncoder};
pub use loader::{load, TableLoader};
pub use types::{CellValue, Column, ColumnType, Delimiter, Table};
