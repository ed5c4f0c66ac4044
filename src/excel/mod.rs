//! Excel encode/read-back module
//!
//! - Encode: table → styled single-sheet workbook (.xlsx)
//! - Read back: workbook (.xlsx) → table, for previews and round-trip checks

pub mod exporter;
mod importer;

pub use exporter::{
    column_width, column_widths, encode, SheetEncoder, COLUMN_PADDING, DEFAULT_SHEET_NAME,
    MAX_COLUMN_WIDTH,
};
pub use importer::DocumentReader;
