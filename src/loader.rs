//! Tabular loader: raw bytes → typed [`Table`]
//!
//! The loader tries each candidate [`Delimiter`] in order and keeps the first
//! one that yields a rectangular table. An attempt fails when:
//! - the CSV reader reports an error (unequal field counts, bad quoting)
//! - the result has a single column whose header still contains another
//!   candidate delimiter, i.e. the file was split with the wrong separator

use crate::error::{DelimiterAttempt, ParseError};
use crate::types::{Delimiter, Table};
use csv::{ErrorKind, ReaderBuilder, Trim};
use tracing::debug;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Loads delimited text into a [`Table`], guessing the delimiter
#[derive(Debug, Clone)]
pub struct TableLoader {
    candidates: Vec<Delimiter>,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self {
            candidates: Delimiter::CANDIDATES.to_vec(),
        }
    }
}

impl TableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[Delimiter] {
        &self.candidates
    }

    /// Load a table, discarding which delimiter was used
    pub fn load(&self, bytes: &[u8]) -> Result<Table, ParseError> {
        self.detect(bytes).map(|(_, table)| table)
    }

    /// Load a table and report the delimiter that produced it
    pub fn detect(&self, bytes: &[u8]) -> Result<(Delimiter, Table), ParseError> {
        let text = decode(bytes)?;

        let mut attempts = Vec::with_capacity(self.candidates.len());
        for &delimiter in &self.candidates {
            match self.parse_with(text, delimiter) {
                Ok(table) => {
                    debug!(
                        delimiter = delimiter.name(),
                        columns = table.column_count(),
                        rows = table.row_count(),
                        "parsed delimited text"
                    );
                    return Ok((delimiter, table));
                }
                Err(reason) => {
                    debug!(delimiter = delimiter.name(), %reason, "delimiter rejected");
                    attempts.push(DelimiterAttempt::new(delimiter, reason));
                }
            }
        }

        Err(ParseError::UnsupportedSeparator { attempts })
    }

    /// Parse the whole text with one delimiter.
    ///
    /// Returns the failure reason as a string so the caller can report every
    /// attempt together.
    fn parse_with(&self, text: &str, delimiter: Delimiter) -> Result<Table, String> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(true)
            .flexible(false)
            .trim(Trim::None)
            .from_reader(text.as_bytes());

        let header: Vec<String> = reader
            .headers()
            .map_err(describe_csv_error)?
            .iter()
            .map(str::to_string)
            .collect();

        if header.len() == 1 {
            if let Some(other) = self
                .candidates
                .iter()
                .find(|d| **d != delimiter && header[0].contains(d.as_char()))
            {
                return Err(format!(
                    "single column header contains the {} separator",
                    other.name()
                ));
            }
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(describe_csv_error)?;
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::from_records(header, records))
    }
}

/// Decode the input as UTF-8, dropping a leading byte order mark
fn decode(bytes: &[u8]) -> Result<&str, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::Decode {
        offset: e.valid_up_to(),
    })?;
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(text)
}

fn describe_csv_error(err: csv::Error) -> String {
    match err.kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => match pos {
            Some(pos) => format!(
                "line {} has {} fields, expected {}",
                pos.line(),
                len,
                expected_len
            ),
            None => format!("a record has {} fields, expected {}", len, expected_len),
        },
        _ => err.to_string(),
    }
}

/// Load a table with the default delimiter candidates
pub fn load(bytes: &[u8]) -> Result<Table, ParseError> {
    TableLoader::default().load(bytes)
}
