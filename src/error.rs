use crate::types::Delimiter;
use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Crate-level error for a single conversion request
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Excel import error: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Message shown to the user by a front end (CLI status line, HTTP error body)
    pub fn status_message(&self) -> String {
        match self {
            ConvertError::Parse(e) if e.is_separator_problem() => format!(
                "Could not split the file into consistent columns. Check your separator: \
                 only {} and {} are supported.",
                Delimiter::Comma,
                Delimiter::Semicolon
            ),
            ConvertError::Parse(_) => {
                "The file is not a valid table. Check that it is a CSV text file.".to_string()
            }
            ConvertError::Encode(e) => format!("Failed to process the file: {}", e),
            ConvertError::Import(msg) => format!("Failed to read the workbook: {}", msg),
            ConvertError::Io(e) => format!("Failed to access the file: {}", e),
        }
    }
}

/// Why one delimiter failed to produce a rectangular table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterAttempt {
    pub delimiter: Delimiter,
    pub reason: String,
}

impl DelimiterAttempt {
    pub fn new(delimiter: Delimiter, reason: impl Into<String>) -> Self {
        Self {
            delimiter,
            reason: reason.into(),
        }
    }
}

/// The raw bytes could not be read as a delimited table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid file: not UTF-8 text (invalid byte at offset {offset})")]
    Decode { offset: usize },

    #[error("Invalid file: no header row found")]
    Empty,

    #[error("Unsupported separator: {}", describe_attempts(.attempts))]
    UnsupportedSeparator { attempts: Vec<DelimiterAttempt> },
}

impl ParseError {
    /// True when the bytes are text but no delimiter fits ("check your separator"),
    /// false when the file itself is unusable ("not a valid table").
    pub fn is_separator_problem(&self) -> bool {
        matches!(self, ParseError::UnsupportedSeparator { .. })
    }
}

fn describe_attempts(attempts: &[DelimiterAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.delimiter.name(), a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The table could not be serialized to a workbook
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Excel export error: {0}")]
pub struct EncodeError(pub String);

impl EncodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
