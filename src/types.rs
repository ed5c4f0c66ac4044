use serde::Serialize;
use std::fmt;

//==============================================================================
// Delimiter
//==============================================================================

/// Field separator candidates, in the order the loader tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    /// All supported delimiters, primary first
    pub const CANDIDATES: [Delimiter; 2] = [Delimiter::Comma, Delimiter::Semicolon];

    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }

    pub fn as_char(self) -> char {
        self.as_byte() as char
    }

    pub fn name(self) -> &'static str {
        match self {
            Delimiter::Comma => "comma",
            Delimiter::Semicolon => "semicolon",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ('{}')", self.name(), self.as_char())
    }
}

//==============================================================================
// Column types and cell values
//==============================================================================

/// Scalar type inferred for a whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    /// Infer the type of a column from all of its raw values.
    ///
    /// Empty strings are skipped. The column is `Integer` if every remaining
    /// value parses as `i64`, `Float` if every remaining value parses as a
    /// finite `f64`, and `Text` otherwise. A column with no non-empty values
    /// stays `Integer`.
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut kind = ColumnType::Integer;

        for value in values.into_iter().filter(|v| !v.is_empty()) {
            match kind {
                ColumnType::Integer => {
                    if value.parse::<i64>().is_ok() {
                        continue;
                    }
                    if parse_finite_float(value).is_none() {
                        return ColumnType::Text;
                    }
                    kind = ColumnType::Float;
                }
                ColumnType::Float => {
                    if parse_finite_float(value).is_none() {
                        return ColumnType::Text;
                    }
                }
                ColumnType::Text => return ColumnType::Text,
            }
        }

        kind
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_finite_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Convert a raw field into a value of the column's inferred type.
    ///
    /// The column type must come from [`ColumnType::infer`] over the same
    /// values; a field that does not parse falls back to text.
    pub fn parse(raw: &str, kind: ColumnType) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        match kind {
            ColumnType::Integer => raw
                .parse::<i64>()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            ColumnType::Float => parse_finite_float(raw)
                .map(CellValue::Float)
                .unwrap_or_else(|| CellValue::Text(raw.to_string())),
            ColumnType::Text => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the value (integers widen to `f64`)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Type-appropriate equality: numbers compare by value regardless of
    /// integer/float representation, everything else compares exactly.
    pub fn equivalent(&self, other: &CellValue) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Number of characters the value occupies when displayed
    pub fn display_len(&self) -> usize {
        match self {
            CellValue::Text(s) => s.chars().count(),
            CellValue::Empty => 0,
            other => other.to_string().chars().count(),
        }
    }
}

/// Floats outside `[1e-4, 1e15)` display in exponent form (`1E+20`, `1E-07`)
const PLAIN_FLOAT_RANGE: std::ops::Range<f64> = 1e-4..1e15;

impl fmt::Display for CellValue {
    /// Render the value the way a spreadsheet shows it: integers without a
    /// decimal point, floats in their shortest form, empty as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(v) if *v != 0.0 && !PLAIN_FLOAT_RANGE.contains(&v.abs()) => {
                write_scientific(f, *v)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

/// Shortest mantissa, signed exponent of at least two digits
fn write_scientific(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let rendered = format!("{:E}", value);
    let (mantissa, exponent) = rendered.split_once('E').unwrap_or((rendered.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(f, "{}E{}{:0>2}", mantissa, sign, digits)
}

//==============================================================================
// Table
//==============================================================================

/// A named column with its inferred type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Rectangular table: every row has exactly one cell per column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a typed table from a header and raw string records.
    ///
    /// Callers guarantee every record has `header.len()` fields.
    pub(crate) fn from_records(header: Vec<String>, records: Vec<Vec<String>>) -> Self {
        debug_assert!(records.iter().all(|r| r.len() == header.len()));

        let kinds: Vec<ColumnType> = (0..header.len())
            .map(|idx| ColumnType::infer(records.iter().map(|r| r[idx].as_str())))
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .zip(&kinds)
                    .map(|(raw, kind)| CellValue::parse(raw, *kind))
                    .collect()
            })
            .collect();

        let columns = header
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Column { name, kind })
            .collect();

        Self { columns, rows }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows (a header-only table)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Iterate the cells of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Compare two tables cell by cell using [`CellValue::equivalent`]
    pub fn equivalent(&self, other: &Table) -> bool {
        self.column_names() == other.column_names()
            && self.rows.len() == other.rows.len()
            && self.rows.iter().zip(&other.rows).all(|(a, b)| {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
            })
    }
}
