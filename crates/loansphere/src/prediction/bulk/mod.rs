mod export;
mod parser;

use std::io::Read;
use std::path::Path;

use super::decision::LoanDecision;
use super::features::SchemaMismatch;

pub use export::PREDICTION_COLUMN;

/// Why an uploaded table could not be turned into a feature frame.
#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload is not valid delimited text: {0}")]
    Parse(#[from] csv::Error),
    #[error("upload has no header row")]
    Empty,
    #[error("column '{0}' appears more than once in the upload")]
    DuplicateColumn(String),
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error("row {row}: '{value}' is not a valid {column} value")]
    InvalidCategory {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

impl BulkError {
    /// True when the upload itself is unreadable, as opposed to readable but missing columns.
    pub fn is_parse_failure(&self) -> bool {
        !matches!(self, BulkError::Schema(_))
    }
}

/// An uploaded table, kept as text so every original column can be echoed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    duplicated: Vec<String>,
}

impl BulkTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BulkError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BulkError> {
        let parsed = parser::parse_table(reader)?;
        Ok(Self {
            headers: parsed.headers,
            rows: parsed.rows,
            duplicated: parsed.duplicated,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BulkError> {
        Self::from_reader(bytes)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Original header names that appeared more than once and were suffixed on read.
    pub fn duplicated_columns(&self) -> &[String] {
        &self.duplicated
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }
}

/// Source rows with the model's decision appended as a `Prediction` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPredictions {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    decisions: Vec<LoanDecision>,
}

impl BulkPredictions {
    /// Attach decisions to the table, one per row in row order.
    ///
    /// An existing `Prediction` column is overwritten in place.
    pub(crate) fn attach(table: BulkTable, decisions: Vec<LoanDecision>) -> Self {
        debug_assert_eq!(table.len(), decisions.len());
        let existing = table.column_index(PREDICTION_COLUMN);
        let (mut headers, mut rows) = table.into_parts();

        if existing.is_none() {
            headers.push(PREDICTION_COLUMN.to_string());
        }

        for (row, decision) in rows.iter_mut().zip(&decisions) {
            let label = decision.as_label().to_string();
            match existing {
                Some(index) => row[index] = label,
                None => row.push(label),
            }
        }

        Self {
            headers,
            rows,
            decisions,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn decisions(&self) -> &[LoanDecision] {
        &self.decisions
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn approved(&self) -> usize {
        self.decisions
            .iter()
            .filter(|decision| decision.is_approved())
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.decisions.len() - self.approved()
    }

    /// The first `limit` augmented rows.
    pub fn preview(&self, limit: usize) -> &[Vec<String>] {
        &self.rows[..limit.min(self.rows.len())]
    }

    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), BulkError> {
        export::write_table(writer, &self.headers, &self.rows)
    }

    pub fn to_csv(&self) -> Result<String, BulkError> {
        export::table_to_string(&self.headers, &self.rows)
    }
}
