use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::application::LoanApplication;
use super::bulk::{BulkError, BulkTable};
use super::encoding::{HomeOwnership, Purpose, Term};

pub const CURRENT_LOAN_AMOUNT: &str = "Current Loan Amount";
pub const TERM: &str = "Term";
pub const CREDIT_SCORE: &str = "Credit Score";
pub const ANNUAL_INCOME: &str = "Annual Income";
pub const HOME_OWNERSHIP: &str = "Home Ownership";
pub const PURPOSE: &str = "Purpose";
pub const MONTHLY_DEBT: &str = "Monthly Debt";
pub const YEARS_OF_CREDIT_HISTORY: &str = "Years of Credit History";
pub const MONTHS_SINCE_LAST_DELINQUENT: &str = "Months since last delinquent";
pub const NUMBER_OF_OPEN_ACCOUNTS: &str = "Number of Open Accounts";
pub const NUMBER_OF_CREDIT_PROBLEMS: &str = "Number of Credit Problems";
pub const CURRENT_CREDIT_BALANCE: &str = "Current Credit Balance";
pub const MAXIMUM_OPEN_CREDIT: &str = "Maximum Open Credit";

/// Column names used at training time, in single-record assembly order.
pub const TRAINED_COLUMNS: [&str; 13] = [
    CURRENT_LOAN_AMOUNT,
    TERM,
    CREDIT_SCORE,
    ANNUAL_INCOME,
    HOME_OWNERSHIP,
    PURPOSE,
    MONTHLY_DEBT,
    YEARS_OF_CREDIT_HISTORY,
    MONTHS_SINCE_LAST_DELINQUENT,
    NUMBER_OF_OPEN_ACCOUNTS,
    NUMBER_OF_CREDIT_PROBLEMS,
    CURRENT_CREDIT_BALANCE,
    MAXIMUM_OPEN_CREDIT,
];

/// Columns whose cells carry a category code rather than a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalColumn {
    Term,
    HomeOwnership,
    Purpose,
}

impl CategoricalColumn {
    pub fn from_column(name: &str) -> Option<Self> {
        match name {
            TERM => Some(Self::Term),
            HOME_OWNERSHIP => Some(Self::HomeOwnership),
            PURPOSE => Some(Self::Purpose),
            _ => None,
        }
    }

    /// Resolve a raw cell that holds either the training code or the human label.
    pub fn encode(self, raw: &str) -> Option<u8> {
        let trimmed = raw.trim();
        if let Some(code) = parse_integral(trimmed) {
            return match self {
                Self::Term => Term::from_code(code).map(Term::code),
                Self::HomeOwnership => HomeOwnership::from_code(code).map(HomeOwnership::code),
                Self::Purpose => Purpose::from_code(code).map(Purpose::code),
            };
        }

        match self {
            Self::Term => Term::from_label(trimmed).map(Term::code),
            Self::HomeOwnership => HomeOwnership::from_label(trimmed).map(HomeOwnership::code),
            Self::Purpose => Purpose::from_label(trimmed).map(Purpose::code),
        }
    }
}

fn parse_integral(raw: &str) -> Option<i64> {
    if let Ok(code) = raw.parse::<i64>() {
        return Some(code);
    }
    // Exports from dataframe tooling often write integer codes as "1.0".
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Some(value as i64),
        _ => None,
    }
}

/// Declared features are absent from the assembled or uploaded frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("feature frame is missing required columns: {}", .missing.join(", "))]
pub struct SchemaMismatch {
    pub missing: Vec<String>,
}

/// Ordered feature names a model artifact requires as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("feature schema must declare at least one feature")]
    Empty,
    #[error("feature '{0}' is declared more than once")]
    Duplicate(String),
    #[error("feature names must not be blank")]
    BlankName,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for name in &names {
            if name.trim().is_empty() {
                return Err(SchemaError::BlankName);
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Declared names not present in `available`, in declared order.
    pub fn missing_from<'a, I>(&self, available: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let available: HashSet<&str> = available.into_iter().collect();
        self.names
            .iter()
            .filter(|name| !available.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Encode a single application and reorder it into the declared feature order.
    pub fn assemble_one(
        &self,
        application: &LoanApplication,
    ) -> Result<FeatureFrame, SchemaMismatch> {
        let encoded = EncodedApplication::from(application);
        let row = self.select(&encoded)?;
        Ok(FeatureFrame {
            columns: self.names.clone(),
            rows: vec![row],
        })
    }

    /// Select the declared columns from an uploaded table.
    ///
    /// The whole header is checked before any cell is read, so a missing column never
    /// yields a partial frame. A declared column that appears more than once is rejected;
    /// repeated undeclared columns pass through under their suffixed names. Categorical
    /// cells go through the same encoder as the single-record path and accept either codes
    /// or labels.
    pub fn assemble_table(&self, table: &BulkTable) -> Result<FeatureFrame, BulkError> {
        let missing = self.missing_from(table.headers().iter().map(String::as_str));
        if !missing.is_empty() {
            return Err(BulkError::Schema(SchemaMismatch { missing }));
        }

        if let Some(name) = self
            .names
            .iter()
            .find(|name| table.duplicated_columns().contains(name))
        {
            return Err(BulkError::DuplicateColumn(name.clone()));
        }

        let plan: Vec<(usize, &str, Option<CategoricalColumn>)> = self
            .names
            .iter()
            .filter_map(|name| {
                table
                    .column_index(name)
                    .map(|index| (index, name.as_str(), CategoricalColumn::from_column(name)))
            })
            .collect();

        let mut rows = Vec::with_capacity(table.len());
        for (row_index, record) in table.rows().iter().enumerate() {
            let mut values = Vec::with_capacity(plan.len());
            for (index, column, categorical) in &plan {
                let raw = record.get(*index).map(String::as_str).unwrap_or_default();
                let value = match categorical {
                    Some(kind) => kind.encode(raw).map(f64::from).ok_or_else(|| {
                        BulkError::InvalidCategory {
                            row: row_index + 1,
                            column: (*column).to_string(),
                            value: raw.to_string(),
                        }
                    })?,
                    None => parse_number(raw).ok_or_else(|| BulkError::InvalidNumber {
                        row: row_index + 1,
                        column: (*column).to_string(),
                        value: raw.to_string(),
                    })?,
                };
                values.push(value);
            }
            rows.push(values);
        }

        Ok(FeatureFrame {
            columns: self.names.clone(),
            rows,
        })
    }

    fn select(&self, encoded: &EncodedApplication) -> Result<Vec<f64>, SchemaMismatch> {
        let mut row = Vec::with_capacity(self.names.len());
        let mut missing = Vec::new();

        for name in &self.names {
            match encoded.get(name) {
                Some(value) => row.push(value),
                None => missing.push(name.clone()),
            }
        }

        if missing.is_empty() {
            Ok(row)
        } else {
            Err(SchemaMismatch { missing })
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(", "))
    }
}

/// A loan application with categorical selections replaced by their training codes.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedApplication {
    values: [f64; 13],
}

impl EncodedApplication {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Named columns in assembly order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        TRAINED_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }
}

impl From<&LoanApplication> for EncodedApplication {
    fn from(application: &LoanApplication) -> Self {
        Self {
            values: [
                application.current_loan_amount,
                f64::from(application.term.code()),
                f64::from(application.credit_score),
                application.annual_income,
                f64::from(application.home_ownership.code()),
                f64::from(application.purpose.code()),
                application.monthly_debt,
                application.years_of_credit_history,
                f64::from(application.months_since_last_delinquent),
                f64::from(application.number_of_open_accounts),
                f64::from(application.number_of_credit_problems),
                application.current_credit_balance,
                application.maximum_open_credit,
            ],
        }
    }
}

/// Rows whose columns are exactly a model's declared features, in declared order.
///
/// Only the schema can build a frame, so every frame in circulation already satisfies
/// the model's column contract.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.columns.iter().position(|column| column == name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }
}
