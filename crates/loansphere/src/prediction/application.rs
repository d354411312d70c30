use serde::{Deserialize, Serialize};

use super::encoding::{HomeOwnership, Purpose, Term};
use super::features::{
    ANNUAL_INCOME, CREDIT_SCORE, CURRENT_CREDIT_BALANCE, CURRENT_LOAN_AMOUNT,
    MAXIMUM_OPEN_CREDIT, MONTHLY_DEBT, YEARS_OF_CREDIT_HISTORY,
};

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 10_000;
pub const DEFAULT_CREDIT_SCORE: u16 = 600;

/// One applicant's record as captured by the submission form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub current_loan_amount: f64,
    pub term: Term,
    #[serde(default = "default_credit_score")]
    pub credit_score: u16,
    pub annual_income: f64,
    pub home_ownership: HomeOwnership,
    pub purpose: Purpose,
    pub monthly_debt: f64,
    pub years_of_credit_history: f64,
    pub months_since_last_delinquent: u32,
    pub number_of_open_accounts: u32,
    pub number_of_credit_problems: u32,
    pub current_credit_balance: f64,
    pub maximum_open_credit: f64,
}

fn default_credit_score() -> u16 {
    DEFAULT_CREDIT_SCORE
}

impl LoanApplication {
    /// Check the form bounds: every amount finite and non-negative, credit score within range.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let amounts = [
            (CURRENT_LOAN_AMOUNT, self.current_loan_amount),
            (ANNUAL_INCOME, self.annual_income),
            (MONTHLY_DEBT, self.monthly_debt),
            (YEARS_OF_CREDIT_HISTORY, self.years_of_credit_history),
            (CURRENT_CREDIT_BALANCE, self.current_credit_balance),
            (MAXIMUM_OPEN_CREDIT, self.maximum_open_credit),
        ];

        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(ApplicationError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ApplicationError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: None,
                });
            }
        }

        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&self.credit_score) {
            return Err(ApplicationError::OutOfRange {
                field: CREDIT_SCORE,
                value: f64::from(self.credit_score),
                min: f64::from(MIN_CREDIT_SCORE),
                max: Some(f64::from(MAX_CREDIT_SCORE)),
            });
        }

        Ok(())
    }
}

/// Form-level rejection of a single submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplicationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} value {value} is outside the allowed range ({})", range_label(.min, .max))]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: Option<f64>,
    },
}

fn range_label(min: &f64, max: &Option<f64>) -> String {
    match max {
        Some(max) => format!("{min}..={max}"),
        None => format!(">= {min}"),
    }
}
