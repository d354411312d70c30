use serde::{Deserialize, Serialize};

/// Binary outcome of the classifier for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanDecision {
    Approved,
    Rejected,
}

/// The model produced a class outside the approved/rejected contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("model returned unsupported label {0}; expected 1 (approved) or 0 (rejected)")]
pub struct UnsupportedLabel(pub i64);

impl LoanDecision {
    pub fn from_model_label(label: i64) -> Result<Self, UnsupportedLabel> {
        match label {
            1 => Ok(Self::Approved),
            0 => Ok(Self::Rejected),
            other => Err(UnsupportedLabel(other)),
        }
    }

    /// Label written to exports: 1 for approved, 0 for rejected.
    pub const fn as_label(self) -> u8 {
        match self {
            Self::Approved => 1,
            Self::Rejected => 0,
        }
    }

    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::Approved => "Loan Approved",
            Self::Rejected => "Loan Not Approved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_binary_labels() {
        assert_eq!(LoanDecision::from_model_label(1), Ok(LoanDecision::Approved));
        assert_eq!(LoanDecision::from_model_label(0), Ok(LoanDecision::Rejected));
        assert_eq!(LoanDecision::Approved.as_label(), 1);
        assert_eq!(LoanDecision::Rejected.as_label(), 0);
    }

    #[test]
    fn other_labels_are_reported() {
        assert_eq!(LoanDecision::from_model_label(2), Err(UnsupportedLabel(2)));
        assert_eq!(LoanDecision::from_model_label(-1), Err(UnsupportedLabel(-1)));
    }
}
