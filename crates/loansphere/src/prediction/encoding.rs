use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raised when a categorical selection is not part of its fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {field} selection")]
pub struct UnknownCategory {
    pub field: &'static str,
    pub value: String,
}

/// Loan term as selected on the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    #[serde(rename = "Short")]
    Short,
    #[serde(rename = "Long")]
    Long,
}

impl Term {
    pub const ALL: [Term; 2] = [Term::Short, Term::Long];

    /// Integer code assigned at training time.
    pub const fn code(self) -> u8 {
        match self {
            Term::Short => 0,
            Term::Long => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Term::Short => "Short",
            Term::Long => "Long",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        lookup_label(&Self::ALL, value, |term| term.label())
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|term| i64::from(term.code()) == code)
    }
}

/// Home ownership status of the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeOwnership {
    #[serde(rename = "Have Mortgage")]
    HaveMortgage,
    #[serde(rename = "Rent")]
    Rent,
    #[serde(rename = "Home Mortgage")]
    HomeMortgage,
    #[serde(rename = "Own")]
    Own,
}

impl HomeOwnership {
    pub const ALL: [HomeOwnership; 4] = [
        HomeOwnership::HaveMortgage,
        HomeOwnership::Rent,
        HomeOwnership::HomeMortgage,
        HomeOwnership::Own,
    ];

    /// Integer code assigned at training time.
    pub const fn code(self) -> u8 {
        match self {
            HomeOwnership::HaveMortgage => 0,
            HomeOwnership::Rent => 1,
            HomeOwnership::HomeMortgage => 2,
            HomeOwnership::Own => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            HomeOwnership::HaveMortgage => "Have Mortgage",
            HomeOwnership::Rent => "Rent",
            HomeOwnership::HomeMortgage => "Home Mortgage",
            HomeOwnership::Own => "Own",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        lookup_label(&Self::ALL, value, |ownership| ownership.label())
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ownership| i64::from(ownership.code()) == code)
    }
}

/// Declared purpose of the loan. Codes start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "Business Loan")]
    BusinessLoan,
    #[serde(rename = "Buy a Car")]
    BuyACar,
    #[serde(rename = "Buy House")]
    BuyHouse,
    #[serde(rename = "Debt Consolidation")]
    DebtConsolidation,
    #[serde(rename = "Educational Expenses")]
    EducationalExpenses,
    #[serde(rename = "Home Improvements")]
    HomeImprovements,
    #[serde(rename = "Major Purchase")]
    MajorPurchase,
    #[serde(rename = "Medical Bills")]
    MedicalBills,
    #[serde(rename = "Moving")]
    Moving,
    #[serde(rename = "Other")]
    Other,
    #[serde(rename = "Renewable Energy")]
    RenewableEnergy,
    #[serde(rename = "Small Business")]
    SmallBusiness,
    #[serde(rename = "Take a Trip")]
    TakeATrip,
    #[serde(rename = "Vacation")]
    Vacation,
    #[serde(rename = "Wedding")]
    Wedding,
}

impl Purpose {
    pub const ALL: [Purpose; 15] = [
        Purpose::BusinessLoan,
        Purpose::BuyACar,
        Purpose::BuyHouse,
        Purpose::DebtConsolidation,
        Purpose::EducationalExpenses,
        Purpose::HomeImprovements,
        Purpose::MajorPurchase,
        Purpose::MedicalBills,
        Purpose::Moving,
        Purpose::Other,
        Purpose::RenewableEnergy,
        Purpose::SmallBusiness,
        Purpose::TakeATrip,
        Purpose::Vacation,
        Purpose::Wedding,
    ];

    /// Integer code assigned at training time.
    pub const fn code(self) -> u8 {
        match self {
            Purpose::BusinessLoan => 1,
            Purpose::BuyACar => 2,
            Purpose::BuyHouse => 3,
            Purpose::DebtConsolidation => 4,
            Purpose::EducationalExpenses => 5,
            Purpose::HomeImprovements => 6,
            Purpose::MajorPurchase => 7,
            Purpose::MedicalBills => 8,
            Purpose::Moving => 9,
            Purpose::Other => 10,
            Purpose::RenewableEnergy => 11,
            Purpose::SmallBusiness => 12,
            Purpose::TakeATrip => 13,
            Purpose::Vacation => 14,
            Purpose::Wedding => 15,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Purpose::BusinessLoan => "Business Loan",
            Purpose::BuyACar => "Buy a Car",
            Purpose::BuyHouse => "Buy House",
            Purpose::DebtConsolidation => "Debt Consolidation",
            Purpose::EducationalExpenses => "Educational Expenses",
            Purpose::HomeImprovements => "Home Improvements",
            Purpose::MajorPurchase => "Major Purchase",
            Purpose::MedicalBills => "Medical Bills",
            Purpose::Moving => "Moving",
            Purpose::Other => "Other",
            Purpose::RenewableEnergy => "Renewable Energy",
            Purpose::SmallBusiness => "Small Business",
            Purpose::TakeATrip => "Take a Trip",
            Purpose::Vacation => "Vacation",
            Purpose::Wedding => "Wedding",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        lookup_label(&Self::ALL, value, |purpose| purpose.label())
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|purpose| i64::from(purpose.code()) == code)
    }
}

fn lookup_label<T: Copy>(
    variants: &[T],
    value: &str,
    label: impl Fn(T) -> &'static str,
) -> Option<T> {
    let wanted = value.trim();
    variants
        .iter()
        .copied()
        .find(|variant| label(*variant).eq_ignore_ascii_case(wanted))
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for HomeOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Term {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value).ok_or_else(|| UnknownCategory {
            field: "Term",
            value: value.to_string(),
        })
    }
}

impl FromStr for HomeOwnership {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value).ok_or_else(|| UnknownCategory {
            field: "Home Ownership",
            value: value.to_string(),
        })
    }
}

impl FromStr for Purpose {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value).ok_or_else(|| UnknownCategory {
            field: "Purpose",
            value: value.to_string(),
        })
    }
}
