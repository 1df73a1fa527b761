//! Categorical inputs and their integer codes.
//!
//! The codes were fixed by the training pipeline when it label-encoded the
//! HR dataset. They are neither alphabetical nor derivable from the names,
//! so both tables below are the single source of truth.

use std::fmt;
use std::str::FromStr;

use crate::features::EncodingError;

/// Department an employee belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Sales,
    Accounting,
    Hr,
    Technical,
    Support,
    Management,
    It,
    ProductMng,
    Marketing,
    RandD,
}

impl Department {
    /// All departments in code order (code 0 first).
    pub const ALL: [Department; 10] = [
        Self::Sales,
        Self::Accounting,
        Self::Hr,
        Self::Technical,
        Self::Support,
        Self::Management,
        Self::It,
        Self::ProductMng,
        Self::Marketing,
        Self::RandD,
    ];

    /// Integer code the model was trained on.
    pub fn code(self) -> u8 {
        match self {
            Self::Sales => 0,
            Self::Accounting => 1,
            Self::Hr => 2,
            Self::Technical => 3,
            Self::Support => 4,
            Self::Management => 5,
            Self::It => 6,
            Self::ProductMng => 7,
            Self::Marketing => 8,
            Self::RandD => 9,
        }
    }

    /// Wire name, as it appears in requests and in the training data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Accounting => "accounting",
            Self::Hr => "hr",
            Self::Technical => "technical",
            Self::Support => "support",
            Self::Management => "management",
            Self::It => "IT",
            Self::ProductMng => "product_mng",
            Self::Marketing => "marketing",
            Self::RandD => "RandD",
        }
    }
}

impl FromStr for Department {
    type Err = EncodingError;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| EncodingError::InvalidCategory {
                field: "department",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Salary band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalaryLevel {
    Low,
    Medium,
    High,
}

impl SalaryLevel {
    pub const ALL: [SalaryLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn code(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for SalaryLevel {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| EncodingError::InvalidCategory {
                field: "salary_level",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SalaryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
