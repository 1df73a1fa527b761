//! Feature encoding: employee profile → fixed-order numeric vector.
//!
//! The column order is load-bearing. The classifier was fitted on exactly
//! this layout and a permutation corrupts predictions without any error, so
//! the order lives in one place ([`FEATURE_NAMES`]) and model loaders check
//! their artifacts against it.

use thiserror::Error;

use crate::category::{Department, SalaryLevel};
use crate::profile::EmployeeProfile;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 9;

/// Column names in model input order, as named in the training data.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "satisfaction_level",
    "last_evaluation",
    "number_project",
    "average_montly_hours",
    "time_spend_company",
    "Work_accident",
    "promotion_last_5years",
    "Department",
    "salary",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Department or salary level outside the fixed code tables.
    #[error("Invalid Department or Salary value.")]
    InvalidCategory { field: &'static str, value: String },
}

/// Model input in [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Values narrowed to `f32`, the precision ONNX and scikit-learn trees
    /// evaluate at.
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        self.0.map(|v| v as f32)
    }

    /// Pairs of (column name, value), for display and debug logging.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Encode a profile into the model's input layout.
///
/// Numeric fields pass through unchanged; booleans become 0/1; department
/// and salary level are replaced by their codes. Range checks are not done
/// here, see [`EmployeeProfile::validate`].
pub fn encode(profile: &EmployeeProfile) -> Result<FeatureVector, EncodingError> {
    let department: Department = profile.department.parse()?;
    let salary: SalaryLevel = profile.salary_level.parse()?;

    Ok(FeatureVector([
        profile.satisfaction_level,
        profile.last_evaluation,
        f64::from(profile.number_project),
        f64::from(profile.average_monthly_hours),
        f64::from(profile.time_spend_company),
        flag(profile.had_work_accident),
        flag(profile.promoted_last_5_years),
        f64::from(department.code()),
        f64::from(salary.code()),
    ]))
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}
