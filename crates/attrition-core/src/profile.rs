//! Employee profile: the input both front-ends collect.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Attributes of one employee, as submitted by a caller.
///
/// Department and salary level stay as raw strings here; they are only
/// checked against the code tables when the profile is encoded.
///
/// Deserialization also accepts the column names used by the training data
/// (`average_montly_hours`, `Work_accident`, `promotion_last_5years`,
/// `Department`, `salary`) and 0/1 for the boolean fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub satisfaction_level: f64,
    pub last_evaluation: f64,
    pub number_project: u32,
    #[serde(alias = "average_montly_hours")]
    pub average_monthly_hours: u32,
    pub time_spend_company: u32,
    #[serde(alias = "Work_accident", deserialize_with = "deserialize_flag")]
    pub had_work_accident: bool,
    #[serde(alias = "promotion_last_5years", deserialize_with = "deserialize_flag")]
    pub promoted_last_5_years: bool,
    #[serde(alias = "Department")]
    pub department: String,
    #[serde(alias = "salary")]
    pub salary_level: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl EmployeeProfile {
    /// Check numeric fields against their documented ranges.
    ///
    /// Unsigned types already rule out negative counts; what remains is the
    /// unit interval for the two scores and the lower bounds on projects
    /// and hours.
    pub fn validate(&self) -> Result<(), ValidationError> {
        unit_interval("satisfaction_level", self.satisfaction_level)?;
        unit_interval("last_evaluation", self.last_evaluation)?;
        if self.number_project < 1 {
            return Err(ValidationError::OutOfRange {
                field: "number_project",
                expected: "at least 1",
                value: self.number_project.to_string(),
            });
        }
        if self.average_monthly_hours == 0 {
            return Err(ValidationError::OutOfRange {
                field: "average_monthly_hours",
                expected: "greater than 0",
                value: self.average_monthly_hours.to_string(),
            });
        }
        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            expected: "within [0, 1]",
            value: value.to_string(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(D::Error::custom(format!("expected 0 or 1, got {n}"))),
    }
}
