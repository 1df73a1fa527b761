//! Core types for attrition scoring: employee profile, category codes, and
//! the feature encoding shared by every front-end.

pub mod category;
pub mod features;
pub mod prediction;
pub mod profile;

pub use category::{Department, SalaryLevel};
pub use features::{EncodingError, FEATURE_COUNT, FEATURE_NAMES, FeatureVector, encode};
pub use prediction::PredictionResult;
pub use profile::{EmployeeProfile, ValidationError};
