//! The one pipeline every front-end runs: encode → validate → infer.

use attrition_core::{EmployeeProfile, EncodingError, PredictionResult, ValidationError, encode};
use thiserror::Error;
use tracing::debug;

use crate::classifier::ModelHandle;
use crate::error::ModelError;

#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Score one employee profile.
///
/// Category lookup runs first, so an unknown department or salary level is
/// always reported as such and the model is never called for it.
pub fn assess(
    model: &ModelHandle,
    profile: &EmployeeProfile,
) -> Result<PredictionResult, AssessError> {
    let features = encode(profile)?;
    profile.validate()?;
    let result = model.predict(&features)?;
    debug!(
        ?features,
        left = result.left,
        left_probability = result.left_probability,
        "scored profile"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use attrition_core::FeatureVector;

    use crate::classifier::{Classifier, ModelInfo};

    /// Records how often it is called and echoes satisfaction as probability.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Classifier for Counting {
        fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let p = features.as_slice()[0];
            Ok(PredictionResult {
                left: p > 0.5,
                left_probability: p,
            })
        }

        fn describe(&self) -> ModelInfo {
            ModelInfo {
                backend: "counting".into(),
                path: None,
                trees: None,
                feature_names: vec![],
            }
        }
    }

    fn setup() -> (Arc<Counting>, ModelHandle) {
        let counting = Arc::new(Counting::default());
        let handle = ModelHandle::from_arc(counting.clone());
        (counting, handle)
    }

    fn profile() -> EmployeeProfile {
        EmployeeProfile {
            satisfaction_level: 0.5,
            last_evaluation: 0.7,
            number_project: 3,
            average_monthly_hours: 160,
            time_spend_company: 3,
            had_work_accident: false,
            promoted_last_5_years: false,
            department: "sales".into(),
            salary_level: "low".into(),
        }
    }

    #[test]
    fn valid_profile_reaches_the_model() {
        let (counting, handle) = setup();
        let r = assess(&handle, &profile()).unwrap();
        assert_eq!(r.left_probability, 0.5);
        assert!(!r.left);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_category_never_calls_the_model() {
        let (counting, handle) = setup();
        for (dept, salary) in [("unknown_dept", "low"), ("sales", "gold"), ("", "")] {
            let mut p = profile();
            p.department = dept.into();
            p.salary_level = salary.into();
            let err = assess(&handle, &p).unwrap_err();
            assert!(matches!(err, AssessError::Encoding(_)));
            assert_eq!(err.to_string(), "Invalid Department or Salary value.");
        }
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn category_error_wins_over_range_error() {
        let (_, handle) = setup();
        let mut p = profile();
        p.department = "unknown_dept".into();
        p.satisfaction_level = 4.0;
        assert!(matches!(
            assess(&handle, &p),
            Err(AssessError::Encoding(_))
        ));
    }

    #[test]
    fn out_of_range_never_calls_the_model() {
        let (counting, handle) = setup();
        let mut p = profile();
        p.last_evaluation = -0.1;
        assert!(matches!(
            assess(&handle, &p),
            Err(AssessError::Validation(_))
        ));
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fixture_model_end_to_end() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../models/emp_attrition_model.json");
        let handle = ModelHandle::load(&path).unwrap();

        let stay = assess(&handle, &profile()).unwrap();
        assert!(!stay.left);

        let mut p = profile();
        p.satisfaction_level = 0.1;
        p.last_evaluation = 0.5;
        p.number_project = 2;
        p.average_monthly_hours = 300;
        let leave = assess(&handle, &p).unwrap();
        assert!(leave.left);
        assert!(leave.left_probability > stay.left_probability);
    }
}
