use serde::{Deserialize, Serialize};

/// Model verdict for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class is "will leave".
    pub left: bool,
    /// Probability mass on the "will leave" class, in [0, 1].
    pub left_probability: f64,
}

impl PredictionResult {
    /// Human-readable verdict, as shown by the form and the CLI.
    pub fn summary(&self) -> String {
        if self.left {
            format!(
                "Employee is likely to LEAVE. (Probability: {:.2})",
                self.left_probability
            )
        } else {
            format!(
                "Employee is likely to STAY. (Probability of leaving: {:.2})",
                self.left_probability
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_for_leave() {
        let r = PredictionResult {
            left: true,
            left_probability: 0.834,
        };
        assert_eq!(r.summary(), "Employee is likely to LEAVE. (Probability: 0.83)");
    }

    #[test]
    fn summary_for_stay() {
        let r = PredictionResult {
            left: false,
            left_probability: 0.15,
        };
        assert_eq!(
            r.summary(),
            "Employee is likely to STAY. (Probability of leaving: 0.15)"
        );
    }

    #[test]
    fn serializes_with_wire_names() {
        let r = PredictionResult {
            left: true,
            left_probability: 0.5,
        };
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json, serde_json::json!({"left": true, "left_probability": 0.5}));
    }
}
