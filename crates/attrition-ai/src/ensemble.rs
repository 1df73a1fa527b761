//! Pure-Rust tree ensemble backend.
//!
//! Evaluates random forests and gradient-boosted trees exported from
//! scikit-learn as JSON. Each tree is a flat node list with node 0 as the
//! root; child indices always point forward, which `validate` enforces so
//! traversal terminates.
//!
//! scikit-learn casts inputs to `f32` before walking its trees, so split
//! comparisons here do the same to land on identical leaves.

use std::path::Path;

use attrition_core::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, PredictionResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::{Classifier, ModelInfo};
use crate::error::ModelError;

/// Artifact format version understood by this loader.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleKind {
    /// Leaves hold the class-1 fraction; probability is the mean over trees.
    RandomForest,
    /// Leaves hold raw log-odds increments; probability is the sigmoid of
    /// `init_score + learning_rate * sum`.
    GradientBoosting,
}

impl EnsembleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::GradientBoosting => "gradient_boosting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Go to `left` if `f32(x[feature]) <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(format!("node {i}: feature index {feature} out of range"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i}: non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= i || child >= len {
                            return Err(format!("node {i}: child index {child} is invalid"));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {i}: non-finite leaf value"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `x`. Only called on validated trees.
    fn evaluate(&self, x: &[f32; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if f64::from(x[feature]) <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn leaves(&self) -> impl Iterator<Item = f64> + '_ {
        self.nodes.iter().filter_map(|n| match n {
            Node::Leaf { value } => Some(*value),
            Node::Split { .. } => None,
        })
    }
}

/// Binary classifier over the nine attrition features.
///
/// Deserializing goes through [`ArtifactFields`], so an ensemble that fails
/// `validate` can never be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArtifactFields")]
pub struct TreeEnsemble {
    format_version: u32,
    kind: EnsembleKind,
    feature_names: Vec<String>,
    trees: Vec<Tree>,
    learning_rate: f64,
    init_score: f64,
}

/// The artifact as written to disk, before validation.
#[derive(Debug, Deserialize)]
struct ArtifactFields {
    format_version: u32,
    kind: EnsembleKind,
    feature_names: Vec<String>,
    trees: Vec<Tree>,
    #[serde(default = "default_learning_rate")]
    learning_rate: f64,
    #[serde(default)]
    init_score: f64,
}

fn default_learning_rate() -> f64 {
    1.0
}

impl TryFrom<ArtifactFields> for TreeEnsemble {
    type Error = ModelError;

    fn try_from(raw: ArtifactFields) -> Result<Self, Self::Error> {
        let model = Self {
            format_version: raw.format_version,
            kind: raw.kind,
            feature_names: raw.feature_names,
            trees: raw.trees,
            learning_rate: raw.learning_rate,
            init_score: raw.init_score,
        };
        model.validate()?;
        Ok(model)
    }
}

impl TreeEnsemble {
    /// Build an ensemble over the standard feature layout.
    pub fn new(
        kind: EnsembleKind,
        trees: Vec<Tree>,
        learning_rate: f64,
        init_score: f64,
    ) -> Result<Self, ModelError> {
        let model = Self {
            format_version: FORMAT_VERSION,
            kind,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            trees,
            learning_rate,
            init_score,
        };
        model.validate()?;
        Ok(model)
    }

    /// Read and validate a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&text)?;
        info!(
            kind = model.kind.as_str(),
            trees = model.trees.len(),
            model = %path.display(),
            "loaded tree ensemble"
        );
        Ok(model)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        // Parse and validate separately so validation failures keep their
        // `Invalid` variant instead of surfacing as JSON errors.
        let raw: ArtifactFields = serde_json::from_str(text)?;
        Self::try_from(raw)
    }

    pub fn kind(&self) -> EnsembleKind {
        self.kind
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Probability of the positive class.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let x = features.to_f32();
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(&x)).sum();
        match self.kind {
            EnsembleKind::RandomForest => sum / self.trees.len() as f64,
            EnsembleKind::GradientBoosting => {
                sigmoid(self.init_score + self.learning_rate * sum)
            }
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::Invalid(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }

        // Column order mismatches corrupt predictions silently; refuse them.
        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(have, want)| have != want)
        {
            return Err(ModelError::Invalid(format!(
                "feature_names {:?} do not match expected order {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }

        if self.trees.is_empty() {
            return Err(ModelError::Invalid("ensemble has no trees".into()));
        }
        if !self.learning_rate.is_finite() || !self.init_score.is_finite() {
            return Err(ModelError::Invalid(
                "learning_rate and init_score must be finite".into(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|e| ModelError::Invalid(format!("tree {i}: {e}")))?;
            if self.kind == EnsembleKind::RandomForest
                && tree.leaves().any(|v| !(0.0..=1.0).contains(&v))
            {
                return Err(ModelError::Invalid(format!(
                    "tree {i}: random forest leaf outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl Classifier for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        let left_probability = self.probability(features);
        Ok(PredictionResult {
            // Ties go to class 0, matching argmax over [p0, p1].
            left: left_probability > 0.5,
            left_probability,
        })
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            backend: format!("tree-ensemble/{}", self.kind.as_str()),
            path: None,
            trees: Some(self.trees.len()),
            feature_names: self.feature_names.clone(),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("emp_attrition_model.json")
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Node {
        Node::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn leaf(value: f64) -> Node {
        Node::Leaf { value }
    }

    fn stump(feature: usize, threshold: f64, lo: f64, hi: f64) -> Tree {
        Tree::new(vec![split(feature, threshold, 1, 2), leaf(lo), leaf(hi)])
    }

    fn features(values: [f64; FEATURE_COUNT]) -> FeatureVector {
        FeatureVector::from(values)
    }

    const BASELINE: [f64; FEATURE_COUNT] = [0.5, 0.7, 3.0, 160.0, 3.0, 0.0, 0.0, 0.0, 0.0];
    const AT_RISK: [f64; FEATURE_COUNT] = [0.1, 0.5, 2.0, 300.0, 3.0, 0.0, 0.0, 0.0, 0.0];

    #[test]
    fn fixture_loads() {
        let model = TreeEnsemble::load(&fixture_path()).unwrap();
        assert_eq!(model.kind(), EnsembleKind::RandomForest);
        assert_eq!(model.tree_count(), 3);
    }

    #[test]
    fn fixture_scores_baseline_as_stay() {
        let model = TreeEnsemble::load(&fixture_path()).unwrap();
        let r = model.predict(&features(BASELINE)).unwrap();
        assert!(!r.left);
        assert!((r.left_probability - 0.15).abs() < 1e-9, "{}", r.left_probability);
    }

    #[test]
    fn fixture_scores_overworked_unhappy_employee_as_leave() {
        let model = TreeEnsemble::load(&fixture_path()).unwrap();
        let r = model.predict(&features(AT_RISK)).unwrap();
        assert!(r.left);
        assert!((r.left_probability - 2.3 / 3.0).abs() < 1e-9, "{}", r.left_probability);
    }

    #[test]
    fn random_forest_averages_leaves() {
        let model = TreeEnsemble::new(
            EnsembleKind::RandomForest,
            vec![stump(0, 0.5, 1.0, 0.0), stump(0, 0.5, 0.5, 0.0)],
            1.0,
            0.0,
        )
        .unwrap();
        let mut x = BASELINE;
        x[0] = 0.2;
        assert!((model.probability(&features(x)) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn random_forest_tie_is_stay() {
        let model = TreeEnsemble::new(
            EnsembleKind::RandomForest,
            vec![stump(0, 0.5, 1.0, 0.0), stump(0, 0.5, 0.0, 0.0)],
            1.0,
            0.0,
        )
        .unwrap();
        let mut x = BASELINE;
        x[0] = 0.2;
        let r = model.predict(&features(x)).unwrap();
        assert_eq!(r.left_probability, 0.5);
        assert!(!r.left);
    }

    #[test]
    fn gradient_boosting_applies_sigmoid() {
        let model = TreeEnsemble::new(
            EnsembleKind::GradientBoosting,
            vec![stump(3, 200.0, -1.0, 2.0), stump(3, 200.0, -1.0, 2.0)],
            0.5,
            -0.25,
        )
        .unwrap();

        // 160 hours: -0.25 + 0.5 * (-2) = -1.25
        let low = model.probability(&features(BASELINE));
        assert!((low - sigmoid(-1.25)).abs() < 1e-12);

        // 300 hours: -0.25 + 0.5 * 4 = 1.75
        let high = model.predict(&features(AT_RISK)).unwrap();
        assert!((high.left_probability - sigmoid(1.75)).abs() < 1e-12);
        assert!(high.left);
    }

    #[test]
    fn split_compares_at_f32_precision() {
        // 0.1f64 rounds up when narrowed to f32, so it lands right of a
        // threshold equal to 0.1f64.
        let model = TreeEnsemble::new(
            EnsembleKind::RandomForest,
            vec![stump(0, 0.1, 0.0, 1.0)],
            1.0,
            0.0,
        )
        .unwrap();
        let mut x = BASELINE;
        x[0] = 0.1;
        assert_eq!(model.probability(&features(x)), 1.0);
    }

    #[test]
    fn permuted_feature_names_are_rejected() {
        let text = std::fs::read_to_string(fixture_path()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let names = value["feature_names"].as_array_mut().unwrap();
        names.swap(7, 8);
        let err = TreeEnsemble::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)), "{err}");
    }

    #[test]
    fn backward_child_pointer_is_rejected() {
        let tree = Tree::new(vec![split(0, 0.5, 1, 2), split(1, 0.5, 0, 2), leaf(0.0)]);
        let err = TreeEnsemble::new(EnsembleKind::RandomForest, vec![tree], 1.0, 0.0)
            .unwrap_err();
        assert!(err.to_string().contains("child index 0"), "{err}");
    }

    #[test]
    fn forward_child_past_end_is_rejected() {
        let tree = Tree::new(vec![split(0, 0.5, 7, 9), leaf(0.0), leaf(1.0)]);
        let err = TreeEnsemble::new(EnsembleKind::RandomForest, vec![tree], 1.0, 0.0)
            .unwrap_err();
        assert!(err.to_string().contains("child index 7"), "{err}");
    }

    #[test]
    fn direct_deserialization_validates() {
        let text = std::fs::read_to_string(fixture_path()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
        value["trees"][0]["nodes"][0]["left"] = serde_json::json!(7);
        value["trees"][0]["nodes"][0]["right"] = serde_json::json!(9);
        let err = serde_json::from_value::<TreeEnsemble>(value).unwrap_err();
        assert!(err.to_string().contains("child index"), "{err}");

        let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
        value["feature_names"] = serde_json::json!([]);
        assert!(serde_json::from_value::<TreeEnsemble>(value).is_err());
    }

    #[test]
    fn direct_deserialization_accepts_valid_artifact() {
        let text = std::fs::read_to_string(fixture_path()).unwrap();
        let model: TreeEnsemble = serde_json::from_str(&text).unwrap();
        assert_eq!(model, TreeEnsemble::from_json(&text).unwrap());
        assert!(!model.predict(&features(BASELINE)).unwrap().left);
    }

    #[test]
    fn out_of_range_feature_is_rejected() {
        let tree = stump(FEATURE_COUNT, 0.5, 0.0, 1.0);
        assert!(TreeEnsemble::new(EnsembleKind::RandomForest, vec![tree], 1.0, 0.0).is_err());
    }

    #[test]
    fn forest_leaf_above_one_is_rejected() {
        let tree = stump(0, 0.5, 0.0, 1.5);
        assert!(TreeEnsemble::new(EnsembleKind::RandomForest, vec![tree.clone()], 1.0, 0.0).is_err());
        // Boosted trees carry log-odds, so the same leaf is fine there.
        assert!(TreeEnsemble::new(EnsembleKind::GradientBoosting, vec![tree], 0.1, 0.0).is_ok());
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        assert!(TreeEnsemble::new(EnsembleKind::RandomForest, vec![], 1.0, 0.0).is_err());
    }

    #[test]
    fn wrong_format_version_is_rejected() {
        let text = std::fs::read_to_string(fixture_path()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
        value["format_version"] = serde_json::json!(2);
        assert!(TreeEnsemble::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            TreeEnsemble::from_json("not json"),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn describe_reports_backend_and_trees() {
        let model = TreeEnsemble::load(&fixture_path()).unwrap();
        let info = model.describe();
        assert_eq!(info.backend, "tree-ensemble/random_forest");
        assert_eq!(info.trees, Some(3));
        assert_eq!(info.feature_names, FEATURE_NAMES);
    }
}
