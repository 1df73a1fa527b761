//! Model adapter: the classifier seam and the process-wide model handle.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use attrition_core::{FeatureVector, PredictionResult};
use tracing::info;

use crate::ensemble::TreeEnsemble;
use crate::error::ModelError;

/// A trained binary classifier over the attrition feature layout.
///
/// Implementations must be deterministic: the same vector yields the same
/// result for the lifetime of the instance.
pub trait Classifier: Send + Sync {
    /// Predicted class and positive-class probability for one vector.
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError>;

    fn describe(&self) -> ModelInfo;
}

/// Description of a loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub backend: String,
    /// Artifact path. Backends leave this empty; [`ModelHandle`] fills it in.
    pub path: Option<PathBuf>,
    /// Tree count, for ensemble backends.
    pub trees: Option<usize>,
    pub feature_names: Vec<String>,
}

/// Shared, read-only handle to the loaded classifier.
///
/// Created once at startup and cloned into every front-end.
#[derive(Clone)]
pub struct ModelHandle {
    classifier: Arc<dyn Classifier>,
    source: Option<PathBuf>,
}

impl ModelHandle {
    /// Load a model artifact, picking the backend from the file extension.
    ///
    /// - `.json`: [`TreeEnsemble`]
    /// - `.onnx`: ONNX Runtime (requires the `onnx` feature)
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let classifier: Arc<dyn Classifier> = match extension.as_deref() {
            Some("json") => Arc::new(TreeEnsemble::load(path)?),
            #[cfg(feature = "onnx")]
            Some("onnx") => Arc::new(crate::onnx::OnnxClassifier::load(path)?),
            #[cfg(not(feature = "onnx"))]
            Some("onnx") => {
                return Err(ModelError::Unsupported(format!(
                    "{} is an ONNX model but this build lacks the `onnx` feature",
                    path.display()
                )));
            }
            _ => {
                return Err(ModelError::Unsupported(format!(
                    "{}: expected a .json or .onnx artifact",
                    path.display()
                )));
            }
        };

        let handle = Self {
            classifier,
            source: Some(path.to_path_buf()),
        };
        info!(
            backend = %handle.describe().backend,
            model = %path.display(),
            "model ready"
        );
        Ok(handle)
    }

    /// Wrap an in-memory classifier.
    pub fn new(classifier: impl Classifier + 'static) -> Self {
        Self::from_arc(Arc::new(classifier))
    }

    pub fn from_arc(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            source: None,
        }
    }

    /// Score one vector.
    ///
    /// A probability outside [0, 1] means the backend is broken, so it is
    /// reported as an inference error rather than passed on.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        let result = self.classifier.predict(features)?;
        let p = result.left_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ModelError::Inference(format!(
                "model returned probability {p} outside [0, 1]"
            )));
        }
        Ok(result)
    }

    pub fn describe(&self) -> ModelInfo {
        let mut info = self.classifier.describe();
        info.path = self.source.clone();
        info
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("info", &self.describe())
            .finish()
    }
}
