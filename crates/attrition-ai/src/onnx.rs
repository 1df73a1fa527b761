//! ONNX Runtime backend for classifiers converted from scikit-learn.
//!
//! Expects the converter's output with ZipMap disabled: a single float32
//! input of shape `[N, 9]`, output 0 holding int64 labels and output 1 the
//! float32 class probabilities `[N, 2]`.

use std::path::Path;
use std::sync::Mutex;

use attrition_core::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, PredictionResult};
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{Tensor, ValueType};
use tracing::info;

use crate::classifier::{Classifier, ModelInfo};
use crate::error::ModelError;

/// Class index of "will leave".
const POSITIVE_CLASS: i64 = 1;

pub struct OnnxClassifier {
    // `Session::run` needs exclusive access.
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(onnx_err)?
            .commit_from_file(path)
            .map_err(onnx_err)?;

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| ModelError::Invalid("ONNX model declares no inputs".into()))?;
        let input_name = input.name().to_string();
        let (ty, dims) = tensor_layout(input.dtype(), "input")?;
        check_layout("input", ty, &dims, TensorElementType::Float32, FEATURE_COUNT as i64)?;

        let outputs = session.outputs();
        if outputs.len() < 2 {
            return Err(ModelError::Invalid(
                "ONNX model needs label and probability outputs (convert with zipmap=False)"
                    .into(),
            ));
        }
        let (ty, dims) = tensor_layout(outputs[1].dtype(), "probability output")?;
        check_layout("probability output", ty, &dims, TensorElementType::Float32, 2)?;

        info!(input = %input_name, model = %path.display(), "loaded ONNX classifier");
        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        let shape = [1i64, FEATURE_COUNT as i64];
        let values = features.to_f32().to_vec().into_boxed_slice();
        let input = Tensor::from_array((shape, values)).map_err(onnx_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ModelError::Inference("ONNX session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(onnx_err)?;

        let (_, labels) = outputs[0].try_extract_tensor::<i64>().map_err(onnx_err)?;
        let (_, probabilities) = outputs[1].try_extract_tensor::<f32>().map_err(onnx_err)?;

        let label = *labels
            .first()
            .ok_or_else(|| ModelError::Inference("empty label output".into()))?;
        if probabilities.len() < 2 {
            return Err(ModelError::Inference(format!(
                "expected 2 class probabilities, got {}",
                probabilities.len()
            )));
        }

        Ok(PredictionResult {
            left: label == POSITIVE_CLASS,
            left_probability: f64::from(probabilities[POSITIVE_CLASS as usize]),
        })
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            backend: "onnx".into(),
            path: None,
            trees: None,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn tensor_layout(
    value: &ValueType,
    what: &str,
) -> Result<(TensorElementType, Vec<i64>), ModelError> {
    match value {
        ValueType::Tensor { ty, shape, .. } => Ok((*ty, shape.to_vec())),
        other => Err(ModelError::Invalid(format!(
            "{what} must be a tensor, found {other:?}"
        ))),
    }
}

/// Require a rank-2 `[batch, width]` tensor of `want_ty`. The batch
/// dimension may be dynamic; the width may not.
fn check_layout(
    what: &str,
    ty: TensorElementType,
    dims: &[i64],
    want_ty: TensorElementType,
    width: i64,
) -> Result<(), ModelError> {
    if ty != want_ty {
        return Err(ModelError::Invalid(format!(
            "{what} element type is {ty:?}, expected {want_ty:?}"
        )));
    }
    if dims.len() != 2 || dims[1] != width {
        return Err(ModelError::Invalid(format!(
            "{what} shape is {dims:?}, expected [N, {width}]"
        )));
    }
    Ok(())
}

fn onnx_err(e: impl std::fmt::Display) -> ModelError {
    ModelError::Onnx(e.to_string())
}
