//! Model adapter: loads the trained attrition classifier once and scores
//! encoded profiles. Tree ensembles are evaluated in pure Rust; ONNX models
//! run through ONNX Runtime behind the `onnx` feature.

mod classifier;
mod ensemble;
mod error;
#[cfg(feature = "onnx")]
mod onnx;
mod pipeline;

pub use classifier::{Classifier, ModelHandle, ModelInfo};
pub use ensemble::{EnsembleKind, FORMAT_VERSION, Node, Tree, TreeEnsemble};
pub use error::ModelError;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use pipeline::{AssessError, assess};
