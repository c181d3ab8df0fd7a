//! Core of the image insight tool.
//!
//! Validates picked image paths, runs them through opaque classification
//! and face-detection models, and renders the results as display text.
//! Failures are reported in-band as text rather than propagated.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
#[cfg(feature = "ort")]
pub mod onnx;
pub mod path;
pub mod postprocess;
pub mod preprocess;
pub mod session;

pub use config::{ClassifierConfig, FaceDetectorConfig, VisionConfig};
pub use error::{InferenceError, ModelKind, VisionError};
pub use format::{
    ClassificationEntry, FaceBox, NO_FACE_FOUND, format_classification, format_faces,
};
pub use model::{Classifier, Classify, DetectFaces, FaceDetector, ImageModel, load_model};
#[cfg(feature = "ort")]
pub use onnx::{ResNetOrt, UltraFaceOrt};
pub use path::{ACCEPTED_EXTENSIONS, ImagePath, validate};
pub use session::{SelectOutcome, UPLOAD_SUCCESS, run_selected, select};

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
