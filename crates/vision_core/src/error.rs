use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which capability produced a result or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    Classifier,
    FaceDetector,
}

impl ModelKind {
    /// Human-readable task name used in messages.
    pub fn task_name(self) -> &'static str {
        match self {
            ModelKind::Classifier => "Image Classification",
            ModelKind::FaceDetector => "Face Detection",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_name())
    }
}

/// Everything that can go wrong between picking a file and showing a result.
///
/// The `Display` text of each variant is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisionError {
    #[error("Selected file is not a valid image.")]
    InvalidExtension { path: String },
    #[error("Please select an image first!")]
    NoSelection,
    #[error("Error: File not found. Please select a valid image file.")]
    FileNotFound { path: PathBuf },
    #[error("Error in {kind}: {message}")]
    ModelFailure { kind: ModelKind, message: String },
    #[error("Error loading {kind} model: {message}")]
    ModelLoad { kind: ModelKind, message: String },
}

impl VisionError {
    /// True for errors detected before any model is touched.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            VisionError::InvalidExtension { .. } | VisionError::NoSelection
        )
    }

    /// Attach the model kind to a collaborator failure.
    pub fn from_inference(kind: ModelKind, err: InferenceError) -> Self {
        match err {
            InferenceError::FileNotFound(path) => VisionError::FileNotFound { path },
            InferenceError::Failure(source) => VisionError::ModelFailure {
                kind,
                message: format!("{source:#}"),
            },
        }
    }
}

/// Failure reported by an opaque model collaborator.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_errors_are_flagged() {
        assert!(VisionError::NoSelection.is_local());
        assert!(
            VisionError::InvalidExtension {
                path: "a.gif".into()
            }
            .is_local()
        );
        assert!(
            !VisionError::FileNotFound {
                path: PathBuf::from("a.jpg")
            }
            .is_local()
        );
    }

    #[test]
    fn inference_failure_carries_kind_and_chain() {
        let err = anyhow::anyhow!("bad header").context("decode failed");
        let mapped = VisionError::from_inference(ModelKind::FaceDetector, err.into());
        assert_eq!(
            mapped.to_string(),
            "Error in Face Detection: decode failed: bad header"
        );
    }

    #[test]
    fn missing_file_maps_to_fixed_message() {
        let mapped = VisionError::from_inference(
            ModelKind::Classifier,
            InferenceError::FileNotFound(PathBuf::from("gone.png")),
        );
        assert_eq!(
            mapped,
            VisionError::FileNotFound {
                path: PathBuf::from("gone.png")
            }
        );
        assert_eq!(
            mapped.to_string(),
            "Error: File not found. Please select a valid image file."
        );
    }

    #[test]
    fn load_error_names_the_task() {
        let err = VisionError::ModelLoad {
            kind: ModelKind::Classifier,
            message: "model file not found: models/x.onnx".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error loading Image Classification model: model file not found: models/x.onnx"
        );
    }
}
