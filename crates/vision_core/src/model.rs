//! The model capability seam: anything that turns an image path into display text.

use std::cmp::Ordering;
use std::path::Path;

use crate::config::VisionConfig;
use crate::error::{InferenceError, ModelKind, VisionError};
use crate::format::{ClassificationEntry, FaceBox, format_classification, format_faces};
use crate::path::ImagePath;

/// Number of ranked predictions shown for a classification.
pub const TOP_PREDICTIONS: usize = 3;

/// A runnable model that reports in-band.
pub trait ImageModel {
    fn kind(&self) -> ModelKind;

    /// Run the model and render its output, or the failure, for display.
    fn try_run(&self, path: &ImagePath) -> Result<String, VisionError>;

    /// Like [`ImageModel::try_run`] but failures become their message text.
    fn run(&self, path: &ImagePath) -> String {
        match self.try_run(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("{} failed for {}: {err}", self.kind(), path);
                err.to_string()
            }
        }
    }
}

/// Opaque image classifier.
pub trait Classify {
    /// Ranked predictions for the image at `path`.
    fn classify(&self, path: &Path) -> Result<Vec<ClassificationEntry>, InferenceError>;
}

/// Opaque face detector.
pub trait DetectFaces {
    fn detect_faces(&self, path: &Path) -> Result<Vec<FaceBox>, InferenceError>;
}

impl<T: Classify + ?Sized> Classify for Box<T> {
    fn classify(&self, path: &Path) -> Result<Vec<ClassificationEntry>, InferenceError> {
        (**self).classify(path)
    }
}

impl<T: DetectFaces + ?Sized> DetectFaces for Box<T> {
    fn detect_faces(&self, path: &Path) -> Result<Vec<FaceBox>, InferenceError> {
        (**self).detect_faces(path)
    }
}

/// Classification capability over any [`Classify`] backend.
#[derive(Debug, Clone)]
pub struct Classifier<B> {
    backend: B,
}

impl<B: Classify> Classifier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: Classify> ImageModel for Classifier<B> {
    fn kind(&self) -> ModelKind {
        ModelKind::Classifier
    }

    fn try_run(&self, path: &ImagePath) -> Result<String, VisionError> {
        let mut entries = self
            .backend
            .classify(path.as_path())
            .map_err(|e| VisionError::from_inference(self.kind(), e))?;
        rank_top(&mut entries, TOP_PREDICTIONS);
        tracing::debug!("classified {} ({} predictions)", path, entries.len());
        Ok(format_classification(&entries))
    }
}

/// Face detection capability over any [`DetectFaces`] backend.
#[derive(Debug, Clone)]
pub struct FaceDetector<B> {
    backend: B,
}

impl<B: DetectFaces> FaceDetector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: DetectFaces> ImageModel for FaceDetector<B> {
    fn kind(&self) -> ModelKind {
        ModelKind::FaceDetector
    }

    fn try_run(&self, path: &ImagePath) -> Result<String, VisionError> {
        let boxes = self
            .backend
            .detect_faces(path.as_path())
            .map_err(|e| VisionError::from_inference(self.kind(), e))?;
        tracing::debug!("detected {} face(s) in {}", boxes.len(), path);
        Ok(format_faces(&boxes))
    }
}

/// Build the ONNX-backed model for `kind`.
///
/// Load failures come back as [`VisionError::ModelLoad`] so the caller can
/// show them like any other result.
pub fn load_model(
    kind: ModelKind,
    cfg: &VisionConfig,
) -> Result<Box<dyn ImageModel>, VisionError> {
    build_model(kind, cfg).map_err(|e| {
        tracing::error!("cannot load {kind} model: {e:#}");
        VisionError::ModelLoad {
            kind,
            message: format!("{e:#}"),
        }
    })
}

#[cfg(feature = "ort")]
fn build_model(kind: ModelKind, cfg: &VisionConfig) -> anyhow::Result<Box<dyn ImageModel>> {
    use crate::onnx::{ResNetOrt, UltraFaceOrt};

    let model: Box<dyn ImageModel> = match kind {
        ModelKind::Classifier => Box::new(Classifier::new(ResNetOrt::new(&cfg.classifier)?)),
        ModelKind::FaceDetector => {
            Box::new(FaceDetector::new(UltraFaceOrt::new(&cfg.face_detector)?))
        }
    };
    Ok(model)
}

#[cfg(not(feature = "ort"))]
fn build_model(_kind: ModelKind, _cfg: &VisionConfig) -> anyhow::Result<Box<dyn ImageModel>> {
    anyhow::bail!("this build has no ONNX Runtime support (enable the `onnx` feature)")
}

/// Sort by descending confidence (stable for ties) and keep the first `k`.
pub fn rank_top(entries: &mut Vec<ClassificationEntry>, k: usize) {
    entries.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    entries.truncate(k);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<ClassificationEntry>);

    impl Classify for Fixed {
        fn classify(&self, _path: &Path) -> Result<Vec<ClassificationEntry>, InferenceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn classifier_ranks_and_truncates() {
        let model = Classifier::new(Fixed(vec![
            ClassificationEntry::new("d", 0.05),
            ClassificationEntry::new("a", 0.6),
            ClassificationEntry::new("c", 0.1),
            ClassificationEntry::new("b", 0.25),
        ]));
        let path = ImagePath::validate("x.jpg").unwrap();
        assert_eq!(model.run(&path), "a: 60.00%\nb: 25.00%\nc: 10.00%");
        assert_eq!(model.kind(), ModelKind::Classifier);
    }

    #[test]
    fn rank_top_is_stable_for_ties() {
        let mut entries = vec![
            ClassificationEntry::new("first", 0.5),
            ClassificationEntry::new("second", 0.5),
        ];
        rank_top(&mut entries, 3);
        assert_eq!(entries[0].label, "first");
        assert_eq!(entries[1].label, "second");
    }

    #[cfg(not(feature = "ort"))]
    #[test]
    fn load_without_runtime_reports_in_band() {
        let err = load_model(ModelKind::FaceDetector, &VisionConfig::default())
            .err()
            .expect("no runtime compiled in");
        assert!(matches!(
            err,
            VisionError::ModelLoad {
                kind: ModelKind::FaceDetector,
                ..
            }
        ));
        assert!(
            err.to_string()
                .starts_with("Error loading Face Detection model:")
        );
    }

    #[cfg(feature = "ort")]
    #[test]
    fn load_with_missing_model_reports_in_band() {
        let mut cfg = VisionConfig::default();
        cfg.face_detector.model_path = "does/not/exist.onnx".into();
        let err = load_model(ModelKind::FaceDetector, &cfg)
            .err()
            .expect("model file is missing");
        assert!(err.to_string().contains("model file not found"));
    }

    #[test]
    fn boxed_backends_are_backends() {
        let boxed: Box<dyn Classify> = Box::new(Fixed(vec![ClassificationEntry::new("x", 1.0)]));
        let model = Classifier::new(boxed);
        let path = ImagePath::validate("x.png").unwrap();
        assert_eq!(model.try_run(&path).unwrap(), "x: 100.00%");
    }
}
