//! Model locations and tuning, loadable from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the ONNX ImageNet classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub input_size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/resnet50-v2-7.onnx"),
            labels_path: PathBuf::from("models/imagenet_labels.txt"),
            input_size: 224,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// Configuration for the Ultra-Light face detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceDetectorConfig {
    pub model_path: PathBuf,
    pub input_width: u32,
    pub input_height: u32,
    /// Minimum face score for a candidate box.
    pub score_threshold: f32,
    /// IoU above which the lower-scoring of two boxes is dropped.
    pub nms_threshold: f32,
    /// Maximum number of faces reported.
    pub top_k: usize,
}

impl Default for FaceDetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/version-RFB-320.onnx"),
            input_width: 320,
            input_height: 240,
            score_threshold: 0.7,
            nms_threshold: 0.3,
            top_k: 200,
        }
    }
}

/// All model settings used by the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub classifier: ClassifierConfig,
    pub face_detector: FaceDetectorConfig,
}

impl VisionConfig {
    /// Parse TOML; absent tables and keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(raw).context("invalid model configuration")?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Load `path` if it exists, otherwise defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn check(&self) -> Result<()> {
        anyhow::ensure!(
            self.classifier.input_size > 0,
            "classifier.input_size must be positive"
        );
        anyhow::ensure!(
            self.classifier.std.iter().all(|s| *s > 0.0),
            "classifier.std entries must be positive"
        );
        let fd = &self.face_detector;
        anyhow::ensure!(
            fd.input_width > 0 && fd.input_height > 0,
            "face_detector input size must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&fd.score_threshold),
            "face_detector.score_threshold must be in [0,1]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&fd.nms_threshold),
            "face_detector.nms_threshold must be in [0,1]"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_toml_is_default() -> Result<()> {
        assert_eq!(VisionConfig::from_toml_str("")?, VisionConfig::default());
        Ok(())
    }

    #[test]
    fn partial_tables_keep_other_defaults() -> Result<()> {
        let cfg = VisionConfig::from_toml_str(
            r#"
            [classifier]
            model_path = "/opt/models/mobilenet.onnx"

            [face_detector]
            score_threshold = 0.9
            "#,
        )?;
        assert_eq!(
            cfg.classifier.model_path,
            PathBuf::from("/opt/models/mobilenet.onnx")
        );
        assert_eq!(cfg.classifier.input_size, 224);
        assert_eq!(cfg.face_detector.score_threshold, 0.9);
        assert_eq!(cfg.face_detector.top_k, 200);
        Ok(())
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = VisionConfig::from_toml_str("[face_detector]\nnms_threshold = 1.5\n").unwrap_err();
        assert!(format!("{err:#}").contains("nms_threshold"));
    }

    #[test]
    fn missing_file_falls_back_to_default() -> Result<()> {
        let dir = tempdir()?;
        let cfg = VisionConfig::load_or_default(dir.path().join("models.toml"))?;
        assert_eq!(cfg, VisionConfig::default());
        Ok(())
    }

    #[test]
    fn load_reads_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("models.toml");
        fs::write(&path, "[classifier]\ninput_size = 299\n")?;
        let cfg = VisionConfig::load_or_default(&path)?;
        assert_eq!(cfg.classifier.input_size, 299);
        Ok(())
    }
}
