//! ONNX Runtime backends for the classifier and the face detector.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use ndarray::{Array, CowArray};
use once_cell::sync::OnceCell;
use ort::{
    GraphOptimizationLevel, SessionBuilder, environment::Environment, session::Session,
    tensor::OrtOwnedTensor, value::Value,
};

use crate::config::{ClassifierConfig, FaceDetectorConfig};
use crate::error::InferenceError;
use crate::format::{ClassificationEntry, FaceBox};
use crate::model::{Classify, DetectFaces, TOP_PREDICTIONS};
use crate::postprocess::faces_from_outputs;
use crate::preprocess::{
    is_distribution, normalize_channel, open_image, parse_labels, resize_rgb, softmax, to_nchw,
    top_k_indices,
};

static ORT_ENV: OnceCell<Arc<Environment>> = OnceCell::new();

fn environment() -> Result<Arc<Environment>> {
    ORT_ENV
        .get_or_try_init(|| {
            let env = Environment::builder()
                .with_name("image-insight")
                .build()
                .context("failed to initialize ONNX Runtime environment")?;
            Ok::<_, anyhow::Error>(env.into_arc())
        })
        .cloned()
}

fn load_session(model_path: &Path) -> Result<Session> {
    if !model_path.exists() {
        anyhow::bail!("model file not found: {}", model_path.display());
    }
    let env = environment()?;
    let session = SessionBuilder::new(&env)?
        .with_optimization_level(GraphOptimizationLevel::Level1)?
        .with_model_from_file(model_path)
        .with_context(|| format!("cannot load model {}", model_path.display()))?;
    tracing::info!("loaded ONNX model {}", model_path.display());
    Ok(session)
}

/// Run a single NCHW tensor through `session` and flatten every f32 output.
fn run_nchw(session: &Session, data: Vec<f32>, height: u32, width: u32) -> Result<Vec<Vec<f32>>> {
    let array = Array::from_shape_vec((1, 3, height as usize, width as usize), data)
        .context("input tensor shape mismatch")?
        .into_dyn();
    let cow = CowArray::from(array.view());
    let input = Value::from_array(session.allocator(), &cow)
        .map_err(|e| anyhow!("cannot build input tensor: {e}"))?;
    let outputs: Vec<Value> = session.run(vec![input])?;
    if outputs.is_empty() {
        anyhow::bail!("model produced no output");
    }
    outputs
        .iter()
        .map(|value| -> Result<Vec<f32>> {
            let tensor: OrtOwnedTensor<f32, _> = value.try_extract()?;
            Ok(tensor.view().iter().cloned().collect())
        })
        .collect()
}

/// ImageNet classifier (ResNet50 by default) backed by ONNX Runtime.
pub struct ResNetOrt {
    session: Session,
    labels: Vec<String>,
    input_size: u32,
    mean: [f32; 3],
    std: [f32; 3],
}

impl ResNetOrt {
    pub fn new(cfg: &ClassifierConfig) -> Result<Self> {
        if !cfg.labels_path.exists() {
            anyhow::bail!("labels file not found: {}", cfg.labels_path.display());
        }
        let session = load_session(&cfg.model_path)?;
        let raw = fs::read_to_string(&cfg.labels_path).context("cannot read labels")?;
        let labels = parse_labels(&raw);
        if labels.is_empty() {
            anyhow::bail!("labels file contains no labels");
        }
        Ok(Self {
            session,
            labels,
            input_size: cfg.input_size,
            mean: cfg.mean,
            std: cfg.std,
        })
    }

    fn scores(&self, path: &Path) -> Result<Vec<f32>, InferenceError> {
        let img = open_image(path)?;
        let rgb = resize_rgb(&img, self.input_size, self.input_size);
        let data = to_nchw(&rgb, |c, v| normalize_channel(v, self.mean[c], self.std[c]));
        let mut outputs = run_nchw(&self.session, data, self.input_size, self.input_size)?;
        let scores = outputs.swap_remove(0);
        if scores.is_empty() {
            return Err(anyhow!("empty logits").into());
        }
        if scores.len() != self.labels.len() {
            tracing::warn!(
                "model has {} classes but {} labels were loaded",
                scores.len(),
                self.labels.len()
            );
        }
        Ok(if is_distribution(&scores) {
            scores
        } else {
            softmax(&scores)
        })
    }
}

impl Classify for ResNetOrt {
    fn classify(&self, path: &Path) -> Result<Vec<ClassificationEntry>, InferenceError> {
        let probs = self.scores(path)?;
        Ok(top_k_indices(&probs, TOP_PREDICTIONS)
            .into_iter()
            .map(|idx| {
                let label = self
                    .labels
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("class_{idx}"));
                ClassificationEntry::new(label, probs[idx])
            })
            .collect())
    }
}

/// Ultra-Light-Fast generic face detector backed by ONNX Runtime.
pub struct UltraFaceOrt {
    session: Session,
    cfg: FaceDetectorConfig,
}

impl UltraFaceOrt {
    pub fn new(cfg: &FaceDetectorConfig) -> Result<Self> {
        let session = load_session(&cfg.model_path)?;
        Ok(Self {
            session,
            cfg: cfg.clone(),
        })
    }
}

impl DetectFaces for UltraFaceOrt {
    fn detect_faces(&self, path: &Path) -> Result<Vec<FaceBox>, InferenceError> {
        let img = open_image(path)?;
        let (w, h) = (self.cfg.input_width, self.cfg.input_height);
        let rgb = resize_rgb(&img, w, h);
        let data = to_nchw(&rgb, |_, v| (v as f32 - 127.0) / 128.0);
        let outputs = run_nchw(&self.session, data, h, w)?;
        let [scores, boxes] = outputs.as_slice() else {
            return Err(anyhow!("expected 2 outputs (scores, boxes), got {}", outputs.len()).into());
        };
        let faces = faces_from_outputs(scores, boxes, (img.width(), img.height()), &self.cfg)?;
        Ok(faces)
    }
}
