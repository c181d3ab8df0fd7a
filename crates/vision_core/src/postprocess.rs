//! Face candidate decoding, non-maximum suppression, and pixel mapping.

use std::cmp::Ordering;

use anyhow::Result;

use crate::config::FaceDetectorConfig;
use crate::format::FaceBox;

/// Candidate face in normalised `[0,1]` corner coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
}

impl Candidate {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    /// Intersection over union with `other`.
    pub fn iou(&self, other: &Self) -> f32 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let intersection = w * h;
        if intersection <= 0.0 {
            return 0.0;
        }
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 { 0.0 } else { intersection / union }
    }

    /// Scale to an image of `width`×`height` pixels, clamped to its bounds.
    pub fn to_face_box(&self, width: u32, height: u32) -> FaceBox {
        let px = |v: f32, limit: u32| (v.clamp(0.0, 1.0) * limit as f32).round() as i32;
        FaceBox {
            top: px(self.y1, height),
            right: px(self.x2, width),
            bottom: px(self.y2, height),
            left: px(self.x1, width),
        }
    }
}

/// Decode Ultra-Light detector outputs.
///
/// `scores` is `[N, 2]` (background, face) and `boxes` is `[N, 4]`
/// (x1, y1, x2, y2), both flattened row-major.
pub fn decode_candidates(
    scores: &[f32],
    boxes: &[f32],
    score_threshold: f32,
) -> Result<Vec<Candidate>> {
    anyhow::ensure!(
        scores.len() % 2 == 0 && boxes.len() % 4 == 0,
        "face detector output has unexpected shape (scores {}, boxes {})",
        scores.len(),
        boxes.len()
    );
    let n = scores.len() / 2;
    anyhow::ensure!(
        boxes.len() / 4 == n,
        "face detector produced {} scores but {} boxes",
        n,
        boxes.len() / 4
    );

    let candidates = scores
        .chunks_exact(2)
        .zip(boxes.chunks_exact(4))
        .filter_map(|(s, b)| {
            let score = s[1];
            if !score.is_finite() || score < score_threshold {
                return None;
            }
            let c = Candidate {
                x1: b[0],
                y1: b[1],
                x2: b[2],
                y2: b[3],
                score,
            };
            (c.area() > 0.0).then_some(c)
        })
        .collect();
    Ok(candidates)
}

/// Greedy NMS: highest score first, drop anything overlapping a kept box.
pub fn non_max_suppression(mut candidates: Vec<Candidate>, threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().all(|k| candidate.iou(k) <= threshold) {
            kept.push(candidate);
        }
    }
    kept
}

/// Full post-processing chain from raw outputs to pixel boxes.
pub fn faces_from_outputs(
    scores: &[f32],
    boxes: &[f32],
    image_size: (u32, u32),
    cfg: &FaceDetectorConfig,
) -> Result<Vec<FaceBox>> {
    let candidates = decode_candidates(scores, boxes, cfg.score_threshold)?;
    let mut kept = non_max_suppression(candidates, cfg.nms_threshold);
    if cfg.top_k > 0 {
        kept.truncate(cfg.top_k);
    }
    let (w, h) = image_size;
    Ok(kept.iter().map(|c| c.to_face_box(w, h)).collect())
}
