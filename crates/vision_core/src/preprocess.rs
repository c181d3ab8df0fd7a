//! Image loading and tensor preparation shared by the ONNX adapters.

use std::io;
use std::path::Path;

use anyhow::anyhow;
use image::{DynamicImage, ImageError, RgbImage, imageops::FilterType};

use crate::error::InferenceError;

/// Open an image, reporting a missing file separately from decode errors.
pub fn open_image(path: &Path) -> Result<DynamicImage, InferenceError> {
    if !path.exists() {
        return Err(InferenceError::FileNotFound(path.to_path_buf()));
    }
    image::open(path).map_err(|err| match err {
        ImageError::IoError(e) if e.kind() == io::ErrorKind::NotFound => {
            InferenceError::FileNotFound(path.to_path_buf())
        }
        other => InferenceError::Failure(
            anyhow!(other).context(format!("cannot open image: {}", path.display())),
        ),
    })
}

/// Resize to exactly `width`×`height` RGB.
pub fn resize_rgb(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    img.resize_exact(width, height, FilterType::Triangle)
        .to_rgb8()
}

/// Planar `[3, h, w]` floats from an RGB image, each channel mapped by `norm`.
pub fn to_nchw<F>(rgb: &RgbImage, norm: F) -> Vec<f32>
where
    F: Fn(usize, u8) -> f32,
{
    let (w, h) = rgb.dimensions();
    let plane = (w as usize) * (h as usize);
    let mut out = vec![0.0f32; 3 * plane];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let idx = (y as usize) * (w as usize) + x as usize;
        for (c, value) in pixel.0.iter().enumerate() {
            out[c * plane + idx] = norm(c, *value);
        }
    }
    out
}

/// Scale to [0,1] and apply per-channel mean/std.
pub fn normalize_channel(value: u8, mean: f32, std: f32) -> f32 {
    let v = value as f32 / 255.0;
    (v - mean) / std
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}

/// True when `scores` already look like probabilities.
pub fn is_distribution(scores: &[f32]) -> bool {
    if scores.iter().any(|s| !(0.0..=1.0).contains(s)) {
        return false;
    }
    let sum: f32 = scores.iter().sum();
    (sum - 1.0).abs() < 1e-3
}

/// Indices of the `k` highest scores, best first.
pub fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..scores.len()).collect();
    idx.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    idx.truncate(k);
    idx
}

/// Parse a labels file: one class per line.
///
/// Lines in WordNet form (`n01440764 tench, Tinca tinca`) keep only the
/// first name after the synset id.
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| {
            let name = match line.split_once(' ') {
                Some((id, rest)) if is_synset_id(id) => rest,
                _ => line,
            };
            name.split(',').next().unwrap_or(name).trim().to_string()
        })
        .collect()
}

fn is_synset_id(token: &str) -> bool {
    token.len() == 9
        && token.starts_with('n')
        && token[1..].bytes().all(|b| b.is_ascii_digit())
}
