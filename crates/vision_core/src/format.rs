//! Text rendering of model outputs for the result area.

use serde::{Deserialize, Serialize};

/// Text shown when face detection finds nothing.
pub const NO_FACE_FOUND: &str = "No face found";

/// One labeled prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub label: String,
    /// Model confidence in [0,1].
    pub confidence: f32,
}

impl ClassificationEntry {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Pixel-space face rectangle, edges relative to the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceBox {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl FaceBox {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// One `label: NN.NN%` line per entry, in input order.
pub fn format_classification(entries: &[ClassificationEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {:.2}%", e.label, e.confidence * 100.0))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per face, or [`NO_FACE_FOUND`] when `boxes` is empty.
pub fn format_faces(boxes: &[FaceBox]) -> String {
    if boxes.is_empty() {
        return NO_FACE_FOUND.to_string();
    }
    boxes
        .iter()
        .map(|b| {
            format!(
                "Top: {}, Right: {}, Bottom: {}, Left: {}",
                b.top, b.right, b.bottom, b.left
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_classification_is_empty_text() {
        assert_eq!(format_classification(&[]), "");
    }

    #[test]
    fn classification_lines_use_two_decimals() {
        let entries = vec![
            ClassificationEntry::new("cat", 0.9231),
            ClassificationEntry::new("dog", 0.041),
            ClassificationEntry::new("fox", 0.002),
        ];
        assert_eq!(
            format_classification(&entries),
            "cat: 92.31%\ndog: 4.10%\nfox: 0.20%"
        );
    }

    #[test]
    fn classification_keeps_input_order() {
        let entries = vec![
            ClassificationEntry::new("low", 0.1),
            ClassificationEntry::new("high", 1.0),
        ];
        assert_eq!(format_classification(&entries), "low: 10.00%\nhigh: 100.00%");
    }

    #[test]
    fn no_faces_reads_no_face_found() {
        assert_eq!(format_faces(&[]), "No face found");
    }

    #[test]
    fn single_face_line() {
        assert_eq!(
            format_faces(&[FaceBox::new(10, 50, 60, 5)]),
            "Top: 10, Right: 50, Bottom: 60, Left: 5"
        );
    }

    #[test]
    fn faces_joined_without_trailing_newline() {
        let text = format_faces(&[FaceBox::new(1, 2, 3, 4), FaceBox::new(5, 6, 7, 8)]);
        assert_eq!(
            text,
            "Top: 1, Right: 2, Bottom: 3, Left: 4\nTop: 5, Right: 6, Bottom: 7, Left: 8"
        );
    }
}
