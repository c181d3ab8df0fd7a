//! Selection and run workflow between the file picker and the models.
//!
//! The currently selected path is owned by the caller and handed to
//! [`run_selected`] on every run; a new [`select`] replaces it outright.

use crate::error::VisionError;
use crate::model::ImageModel;
use crate::path::ImagePath;

/// Notice shown after a file passes validation.
pub const UPLOAD_SUCCESS: &str = "Image successfully uploaded!";

/// What became of a file-picker interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The dialog was dismissed or returned an empty path.
    Cancelled,
    Accepted(ImagePath),
    Rejected(VisionError),
}

impl SelectOutcome {
    /// The selection that should replace the current one.
    pub fn into_selection(self) -> Option<ImagePath> {
        match self {
            SelectOutcome::Accepted(path) => Some(path),
            SelectOutcome::Cancelled | SelectOutcome::Rejected(_) => None,
        }
    }

    /// Message for the user, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            SelectOutcome::Cancelled => None,
            SelectOutcome::Accepted(_) => Some(UPLOAD_SUCCESS.to_string()),
            SelectOutcome::Rejected(err) => Some(err.to_string()),
        }
    }
}

/// Classify the picker's answer.
pub fn select(picked: Option<&str>) -> SelectOutcome {
    match picked {
        None | Some("") => SelectOutcome::Cancelled,
        Some(raw) => match ImagePath::validate(raw) {
            Ok(path) => {
                tracing::info!("selected image {path}");
                SelectOutcome::Accepted(path)
            }
            Err(err) => {
                tracing::warn!("rejected selection {raw}: {err}");
                SelectOutcome::Rejected(err)
            }
        },
    }
}

/// Run `model` on the current selection.
///
/// Returns [`VisionError::NoSelection`] without touching the model when
/// nothing is selected. Model failures are already folded into the text.
pub fn run_selected(
    model: &dyn ImageModel,
    selected: Option<&ImagePath>,
) -> Result<String, VisionError> {
    let path = selected.ok_or(VisionError::NoSelection)?;
    tracing::info!("running {} on {path}", model.kind());
    Ok(model.run(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelKind;
    use std::cell::Cell;

    struct Counting {
        calls: Cell<usize>,
    }

    impl ImageModel for Counting {
        fn kind(&self) -> ModelKind {
            ModelKind::Classifier
        }

        fn try_run(&self, path: &ImagePath) -> Result<String, VisionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!("ran {path}"))
        }
    }

    #[test]
    fn cancelled_dialog_clears_selection() {
        assert_eq!(select(None), SelectOutcome::Cancelled);
        assert_eq!(select(Some("")), SelectOutcome::Cancelled);
        assert_eq!(select(None).notice(), None);
        assert_eq!(select(Some("")).into_selection(), None);
    }

    #[test]
    fn accepted_selection_reports_success() {
        let outcome = select(Some("cat.JPG"));
        assert_eq!(outcome.notice().as_deref(), Some("Image successfully uploaded!"));
        assert_eq!(
            outcome.into_selection().map(|p| p.as_str().to_string()),
            Some("cat.JPG".to_string())
        );
    }

    #[test]
    fn rejected_selection_reports_invalid_image() {
        let outcome = select(Some("cat.gif"));
        assert_eq!(
            outcome.notice().as_deref(),
            Some("Selected file is not a valid image.")
        );
        assert_eq!(outcome.into_selection(), None);
    }

    #[test]
    fn run_without_selection_skips_model() {
        let model = Counting {
            calls: Cell::new(0),
        };
        let err = run_selected(&model, None).unwrap_err();
        assert_eq!(err, VisionError::NoSelection);
        assert_eq!(err.to_string(), "Please select an image first!");
        assert_eq!(model.calls.get(), 0);
    }

    #[test]
    fn run_with_selection_invokes_model_once() {
        let model = Counting {
            calls: Cell::new(0),
        };
        let path = ImagePath::validate("a.png").unwrap();
        assert_eq!(run_selected(&model, Some(&path)).unwrap(), "ran a.png");
        assert_eq!(model.calls.get(), 1);
    }
}
