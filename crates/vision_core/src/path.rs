//! Validation of user-selected image paths.

use std::fmt;
use std::path::Path;

use crate::error::VisionError;

/// File extensions accepted as images, lowercase and without the dot.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A path string that passed extension validation.
///
/// Existence is not checked here; a missing file surfaces later as
/// [`VisionError::FileNotFound`] from the model that tries to read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(String);

impl ImagePath {
    /// Accept `path` iff it ends in `.jpg`, `.jpeg` or `.png`, ignoring case.
    pub fn validate(path: &str) -> Result<Self, VisionError> {
        if has_image_extension(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(VisionError::InvalidExtension {
                path: path.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl AsRef<Path> for ImagePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`ImagePath::validate`].
pub fn validate(path: &str) -> Result<ImagePath, VisionError> {
    ImagePath::validate(path)
}

fn has_image_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| {
        lower
            .strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}
