use std::path::{Path, PathBuf};

/// A freshly captured image waiting to be uploaded. The file behind it is
/// overwritten by the next capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    image_path: PathBuf,
}

impl CaptureResult {
    pub fn at_path(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
        }
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }
}
