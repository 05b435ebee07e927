//! Image provider seam
//!
//! Photos are attached by reference only. Picking one is delegated to an
//! external provider (a file dialog, a path argument, a platform picker).

use std::path::PathBuf;

use thiserror::Error;

/// Errors an image provider may report
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Permission to access images was denied")]
    PermissionDenied,

    #[error("Image not found: '{path}'")]
    NotFound { path: PathBuf },

    #[error("{0}")]
    Other(String),
}

/// Source of image references
pub trait ImageProvider {
    /// Ask for an image
    ///
    /// `Ok(None)` means nothing was selected, which is not an error.
    fn pick_image(&self) -> Result<Option<String>, ImageError>;
}

/// Provider that never selects anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImage;

impl ImageProvider for NoImage {
    fn pick_image(&self) -> Result<Option<String>, ImageError> {
        Ok(None)
    }
}
