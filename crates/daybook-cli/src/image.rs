//! Image selection from the command line
//!
//! The `--image` argument plays the role of a media picker: no argument
//! means no photo, a path must point at an existing file.

use std::path::PathBuf;

use daybook_core::{ImageError, ImageProvider};

/// Picks the image named on the command line, if any
pub struct PathImageProvider {
    path: Option<PathBuf>,
}

impl PathImageProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ImageProvider for PathImageProvider {
    fn pick_image(&self) -> Result<Option<String>, ImageError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        if !path.is_file() {
            return Err(ImageError::NotFound { path: path.clone() });
        }

        let absolute = path.canonicalize().map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => ImageError::PermissionDenied,
            _ => ImageError::Other(e.to_string()),
        })?;

        Ok(Some(absolute.to_string_lossy().into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_path_is_no_image() {
        let provider = PathImageProvider::new(None);
        assert!(provider.pick_image().unwrap().is_none());
    }

    #[test]
    fn test_existing_file_is_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let photo = temp_dir.path().join("sunset.jpg");
        std::fs::write(&photo, b"jpeg").unwrap();

        let provider = PathImageProvider::new(Some(photo.clone()));
        let picked = provider.pick_image().unwrap().unwrap();

        assert!(PathBuf::from(&picked).is_absolute());
        assert!(picked.ends_with("sunset.jpg"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let provider = PathImageProvider::new(Some(PathBuf::from("/no/such/photo.png")));
        assert!(matches!(
            provider.pick_image(),
            Err(ImageError::NotFound { .. })
        ));
    }
}
