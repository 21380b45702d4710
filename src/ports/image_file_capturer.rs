use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::interfaces::ports::CaptureSource;
use crate::core::models::CapturedImage;
use crate::global_constants::LOG_TAG_CAPTURE;

/// Treats an image on disk as an already-selected region.
pub struct ImageFileCapturer {
    path: PathBuf,
}

impl ImageFileCapturer {
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CaptureSource for ImageFileCapturer {
    fn request_capture(&self) -> Result<Option<CapturedImage>> {
        log::debug!("{} loading capture from {:?}", LOG_TAG_CAPTURE, self.path);

        if !self.path.exists() {
            anyhow::bail!("Image file {:?} does not exist", self.path);
        }

        let image = image::open(&self.path)
            .with_context(|| format!("Failed to decode image {:?}", self.path))?;
        let captured = CapturedImage::from_dynamic_image(&image)?;

        log::info!(
            "{} loaded {}x{} image from {:?}",
            LOG_TAG_CAPTURE,
            captured.width,
            captured.height,
            self.path
        );

        Ok(Some(captured))
    }
}
