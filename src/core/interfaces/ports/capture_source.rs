use anyhow::Result;

use crate::core::models::CapturedImage;

pub trait CaptureSource: Send + Sync {
    /// `Ok(None)` means the user backed out of the selection.
    fn request_capture(&self) -> Result<Option<CapturedImage>>;
}
