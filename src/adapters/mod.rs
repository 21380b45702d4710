mod console_result_presenter;
mod tesseract_ocr_service;
#[cfg(target_os = "macos")]
mod vision_ocr_service;

use std::sync::Arc;

use anyhow::Result;

pub use console_result_presenter::ConsoleResultPresenter;
pub use tesseract_ocr_service::{TesseractOcrService, TesseractProfile};
#[cfg(target_os = "macos")]
pub use vision_ocr_service::VisionOcrService;

use crate::core::interfaces::adapters::OcrService;
use crate::core::models::ReaderSettings;

/// The general-purpose recognizer for horizontal text: Apple Vision on
/// macOS, Tesseract with a multilingual model elsewhere.
pub fn build_neural_ocr_service(settings: &ReaderSettings) -> Result<Arc<dyn OcrService>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Arc::new(VisionOcrService::build(
            settings.neural_engine.clone(),
        )?))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Ok(Arc::new(TesseractOcrService::build(
            TesseractProfile::horizontal(&settings.neural_engine),
        )?))
    }
}

/// Tesseract with vertical Japanese data.
pub fn build_trainable_ocr_service(settings: &ReaderSettings) -> Result<Arc<dyn OcrService>> {
    Ok(Arc::new(TesseractOcrService::build(
        TesseractProfile::vertical(&settings.trainable_engine),
    )?))
}
