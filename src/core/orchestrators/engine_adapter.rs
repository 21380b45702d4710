use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use uuid::Uuid;

use crate::core::interfaces::adapters::OcrService;
use crate::core::models::{EngineKind, RecognitionResult};
use crate::global_constants::LOG_TAG_RECOGNIZER;

/// Wraps an OCR service so that it always answers: errors and timeouts
/// become empty text.
pub struct EngineAdapter {
    kind: EngineKind,
    service: Arc<dyn OcrService>,
    timeout: Duration,
}

impl EngineAdapter {
    pub fn new(kind: EngineKind, service: Arc<dyn OcrService>, timeout: Duration) -> Self {
        Self {
            kind,
            service,
            timeout,
        }
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub async fn recognize(&self, request_id: Uuid, image: &DynamicImage) -> RecognitionResult {
        log::debug!(
            "{} [{}] running {} engine on {}x{}",
            LOG_TAG_RECOGNIZER,
            request_id,
            self.kind,
            image.width(),
            image.height()
        );

        let extraction = self.service.extract_text_from_image(image);

        let text = match tokio::time::timeout(self.timeout, extraction).await {
            Ok(Ok(result)) => {
                log::info!(
                    "{} [{}] {} engine recognized {} characters",
                    LOG_TAG_RECOGNIZER,
                    request_id,
                    self.kind,
                    result.full_text.chars().count()
                );
                result.full_text
            }
            Ok(Err(error)) => {
                log::error!(
                    "{} [{}] {} engine failed: {:#}",
                    LOG_TAG_RECOGNIZER,
                    request_id,
                    self.kind,
                    error
                );
                String::new()
            }
            Err(_) => {
                log::warn!(
                    "{} [{}] {} engine timed out after {:?}",
                    LOG_TAG_RECOGNIZER,
                    request_id,
                    self.kind,
                    self.timeout
                );
                String::new()
            }
        };

        RecognitionResult::new(request_id, text, self.kind)
    }
}
