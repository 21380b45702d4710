use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use rusty_tesseract::{Args, Image as TesseractImage};
use tempfile::NamedTempFile;

use crate::core::interfaces::adapters::OcrService;
use crate::core::models::{NeuralEngineSettings, OcrResult, TrainableEngineSettings};
use crate::global_constants::{DEFAULT_JPEG_QUALITY, OEM_LSTM_ONLY, PSM_AUTO};

const LOG_TAG: &str = "[TESSERACT_OCR]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractProfile {
    pub language: String,
    pub page_segmentation_mode: i32,
    pub engine_mode: i32,
    pub jpeg_quality: u8,
}

impl TesseractProfile {
    /// `jpn_vert` data read as one block of vertical columns.
    pub fn vertical(settings: &TrainableEngineSettings) -> Self {
        Self {
            language: settings.language.clone(),
            page_segmentation_mode: settings.page_segmentation_mode,
            engine_mode: settings.engine_mode,
            jpeg_quality: settings.jpeg_quality,
        }
    }

    pub fn horizontal(settings: &NeuralEngineSettings) -> Self {
        Self {
            language: settings.fallback_tesseract_language.clone(),
            page_segmentation_mode: PSM_AUTO,
            engine_mode: OEM_LSTM_ONLY,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    fn to_args(&self) -> Args {
        Args {
            lang: self.language.clone(),
            psm: Some(self.page_segmentation_mode),
            oem: Some(self.engine_mode),
            ..Args::default()
        }
    }
}

pub struct TesseractOcrService {
    profile: TesseractProfile,
}

impl TesseractOcrService {
    pub fn build(profile: TesseractProfile) -> Result<Self> {
        log::info!(
            "{} Initializing Tesseract OCR service: lang={}, psm={}, oem={}",
            LOG_TAG,
            profile.language,
            profile.page_segmentation_mode,
            profile.engine_mode
        );

        if profile.language.trim().is_empty() {
            anyhow::bail!("Tesseract language must not be empty");
        }

        if profile.jpeg_quality == 0 || profile.jpeg_quality > 100 {
            anyhow::bail!(
                "JPEG quality must be between 1 and 100, got {}",
                profile.jpeg_quality
            );
        }

        Ok(Self { profile })
    }

    fn write_jpeg_to_temp_file(image: &DynamicImage, quality: u8) -> Result<NamedTempFile> {
        log::debug!("{} Encoding image as JPEG, quality {}", LOG_TAG, quality);

        let mut temp_file = tempfile::Builder::new()
            .prefix("jpn-reader-")
            .suffix(".jpg")
            .tempfile()
            .context("Failed to create temporary image file")?;

        {
            let mut writer = BufWriter::new(temp_file.as_file_mut());
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            DynamicImage::ImageRgb8(image.to_rgb8())
                .write_with_encoder(encoder)
                .context("Failed to encode image as JPEG")?;
            writer.flush().context("Failed to flush JPEG data")?;
        }

        Ok(temp_file)
    }

    fn recognize_blocking(profile: &TesseractProfile, image: &DynamicImage) -> Result<String> {
        let jpeg_file = Self::write_jpeg_to_temp_file(image, profile.jpeg_quality)?;

        let tesseract_image = TesseractImage::from_path(jpeg_file.path())
            .context("Failed to create Tesseract image")?;

        let extracted_text = rusty_tesseract::image_to_string(&tesseract_image, &profile.to_args())
            .context("Failed to extract text from image")?;

        Ok(extracted_text.trim().to_string())
    }
}

#[async_trait]
impl OcrService for TesseractOcrService {
    async fn extract_text_from_image(&self, image: &DynamicImage) -> Result<OcrResult> {
        log::info!("{} Starting text extraction ({})", LOG_TAG, self.profile.language);
        log::debug!(
            "{} Image dimensions: {}x{}",
            LOG_TAG,
            image.width(),
            image.height()
        );

        let profile = self.profile.clone();
        let image = image.clone();

        let extracted_text =
            tokio::task::spawn_blocking(move || Self::recognize_blocking(&profile, &image))
                .await
                .context("Tesseract task did not complete")??;

        log::info!(
            "{} Text extraction complete. Extracted {} characters",
            LOG_TAG,
            extracted_text.chars().count()
        );
        log::debug!("{} Extracted text: {}", LOG_TAG, extracted_text);

        Ok(OcrResult::from_text(extracted_text))
    }
}
