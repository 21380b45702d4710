use anyhow::{Context, Result};
use image::{DynamicImage, RgbaImage};

use crate::core::models::ScreenRegion;

const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
}

/// An immutable capture handed to the recognizer. Dimensions and buffer
/// length are validated on construction.
#[derive(Clone)]
pub struct CapturedImage {
    pub scale_factor: f64,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    raw_data: Vec<u8>,
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("scale_factor", &self.scale_factor)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_format", &self.pixel_format)
            .finish()
    }
}

impl CapturedImage {
    pub fn build_from_raw_data(
        scale_factor: f64,
        width_pixels: u32,
        height_pixels: u32,
        pixel_format: PixelFormat,
        raw_data: Vec<u8>,
    ) -> Result<Self> {
        if width_pixels == 0 || height_pixels == 0 {
            anyhow::bail!(
                "Captured image must not be empty, got {}x{}",
                width_pixels,
                height_pixels
            );
        }

        let expected_len = width_pixels as usize * height_pixels as usize * BYTES_PER_PIXEL;
        if raw_data.len() != expected_len {
            anyhow::bail!(
                "Raw buffer holds {} bytes, expected {} for {}x{} {:?}",
                raw_data.len(),
                expected_len,
                width_pixels,
                height_pixels,
                pixel_format
            );
        }

        log::debug!(
            "[CAPTURED_IMAGE] building image: {}x{} {:?}, scale={}",
            width_pixels,
            height_pixels,
            pixel_format,
            scale_factor
        );

        Ok(Self {
            scale_factor,
            width: width_pixels,
            height: height_pixels,
            pixel_format,
            raw_data,
        })
    }

    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::build_from_raw_data(1.0, width, height, PixelFormat::Rgba8, rgba.into_raw())
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    pub fn to_dynamic_image(&self) -> Result<DynamicImage> {
        let rgba_data = match self.pixel_format {
            PixelFormat::Rgba8 => self.raw_data.clone(),
            PixelFormat::Bgra8 => {
                let mut swizzled = self.raw_data.clone();
                for pixel in swizzled.chunks_exact_mut(BYTES_PER_PIXEL) {
                    pixel.swap(0, 2);
                }
                swizzled
            }
        };

        let rgba = RgbaImage::from_raw(self.width, self.height, rgba_data)
            .context("Raw buffer does not match image dimensions")?;

        Ok(DynamicImage::ImageRgba8(rgba))
    }

    pub fn crop_region(&self, region: &ScreenRegion) -> Result<Self> {
        if region.width == 0 || region.height == 0 {
            anyhow::bail!("Crop dimensions must be greater than zero");
        }

        let x = region.x_position.max(0) as u32;
        let y = region.y_position.max(0) as u32;
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let crop_width = region.width.min(self.width - x);
        let crop_height = region.height.min(self.height - y);

        log::debug!(
            "[CAPTURED_IMAGE] Cropping region: {}x{} at ({}, {}) from {}x{}",
            crop_width,
            crop_height,
            x,
            y,
            self.width,
            self.height
        );

        let row_bytes = crop_width as usize * BYTES_PER_PIXEL;
        let mut cropped_data = Vec::with_capacity(row_bytes * crop_height as usize);

        for row in y..(y + crop_height) {
            let row_start = (row as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
            let row_end = row_start + row_bytes;

            match self.raw_data.get(row_start..row_end) {
                Some(slice) => cropped_data.extend_from_slice(slice),
                None => anyhow::bail!("Crop region exceeds image bounds"),
            }
        }

        Self::build_from_raw_data(
            self.scale_factor,
            crop_width,
            crop_height,
            self.pixel_format,
            cropped_data,
        )
    }
}
