use anyhow::{bail, Result};
use image::imageops::FilterType;
use image::DynamicImage;

use crate::global_constants::MAX_PREPROCESSED_DIMENSION;

const LUMA_RED: f32 = 0.2125;
const LUMA_GREEN: f32 = 0.7154;
const LUMA_BLUE: f32 = 0.0721;

/// One image transform in the preprocessing pipeline. A step that cannot
/// produce an output returns an error and the pipeline keeps its input.
pub trait FilterStep: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage>;
}

/// Linear upscale, so small glyphs get enough pixels for the recognizers.
pub struct Upscale {
    pub factor: f32,
}

impl FilterStep for Upscale {
    fn name(&self) -> &'static str {
        "upscale"
    }

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage> {
        if !self.factor.is_finite() || self.factor <= 0.0 {
            bail!("Invalid upscale factor {}", self.factor);
        }

        let new_width = (image.width() as f32 * self.factor).round() as u32;
        let new_height = (image.height() as f32 * self.factor).round() as u32;

        if new_width == 0 || new_height == 0 {
            bail!("Upscaled image would be empty");
        }

        if new_width > MAX_PREPROCESSED_DIMENSION || new_height > MAX_PREPROCESSED_DIMENSION {
            bail!(
                "Upscaled image {}x{} exceeds the {} pixel limit",
                new_width,
                new_height,
                MAX_PREPROCESSED_DIMENSION
            );
        }

        Ok(image.resize_exact(new_width, new_height, FilterType::Triangle))
    }
}

/// Saturation, brightness and contrast in one pass, all in normalized
/// channel units. Contrast pivots around mid-grey.
pub struct ColorControls {
    pub contrast: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl ColorControls {
    fn adjust_channel(&self, channel: f32, luma: f32) -> f32 {
        let saturated = luma + (channel - luma) * self.saturation;
        let brightened = saturated + self.brightness;
        ((brightened - 0.5) * self.contrast + 0.5).clamp(0.0, 1.0)
    }
}

impl FilterStep for ColorControls {
    fn name(&self) -> &'static str {
        "color_controls"
    }

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage> {
        if !(self.contrast.is_finite() && self.saturation.is_finite() && self.brightness.is_finite())
        {
            bail!(
                "Invalid color controls: contrast={}, saturation={}, brightness={}",
                self.contrast,
                self.saturation,
                self.brightness
            );
        }

        let mut rgba = image.to_rgba8();

        for pixel in rgba.pixels_mut() {
            let [red, green, blue, alpha] = pixel.0;
            let channels = [red, green, blue].map(|value| value as f32 / 255.0);
            let luma = LUMA_RED * channels[0] + LUMA_GREEN * channels[1] + LUMA_BLUE * channels[2];
            let adjusted = channels.map(|channel| to_byte(self.adjust_channel(channel, luma)));

            pixel.0 = [adjusted[0], adjusted[1], adjusted[2], alpha];
        }

        Ok(DynamicImage::ImageRgba8(rgba))
    }
}

/// Unsharp mask on luminance only; the luma delta is added to every color
/// channel so hue is left alone.
pub struct SharpenLuminance {
    pub sharpness: f32,
    pub radius: f32,
}

impl FilterStep for SharpenLuminance {
    fn name(&self) -> &'static str {
        "sharpen_luminance"
    }

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            bail!("Invalid sharpen radius {}", self.radius);
        }

        if !self.sharpness.is_finite() {
            bail!("Invalid sharpness {}", self.sharpness);
        }

        if image.width() < 3 || image.height() < 3 {
            bail!(
                "Image {}x{} is too small to sharpen",
                image.width(),
                image.height()
            );
        }

        let luma = image.to_luma8();
        let blurred = imageproc::filter::gaussian_blur_f32(&luma, self.radius);
        let mut rgba = image.to_rgba8();

        for (x, y, pixel) in rgba.enumerate_pixels_mut() {
            let original = luma.get_pixel(x, y)[0] as f32;
            let soft = blurred.get_pixel(x, y)[0] as f32;
            let delta = (original - soft) * self.sharpness;

            for channel in pixel.0.iter_mut().take(3) {
                *channel = (*channel as f32 + delta).round().clamp(0.0, 255.0) as u8;
            }
        }

        Ok(DynamicImage::ImageRgba8(rgba))
    }
}

fn to_byte(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
