use anyhow::{Context, Result};

use crate::core::interfaces::ports::CaptureSource;
use crate::core::models::{CapturedImage, PixelFormat, ScreenRegion};
use crate::global_constants::{
    ERROR_CONTEXT_CAPTURE_MONITOR, ERROR_CONTEXT_SCALE_FACTOR, LOG_TAG_CAPTURE,
};

/// Captures the monitor under a chosen region and crops the region out of it.
pub struct XcapRegionCapturer {
    region: ScreenRegion,
}

impl XcapRegionCapturer {
    pub fn for_region(region: ScreenRegion) -> Self {
        log::debug!(
            "{} initializing xcap capturer for {:?}",
            LOG_TAG_CAPTURE,
            region
        );
        Self { region }
    }

    fn get_monitor_at_position(&self) -> Result<xcap::Monitor> {
        xcap::Monitor::from_point(self.region.x_position, self.region.y_position).with_context(
            || {
                format!(
                    "failed to find monitor at ({}, {})",
                    self.region.x_position, self.region.y_position
                )
            },
        )
    }

    fn extract_scale_factor_from_monitor(&self, monitor: &xcap::Monitor) -> Result<f64> {
        let scale_factor = monitor
            .scale_factor()
            .with_context(|| ERROR_CONTEXT_SCALE_FACTOR)?;

        log::debug!("{} monitor scale factor: {}", LOG_TAG_CAPTURE, scale_factor);
        Ok(scale_factor as f64)
    }

    fn capture_monitor_image(&self, monitor: &xcap::Monitor) -> Result<xcap::image::RgbaImage> {
        monitor
            .capture_image()
            .with_context(|| ERROR_CONTEXT_CAPTURE_MONITOR)
    }

    /// Converts a region in global logical points to physical pixels
    /// relative to the monitor's top-left corner.
    fn region_in_monitor_pixels(
        region: &ScreenRegion,
        monitor_origin: (i32, i32),
        scale_factor: f64,
    ) -> ScreenRegion {
        let scale = |value: f64| (value * scale_factor).round();

        ScreenRegion::with_size(
            scale((region.x_position - monitor_origin.0) as f64) as i32,
            scale((region.y_position - monitor_origin.1) as f64) as i32,
            scale(region.width as f64) as u32,
            scale(region.height as f64) as u32,
        )
    }

    fn convert_image_to_captured_image(
        image: xcap::image::RgbaImage,
        scale_factor: f64,
    ) -> Result<CapturedImage> {
        let width_pixels = image.width();
        let height_pixels = image.height();
        let raw_rgba_data = image.into_raw();

        log::info!(
            "{} captured {}x{} screenshot, scale_factor={}",
            LOG_TAG_CAPTURE,
            width_pixels,
            height_pixels,
            scale_factor
        );

        CapturedImage::build_from_raw_data(
            scale_factor,
            width_pixels,
            height_pixels,
            PixelFormat::Rgba8,
            raw_rgba_data,
        )
    }
}

impl CaptureSource for XcapRegionCapturer {
    fn request_capture(&self) -> Result<Option<CapturedImage>> {
        if self.region.is_empty() {
            log::info!("{} empty selection, capture cancelled", LOG_TAG_CAPTURE);
            return Ok(None);
        }

        let monitor = self.get_monitor_at_position()?;
        let scale_factor = self.extract_scale_factor_from_monitor(&monitor)?;
        let monitor_origin = (
            monitor.x().with_context(|| "failed to read monitor x")?,
            monitor.y().with_context(|| "failed to read monitor y")?,
        );
        let captured_image = self.capture_monitor_image(&monitor)?;
        let full_capture = Self::convert_image_to_captured_image(captured_image, scale_factor)?;

        let pixel_region =
            Self::region_in_monitor_pixels(&self.region, monitor_origin, scale_factor);
        let selection = full_capture.crop_region(&pixel_region)?;

        log::info!(
            "{} cropped selection to {}x{}",
            LOG_TAG_CAPTURE,
            selection.width,
            selection.height
        );

        Ok(Some(selection))
    }
}
