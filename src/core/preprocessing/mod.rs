mod filters;

pub use filters::{ColorControls, FilterStep, SharpenLuminance, Upscale};

use image::DynamicImage;

use crate::core::models::PreprocessingSettings;
use crate::global_constants::LOG_TAG_PREPROCESS;

/// Runs filter steps in order. Every step is best-effort: a failing step is
/// skipped and the next one sees the image from before it.
pub struct ImagePreprocessor {
    steps: Vec<Box<dyn FilterStep>>,
}

impl ImagePreprocessor {
    pub fn from_settings(settings: &PreprocessingSettings) -> Self {
        if !settings.enabled {
            log::info!("{} Preprocessing disabled", LOG_TAG_PREPROCESS);
            return Self::with_steps(Vec::new());
        }

        Self::with_steps(vec![
            Box::new(Upscale {
                factor: settings.scale_factor,
            }),
            Box::new(ColorControls {
                contrast: settings.contrast,
                saturation: settings.saturation,
                brightness: settings.brightness,
            }),
            Box::new(SharpenLuminance {
                sharpness: settings.sharpness,
                radius: settings.sharpen_radius,
            }),
        ])
    }

    pub fn with_steps(steps: Vec<Box<dyn FilterStep>>) -> Self {
        Self { steps }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn process(&self, image: &DynamicImage) -> DynamicImage {
        let mut current = image.clone();

        for step in &self.steps {
            match step.apply(&current) {
                Ok(output) => {
                    log::debug!(
                        "{} {} produced {}x{}",
                        LOG_TAG_PREPROCESS,
                        step.name(),
                        output.width(),
                        output.height()
                    );
                    current = output;
                }
                Err(error) => {
                    log::debug!(
                        "{} {} skipped: {:#}",
                        LOG_TAG_PREPROCESS,
                        step.name(),
                        error
                    );
                }
            }
        }

        current
    }
}
