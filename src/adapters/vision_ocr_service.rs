#![allow(unexpected_cfgs)]
#![allow(deprecated)]

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cocoa::base::{id, nil, BOOL, NO, YES};
use cocoa::foundation::{NSAutoreleasePool, NSUInteger};
use image::DynamicImage;
use objc::runtime::Class;
use objc::{class, msg_send, sel, sel_impl};

use crate::core::interfaces::adapters::OcrService;
use crate::core::models::{NeuralEngineSettings, OcrResult};

const LOG_TAG: &str = "[VISION_OCR]";

/// `VNRequestTextRecognitionLevel`
const RECOGNITION_LEVEL_ACCURATE: isize = 0;
const RECOGNITION_LEVEL_FAST: isize = 1;

/// Apple Vision text recognition through the Objective-C runtime.
pub struct VisionOcrService {
    settings: NeuralEngineSettings,
}

impl VisionOcrService {
    pub fn build(settings: NeuralEngineSettings) -> Result<Self> {
        log::info!(
            "{} Initializing Vision OCR service, languages: {:?}",
            LOG_TAG,
            settings.recognition_languages
        );

        if settings.recognition_languages.is_empty() {
            anyhow::bail!("At least one recognition language is required");
        }

        Ok(Self { settings })
    }

    fn encode_as_png(image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .context("Failed to convert image to PNG format")?;
        Ok(buffer)
    }

    fn recognize_blocking(settings: &NeuralEngineSettings, png_data: &[u8]) -> Result<String> {
        let language_codes = settings
            .recognition_languages
            .iter()
            .map(|language| CString::new(language.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Recognition language contains a NUL byte")?;

        unsafe {
            let pool = NSAutoreleasePool::new(nil);
            let result = perform_text_request(settings, &language_codes, png_data);
            pool.drain();
            result
        }
    }
}

unsafe fn perform_text_request(
    settings: &NeuralEngineSettings,
    language_codes: &[CString],
    png_data: &[u8],
) -> Result<String> {
    let data: id = msg_send![class!(NSData),
        dataWithBytes: png_data.as_ptr() as *const c_void
        length: png_data.len() as NSUInteger];

    let Some(request_class) = Class::get("VNRecognizeTextRequest") else {
        anyhow::bail!("Vision text recognition is not available");
    };
    let request: id = msg_send![request_class, new];
    if request == nil {
        anyhow::bail!("Failed to allocate a Vision text request");
    }

    let level = if settings.accurate_recognition {
        RECOGNITION_LEVEL_ACCURATE
    } else {
        RECOGNITION_LEVEL_FAST
    };
    let _: () = msg_send![request, setRecognitionLevel: level];
    let _: () = msg_send![request, setUsesLanguageCorrection: to_bool(settings.uses_language_correction)];

    let languages: id = msg_send![class!(NSMutableArray), array];
    for code in language_codes {
        let language: id = msg_send![class!(NSString), stringWithUTF8String: code.as_ptr()];
        let _: () = msg_send![languages, addObject: language];
    }
    let _: () = msg_send![request, setRecognitionLanguages: languages];

    // Only available from macOS 13.
    let detects_language: BOOL =
        msg_send![request, respondsToSelector: sel!(setAutomaticallyDetectsLanguage:)];
    if detects_language == YES {
        let _: () = msg_send![request,
            setAutomaticallyDetectsLanguage: to_bool(settings.automatically_detects_language)];
    }

    let options: id = msg_send![class!(NSDictionary), dictionary];
    let handler: id = msg_send![class!(VNImageRequestHandler), alloc];
    let handler: id = msg_send![handler, initWithData: data options: options];
    let requests: id = msg_send![class!(NSArray), arrayWithObject: request];

    let mut error: id = nil;
    let succeeded: BOOL = msg_send![handler, performRequests: requests error: &mut error as *mut id];

    let outcome = if succeeded == NO {
        let description = if error != nil {
            let description: id = msg_send![error, localizedDescription];
            ns_string_to_string(description)
        } else {
            "unknown error".to_string()
        };
        Err(anyhow::anyhow!("Vision request failed: {}", description))
    } else {
        Ok(collect_top_candidates(request))
    };

    let _: () = msg_send![handler, release];
    let _: () = msg_send![request, release];

    outcome
}

unsafe fn collect_top_candidates(request: id) -> String {
    let observations: id = msg_send![request, results];
    if observations == nil {
        return String::new();
    }

    let count: NSUInteger = msg_send![observations, count];
    let mut lines = Vec::with_capacity(count as usize);

    for index in 0..count {
        let observation: id = msg_send![observations, objectAtIndex: index];
        let candidates: id = msg_send![observation, topCandidates: 1 as NSUInteger];
        let best: id = msg_send![candidates, firstObject];
        if best == nil {
            continue;
        }

        let text: id = msg_send![best, string];
        lines.push(ns_string_to_string(text));
    }

    lines.join("\n")
}

unsafe fn ns_string_to_string(value: id) -> String {
    if value == nil {
        return String::new();
    }

    let utf8: *const c_char = msg_send![value, UTF8String];
    if utf8.is_null() {
        return String::new();
    }

    CStr::from_ptr(utf8).to_string_lossy().into_owned()
}

fn to_bool(value: bool) -> BOOL {
    if value {
        YES
    } else {
        NO
    }
}

#[async_trait]
impl OcrService for VisionOcrService {
    async fn extract_text_from_image(&self, image: &DynamicImage) -> Result<OcrResult> {
        log::info!("{} Starting text extraction", LOG_TAG);
        log::debug!(
            "{} Image dimensions: {}x{}",
            LOG_TAG,
            image.width(),
            image.height()
        );

        let png_data = Self::encode_as_png(image)?;
        let settings = self.settings.clone();

        let extracted_text =
            tokio::task::spawn_blocking(move || Self::recognize_blocking(&settings, &png_data))
                .await
                .context("Vision task did not complete")??;

        log::info!(
            "{} Text extraction complete. Extracted {} characters",
            LOG_TAG,
            extracted_text.chars().count()
        );

        Ok(OcrResult::from_text(extracted_text))
    }
}
