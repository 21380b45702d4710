use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{DynamicImage, Rgba, RgbaImage};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use jpn_reader::adapters;
use jpn_reader::core::interfaces::adapters::OcrService;
use jpn_reader::core::interfaces::ports::CaptureSource;
use jpn_reader::core::models::{
    CapturedImage, EngineKind, OcrResult, OrientationHint, ReaderSettings,
};
use jpn_reader::core::orchestrators::{CaptureSession, TextRecognizer};
use jpn_reader::ports::ImageFileCapturer;

const GOLDEN_DIR_VARIABLE: &str = "JPN_READER_GOLDEN_DIR";

struct SilentOcrService {
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl OcrService for SilentOcrService {
    async fn extract_text_from_image(&self, _image: &DynamicImage) -> anyhow::Result<OcrResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(OcrResult::default())
    }
}

fn noise_capture(width: u32, height: u32) -> CapturedImage {
    let mut state: u32 = 0x2545_f491;
    let noise = RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [red, green, blue, _] = state.to_le_bytes();
        Rgba([red, green, blue, 255])
    });

    CapturedImage::from_dynamic_image(&DynamicImage::ImageRgba8(noise)).unwrap()
}

fn real_session(settings: &ReaderSettings) -> CaptureSession {
    let recognizer = TextRecognizer::from_settings(
        adapters::build_neural_ocr_service(settings).unwrap(),
        adapters::build_trainable_ocr_service(settings).unwrap(),
        settings,
    );
    CaptureSession::build(Arc::new(recognizer), Handle::current())
}

fn golden_fixture(name: &str) -> PathBuf {
    let directory = std::env::var(GOLDEN_DIR_VARIABLE)
        .unwrap_or_else(|_| panic!("{} must point at the golden image directory", GOLDEN_DIR_VARIABLE));
    PathBuf::from(directory).join(name)
}

fn load_golden_capture(name: &str) -> CapturedImage {
    ImageFileCapturer::for_path(golden_fixture(name))
        .request_capture()
        .unwrap()
        .unwrap()
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|character| !character.is_whitespace()).collect()
}

#[tokio::test]
async fn test_noise_image_with_silent_engines_delivers_empty_string() {
    let neural_calls = Arc::new(AtomicUsize::new(0));
    let trainable_calls = Arc::new(AtomicUsize::new(0));
    let recognizer = TextRecognizer::from_settings(
        Arc::new(SilentOcrService {
            calls: neural_calls.clone(),
        }),
        Arc::new(SilentOcrService {
            calls: trainable_calls.clone(),
        }),
        &ReaderSettings::default(),
    );
    let session = CaptureSession::build(Arc::new(recognizer), Handle::current());
    let (done_sender, done_receiver) = oneshot::channel();

    let accepted = session.recognize(
        noise_capture(40, 30),
        OrientationHint::Unspecified,
        move |text| {
            let _ = done_sender.send(text);
        },
    );

    assert!(accepted);
    assert_eq!(done_receiver.await.unwrap(), "");
    assert_eq!(neural_calls.load(Ordering::SeqCst), 1);
    assert_eq!(trainable_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_accepts_next_capture_after_result() {
    let recognizer = TextRecognizer::from_settings(
        Arc::new(SilentOcrService {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Arc::new(SilentOcrService {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        &ReaderSettings::default(),
    );
    let session = CaptureSession::build(Arc::new(recognizer), Handle::current());

    for _ in 0..3 {
        let pending = session
            .submit(noise_capture(8, 8), OrientationHint::Vertical)
            .unwrap();
        let result = pending.wait().await;
        assert!(result.is_empty());
    }
}

#[tokio::test]
#[ignore = "needs tesseract with jpn/jpn_vert data and JPN_READER_GOLDEN_DIR"]
async fn test_golden_horizontal_text_matches_expected() {
    let settings = ReaderSettings::default();
    let session = real_session(&settings);
    let capture = load_golden_capture("horizontal_ja.png");
    let expected = std::fs::read_to_string(golden_fixture("horizontal_ja.txt")).unwrap();

    let result = session
        .submit(capture, OrientationHint::Horizontal)
        .unwrap()
        .wait()
        .await;

    assert_eq!(result.engine, EngineKind::Neural);
    assert_eq!(strip_whitespace(&result.text), strip_whitespace(&expected));
}

#[tokio::test]
#[ignore = "needs tesseract with jpn_vert data and JPN_READER_GOLDEN_DIR"]
async fn test_golden_vertical_text_comes_from_trainable_engine() {
    let settings = ReaderSettings::default();
    let session = real_session(&settings);
    let capture = load_golden_capture("vertical_ja.png");

    let result = session
        .submit(capture, OrientationHint::Vertical)
        .unwrap()
        .wait()
        .await;

    assert_eq!(result.engine, EngineKind::Trainable);
    assert!(!result.is_empty());
}

#[tokio::test]
#[ignore = "needs tesseract with jpn/jpn_vert data"]
async fn test_blank_image_with_real_engines_is_empty() {
    let settings = ReaderSettings::default();
    let session = real_session(&settings);
    let blank = CapturedImage::from_dynamic_image(&DynamicImage::ImageRgba8(
        RgbaImage::from_pixel(120, 80, Rgba([255, 255, 255, 255])),
    ))
    .unwrap();

    let result = session
        .submit(blank, OrientationHint::Unspecified)
        .unwrap()
        .wait()
        .await;

    assert_eq!(result.text, "");
}
