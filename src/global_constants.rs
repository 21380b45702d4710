pub const APPLICATION_NAME: &str = "JPN Reader";

pub const LOG_TAG_MAIN: &str = "[MAIN]";
pub const LOG_TAG_CAPTURE: &str = "[CAPTURE]";
pub const LOG_TAG_PREPROCESS: &str = "[PREPROCESS]";
pub const LOG_TAG_RECOGNIZER: &str = "[RECOGNIZER]";
pub const LOG_TAG_SESSION: &str = "[SESSION]";
pub const LOG_TAG_SETTINGS: &str = "[SETTINGS]";

pub const NO_TEXT_TITLE: &str = "No Japanese text detected";
pub const NO_TEXT_DETAIL: &str = "No text was found in the selected region.";

pub const ERROR_CONTEXT_SCALE_FACTOR: &str = "Unable to get scale factor";
pub const ERROR_CONTEXT_CAPTURE_MONITOR: &str = "Unable to capture Monitor";

pub const SETTINGS_DIRECTORY_NAME: &str = "jpn-reader";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const DEFAULT_ENGINE_TIMEOUT_SECONDS: u64 = 30;

pub const DEFAULT_UPSCALE_FACTOR: f32 = 2.0;
pub const DEFAULT_CONTRAST: f32 = 1.5;
pub const DEFAULT_SATURATION: f32 = 0.0;
pub const DEFAULT_BRIGHTNESS: f32 = 0.1;
pub const DEFAULT_SHARPNESS: f32 = 1.0;
pub const DEFAULT_SHARPEN_RADIUS: f32 = 1.69;

pub const MAX_PREPROCESSED_DIMENSION: u32 = 16_384;

pub const VISION_RECOGNITION_LANGUAGES: [&str; 2] = ["ja", "en"];
pub const HORIZONTAL_TESSERACT_LANGUAGE: &str = "jpn+eng";
pub const VERTICAL_TESSERACT_LANGUAGE: &str = "jpn_vert";

/// Tesseract `--psm 3`: fully automatic page segmentation.
pub const PSM_AUTO: i32 = 3;
/// Tesseract `--psm 5`: a single uniform block of vertically aligned text.
pub const PSM_SINGLE_BLOCK_VERTICAL_TEXT: i32 = 5;
/// Tesseract `--oem 1`: LSTM network only.
pub const OEM_LSTM_ONLY: i32 = 1;

pub const DEFAULT_JPEG_QUALITY: u8 = 100;
