mod captured_image;
mod ocr;
mod reader_settings;
mod screen_region;

pub use captured_image::{CapturedImage, PixelFormat};
pub use ocr::{EngineKind, OcrResult, OrientationHint, PipelineStage, RecognitionResult};
pub use reader_settings::{
    NeuralEngineSettings, PreprocessingSettings, ReaderSettings, TrainableEngineSettings,
};
pub use screen_region::ScreenRegion;
