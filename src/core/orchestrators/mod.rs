mod capture_session;
mod engine_adapter;
mod text_recognizer;

pub use capture_session::{CaptureSession, PendingRecognition, SubmitRejection};
pub use engine_adapter::EngineAdapter;
pub use text_recognizer::{plan_engines, select_longest, EnginePlan, TextRecognizer};
