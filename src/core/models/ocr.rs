use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrientationHint {
    Vertical,
    Horizontal,
    #[default]
    Unspecified,
}

impl fmt::Display for OrientationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrientationHint::Vertical => write!(f, "Vertical"),
            OrientationHint::Horizontal => write!(f, "Horizontal"),
            OrientationHint::Unspecified => write!(f, "Unspecified"),
        }
    }
}

/// Which engine produced a piece of text. `Neural` is the first adapter and
/// wins ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Neural,
    Trainable,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Neural => write!(f, "neural"),
            EngineKind::Trainable => write!(f, "trainable"),
        }
    }
}

/// Raw output of one OCR engine call.
#[derive(Debug, Clone, Default)]
pub struct OcrResult {
    pub full_text: String,
}

impl OcrResult {
    pub fn from_text(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
        }
    }
}

/// The single answer produced for a capture request. Empty text means
/// nothing was recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub request_id: Uuid,
    pub text: String,
    pub engine: EngineKind,
}

impl RecognitionResult {
    pub fn new(request_id: Uuid, text: String, engine: EngineKind) -> Self {
        Self {
            request_id,
            text,
            engine,
        }
    }

    pub fn empty(request_id: Uuid) -> Self {
        Self::new(request_id, String::new(), EngineKind::Neural)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn character_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Preprocessing,
    Recognizing,
    Selecting,
    Done,
}
