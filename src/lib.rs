//! Reads Japanese text out of a captured screen region.
//!
//! A capture is preprocessed, sent to the neural engine, the trainable
//! vertical-text engine, or both, and the longest recognized text is handed
//! back through a [`CaptureSession`](core::orchestrators::CaptureSession).

pub mod adapters;
pub mod core;
pub mod global_constants;
pub mod ports;
