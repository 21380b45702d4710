use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::core::models::{CapturedImage, OrientationHint, RecognitionResult};
use crate::core::orchestrators::TextRecognizer;
use crate::global_constants::LOG_TAG_SESSION;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("a recognition request is already in flight")]
    RecognitionInFlight,
}

/// The receiving half of one accepted request. Resolves exactly once.
pub struct PendingRecognition {
    request_id: Uuid,
    receiver: oneshot::Receiver<RecognitionResult>,
}

impl PendingRecognition {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub async fn wait(self) -> RecognitionResult {
        match self.receiver.await {
            Ok(result) => result,
            Err(_) => {
                log::error!(
                    "{} [{}] Pipeline ended without a result",
                    LOG_TAG_SESSION,
                    self.request_id
                );
                RecognitionResult::empty(self.request_id)
            }
        }
    }
}

struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the recognizer and admits one capture at a time. Requests that
/// arrive while another is running are turned away, not queued.
pub struct CaptureSession {
    recognizer: Arc<TextRecognizer>,
    in_flight: Arc<AtomicBool>,
    runtime: Handle,
}

impl CaptureSession {
    pub fn build(recognizer: Arc<TextRecognizer>, runtime: Handle) -> Self {
        log::debug!("{} Creating capture session", LOG_TAG_SESSION);

        Self {
            recognizer,
            in_flight: Arc::new(AtomicBool::new(false)),
            runtime,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn submit(
        &self,
        image: CapturedImage,
        hint: OrientationHint,
    ) -> Result<PendingRecognition, SubmitRejection> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!(
                "{} Ignoring capture, another recognition is in flight",
                LOG_TAG_SESSION
            );
            return Err(SubmitRejection::RecognitionInFlight);
        }

        let guard = InFlightGuard(self.in_flight.clone());
        let request_id = Uuid::new_v4();
        let (sender, receiver) = oneshot::channel();
        let recognizer = self.recognizer.clone();
        let image = Arc::new(image);

        log::info!(
            "{} [{}] Accepted {}x{} capture",
            LOG_TAG_SESSION,
            request_id,
            image.width,
            image.height
        );

        self.runtime.spawn(async move {
            let result = recognizer.recognize(request_id, image, hint).await;

            // Release before handing over so the receiver can submit again.
            drop(guard);

            if sender.send(result).is_err() {
                log::debug!(
                    "{} [{}] Caller stopped waiting for the result",
                    LOG_TAG_SESSION,
                    request_id
                );
            }
        });

        Ok(PendingRecognition {
            request_id,
            receiver,
        })
    }

    /// Callback form of [`submit`](Self::submit). Returns `false` and drops
    /// the callback uncalled when the request is rejected.
    pub fn recognize<F>(&self, image: CapturedImage, hint: OrientationHint, callback: F) -> bool
    where
        F: FnOnce(String) + Send + 'static,
    {
        match self.submit(image, hint) {
            Ok(pending) => {
                self.runtime.spawn(async move {
                    let result = pending.wait().await;
                    callback(result.text);
                });
                true
            }
            Err(rejection) => {
                log::info!("{} Capture rejected: {}", LOG_TAG_SESSION, rejection);
                false
            }
        }
    }
}
