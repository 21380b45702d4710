use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::watch;
use uuid::Uuid;

use crate::core::interfaces::adapters::OcrService;
use crate::core::models::{
    CapturedImage, EngineKind, OrientationHint, PipelineStage, ReaderSettings, RecognitionResult,
};
use crate::core::orchestrators::EngineAdapter;
use crate::core::preprocessing::ImagePreprocessor;
use crate::global_constants::LOG_TAG_RECOGNIZER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePlan {
    Single(EngineKind),
    Both,
}

/// Horizontal text goes to the neural engine, vertical text to the
/// trainable one. Without a hint, or when forced, both run.
pub fn plan_engines(hint: OrientationHint, run_both_engines: bool) -> EnginePlan {
    if run_both_engines {
        return EnginePlan::Both;
    }

    match hint {
        OrientationHint::Horizontal => EnginePlan::Single(EngineKind::Neural),
        OrientationHint::Vertical => EnginePlan::Single(EngineKind::Trainable),
        OrientationHint::Unspecified => EnginePlan::Both,
    }
}

/// Longest text by character count. Earlier candidates win ties.
pub fn select_longest(
    candidates: Vec<RecognitionResult>,
    request_id: Uuid,
) -> RecognitionResult {
    candidates
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.character_count() > best.character_count() {
                candidate
            } else {
                best
            }
        })
        .unwrap_or_else(|| RecognitionResult::empty(request_id))
}

pub struct TextRecognizer {
    neural_engine: EngineAdapter,
    trainable_engine: EngineAdapter,
    preprocessor: Arc<ImagePreprocessor>,
    run_both_engines: bool,
    stage_sender: watch::Sender<PipelineStage>,
}

impl TextRecognizer {
    pub fn build(
        neural_engine: EngineAdapter,
        trainable_engine: EngineAdapter,
        preprocessor: ImagePreprocessor,
        run_both_engines: bool,
    ) -> Self {
        log::info!(
            "{} Building recognizer, run both engines: {}",
            LOG_TAG_RECOGNIZER,
            run_both_engines
        );
        let (stage_sender, _) = watch::channel(PipelineStage::Idle);

        Self {
            neural_engine,
            trainable_engine,
            preprocessor: Arc::new(preprocessor),
            run_both_engines,
            stage_sender,
        }
    }

    pub fn from_settings(
        neural_service: Arc<dyn OcrService>,
        trainable_service: Arc<dyn OcrService>,
        settings: &ReaderSettings,
    ) -> Self {
        let timeout = settings.engine_timeout();

        Self::build(
            EngineAdapter::new(EngineKind::Neural, neural_service, timeout),
            EngineAdapter::new(EngineKind::Trainable, trainable_service, timeout),
            ImagePreprocessor::from_settings(&settings.preprocessing),
            settings.run_both_engines,
        )
    }

    pub fn subscribe_to_stages(&self) -> watch::Receiver<PipelineStage> {
        self.stage_sender.subscribe()
    }

    pub fn current_stage(&self) -> PipelineStage {
        *self.stage_sender.borrow()
    }

    pub async fn recognize(
        &self,
        request_id: Uuid,
        image: Arc<CapturedImage>,
        hint: OrientationHint,
    ) -> RecognitionResult {
        log::info!(
            "{} [{}] Recognizing {}x{} capture, hint: {}",
            LOG_TAG_RECOGNIZER,
            request_id,
            image.width,
            image.height,
            hint
        );

        self.enter_stage(request_id, PipelineStage::Preprocessing);
        let prepared = match self.preprocess(request_id, image).await {
            Some(prepared) => prepared,
            None => {
                self.enter_stage(request_id, PipelineStage::Done);
                self.enter_stage(request_id, PipelineStage::Idle);
                return RecognitionResult::empty(request_id);
            }
        };

        self.enter_stage(request_id, PipelineStage::Recognizing);
        let candidates = match plan_engines(hint, self.run_both_engines) {
            EnginePlan::Single(kind) => {
                vec![self.engine(kind).recognize(request_id, &prepared).await]
            }
            EnginePlan::Both => {
                let (neural, trainable) = tokio::join!(
                    self.neural_engine.recognize(request_id, &prepared),
                    self.trainable_engine.recognize(request_id, &prepared)
                );
                vec![neural, trainable]
            }
        };

        self.enter_stage(request_id, PipelineStage::Selecting);
        let result = select_longest(candidates, request_id);

        self.enter_stage(request_id, PipelineStage::Done);
        log::info!(
            "{} [{}] Selected {} characters from the {} engine",
            LOG_TAG_RECOGNIZER,
            request_id,
            result.character_count(),
            result.engine
        );
        self.enter_stage(request_id, PipelineStage::Idle);

        result
    }

    fn engine(&self, kind: EngineKind) -> &EngineAdapter {
        match kind {
            EngineKind::Neural => &self.neural_engine,
            EngineKind::Trainable => &self.trainable_engine,
        }
    }

    async fn preprocess(
        &self,
        request_id: Uuid,
        image: Arc<CapturedImage>,
    ) -> Option<DynamicImage> {
        let preprocessor = self.preprocessor.clone();

        let task = tokio::task::spawn_blocking(move || -> anyhow::Result<DynamicImage> {
            let source = image.to_dynamic_image()?;
            Ok(preprocessor.process(&source))
        });

        match task.await {
            Ok(Ok(prepared)) => Some(prepared),
            Ok(Err(error)) => {
                log::error!(
                    "{} [{}] Could not decode capture: {:#}",
                    LOG_TAG_RECOGNIZER,
                    request_id,
                    error
                );
                None
            }
            Err(error) => {
                log::error!(
                    "{} [{}] Preprocessing task failed: {}",
                    LOG_TAG_RECOGNIZER,
                    request_id,
                    error
                );
                None
            }
        }
    }

    fn enter_stage(&self, request_id: Uuid, stage: PipelineStage) {
        log::debug!("{} [{}] -> {:?}", LOG_TAG_RECOGNIZER, request_id, stage);
        self.stage_sender.send_replace(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{OcrResult, PixelFormat};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockOcrService {
        text: String,
        calls: Arc<AtomicUsize>,
    }

    impl MockOcrService {
        fn returning(text: &str) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let service = Arc::new(Self {
                text: text.to_string(),
                calls: calls.clone(),
            });
            (service, calls)
        }
    }

    #[async_trait::async_trait]
    impl OcrService for MockOcrService {
        async fn extract_text_from_image(
            &self,
            _image: &DynamicImage,
        ) -> anyhow::Result<OcrResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OcrResult::from_text(self.text.clone()))
        }
    }

    struct SizeRecordingOcrService {
        seen: std::sync::Mutex<Option<(u32, u32)>>,
    }

    #[async_trait::async_trait]
    impl OcrService for SizeRecordingOcrService {
        async fn extract_text_from_image(
            &self,
            image: &DynamicImage,
        ) -> anyhow::Result<OcrResult> {
            *self.seen.lock().unwrap() = Some((image.width(), image.height()));
            Ok(OcrResult::default())
        }
    }

    fn build_recognizer(
        neural: Arc<dyn OcrService>,
        trainable: Arc<dyn OcrService>,
        run_both_engines: bool,
    ) -> TextRecognizer {
        let timeout = Duration::from_secs(2);
        TextRecognizer::build(
            EngineAdapter::new(EngineKind::Neural, neural, timeout),
            EngineAdapter::new(EngineKind::Trainable, trainable, timeout),
            ImagePreprocessor::with_steps(Vec::new()),
            run_both_engines,
        )
    }

    fn test_capture() -> Arc<CapturedImage> {
        let raw_data = vec![255u8; 8 * 8 * 4];
        Arc::new(
            CapturedImage::build_from_raw_data(1.0, 8, 8, PixelFormat::Rgba8, raw_data).unwrap(),
        )
    }

    fn result(text: &str, engine: EngineKind) -> RecognitionResult {
        RecognitionResult::new(Uuid::nil(), text.to_string(), engine)
    }

    #[test]
    fn test_plan_engines_follows_explicit_hint() {
        assert_eq!(
            plan_engines(OrientationHint::Horizontal, false),
            EnginePlan::Single(EngineKind::Neural)
        );
        assert_eq!(
            plan_engines(OrientationHint::Vertical, false),
            EnginePlan::Single(EngineKind::Trainable)
        );
        assert_eq!(
            plan_engines(OrientationHint::Unspecified, false),
            EnginePlan::Both
        );
    }

    #[test]
    fn test_plan_engines_forced_both_overrides_hint() {
        assert_eq!(plan_engines(OrientationHint::Vertical, true), EnginePlan::Both);
        assert_eq!(plan_engines(OrientationHint::Horizontal, true), EnginePlan::Both);
    }

    #[test]
    fn test_select_longest_counts_characters_not_bytes() {
        let selected = select_longest(
            vec![
                result("abcdefg", EngineKind::Neural),
                result("日本語の文章です", EngineKind::Trainable),
            ],
            Uuid::nil(),
        );

        assert_eq!(selected.engine, EngineKind::Trainable);
    }

    #[test]
    fn test_select_longest_prefers_first_on_tie() {
        let selected = select_longest(
            vec![
                result("あいう", EngineKind::Neural),
                result("えおか", EngineKind::Trainable),
            ],
            Uuid::nil(),
        );

        assert_eq!(selected.text, "あいう");
        assert_eq!(selected.engine, EngineKind::Neural);
    }

    #[test]
    fn test_select_longest_without_candidates_is_empty() {
        assert!(select_longest(Vec::new(), Uuid::nil()).is_empty());
    }

    #[tokio::test]
    async fn test_recognize_horizontal_invokes_only_neural_engine() {
        let (neural, neural_calls) = MockOcrService::returning("横書き");
        let (trainable, trainable_calls) = MockOcrService::returning("縦書き");
        let recognizer = build_recognizer(neural, trainable, false);

        let output = recognizer
            .recognize(Uuid::new_v4(), test_capture(), OrientationHint::Horizontal)
            .await;

        assert_eq!(output.text, "横書き");
        assert_eq!(neural_calls.load(Ordering::SeqCst), 1);
        assert_eq!(trainable_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recognize_vertical_invokes_only_trainable_engine() {
        let (neural, neural_calls) = MockOcrService::returning("横書き");
        let (trainable, trainable_calls) = MockOcrService::returning("縦書き");
        let recognizer = build_recognizer(neural, trainable, false);

        let output = recognizer
            .recognize(Uuid::new_v4(), test_capture(), OrientationHint::Vertical)
            .await;

        assert_eq!(output.text, "縦書き");
        assert_eq!(output.engine, EngineKind::Trainable);
        assert_eq!(neural_calls.load(Ordering::SeqCst), 0);
        assert_eq!(trainable_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recognize_unspecified_returns_longer_text_from_either_engine() {
        let (neural, _) = MockOcrService::returning("短い");
        let (trainable, _) = MockOcrService::returning("こちらの方が長い");
        let recognizer = build_recognizer(neural, trainable, false);

        let output = recognizer
            .recognize(Uuid::new_v4(), test_capture(), OrientationHint::Unspecified)
            .await;
        assert_eq!(output.text, "こちらの方が長い");

        let (neural, _) = MockOcrService::returning("こちらの方が長い");
        let (trainable, _) = MockOcrService::returning("短い");
        let recognizer = build_recognizer(neural, trainable, false);

        let output = recognizer
            .recognize(Uuid::new_v4(), test_capture(), OrientationHint::Unspecified)
            .await;
        assert_eq!(output.text, "こちらの方が長い");
        assert_eq!(output.engine, EngineKind::Neural);
    }

    #[tokio::test]
    async fn test_recognize_both_empty_yields_empty_text() {
        let (neural, neural_calls) = MockOcrService::returning("");
        let (trainable, trainable_calls) = MockOcrService::returning("");
        let recognizer = build_recognizer(neural, trainable, false);

        let output = recognizer
            .recognize(Uuid::new_v4(), test_capture(), OrientationHint::Unspecified)
            .await;

        assert!(output.is_empty());
        assert_eq!(neural_calls.load(Ordering::SeqCst), 1);
        assert_eq!(trainable_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recognize_forced_both_runs_both_engines_despite_hint() {
        let (neural, neural_calls) = MockOcrService::returning("a");
        let (trainable, trainable_calls) = MockOcrService::returning("abc");
        let recognizer = build_recognizer(neural, trainable, true);

        let output = recognizer
            .recognize(Uuid::new_v4(), test_capture(), OrientationHint::Horizontal)
            .await;

        assert_eq!(output.text, "abc");
        assert_eq!(neural_calls.load(Ordering::SeqCst), 1);
        assert_eq!(trainable_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recognize_returns_to_idle_and_publishes_stages() {
        let (neural, _) = MockOcrService::returning("x");
        let (trainable, _) = MockOcrService::returning("y");
        let recognizer = build_recognizer(neural, trainable, false);
        let stages = recognizer.subscribe_to_stages();

        let request_id = Uuid::new_v4();
        let output = recognizer
            .recognize(request_id, test_capture(), OrientationHint::Unspecified)
            .await;

        assert_eq!(output.request_id, request_id);
        assert_eq!(recognizer.current_stage(), PipelineStage::Idle);
        assert!(stages.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_recognize_hands_preprocessed_image_to_engines() {
        let recorder = Arc::new(SizeRecordingOcrService {
            seen: std::sync::Mutex::new(None),
        });
        let (trainable, _) = MockOcrService::returning("");
        let settings = ReaderSettings::default();
        let recognizer = TextRecognizer::from_settings(recorder.clone(), trainable, &settings);

        recognizer
            .recognize(Uuid::new_v4(), test_capture(), OrientationHint::Horizontal)
            .await;

        assert_eq!(*recorder.seen.lock().unwrap(), Some((16, 16)));
    }
}
