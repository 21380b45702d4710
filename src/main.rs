use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use jpn_reader::adapters::{self, ConsoleResultPresenter};
use jpn_reader::core::interfaces::ports::{CaptureSource, ResultPresenter};
use jpn_reader::core::models::{OrientationHint, ReaderSettings, ScreenRegion};
use jpn_reader::core::orchestrators::{CaptureSession, TextRecognizer};
use jpn_reader::global_constants::{APPLICATION_NAME, LOG_TAG_MAIN};
use jpn_reader::ports::{ImageFileCapturer, XcapRegionCapturer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Orientation {
    Vertical,
    Horizontal,
    Auto,
}

impl From<Orientation> for OrientationHint {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => OrientationHint::Vertical,
            Orientation::Horizontal => OrientationHint::Horizontal,
            Orientation::Auto => OrientationHint::Unspecified,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "jpn-reader", version, about = "Recognize Japanese text in a screen region or image")]
struct Cli {
    /// Image file to read instead of capturing the screen
    #[arg(long, conflicts_with = "region", required_unless_present = "region")]
    image: Option<PathBuf>,

    /// Screen region as X,Y,WIDTH,HEIGHT in logical points
    #[arg(long)]
    region: Option<ScreenRegion>,

    /// Text orientation; defaults to the configured orientation
    #[arg(long, value_enum)]
    orientation: Option<Orientation>,

    /// Settings file to use instead of the per-user one
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn load_settings(path: Option<&PathBuf>) -> ReaderSettings {
    let loaded = match path {
        Some(path) => ReaderSettings::load_from_path(path),
        None => ReaderSettings::load(),
    };

    loaded.unwrap_or_else(|error| {
        log::warn!(
            "{} Failed to load settings, using defaults: {:#}",
            LOG_TAG_MAIN,
            error
        );
        ReaderSettings::default()
    })
}

fn build_capture_source(cli: &Cli) -> Result<Box<dyn CaptureSource>> {
    match (&cli.image, cli.region) {
        (Some(path), _) => Ok(Box::new(ImageFileCapturer::for_path(path))),
        (None, Some(region)) => Ok(Box::new(XcapRegionCapturer::for_region(region))),
        (None, None) => anyhow::bail!("Either --image or --region is required"),
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.settings.as_ref());
    let hint = cli
        .orientation
        .map(OrientationHint::from)
        .unwrap_or(settings.default_orientation);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    let recognizer = TextRecognizer::from_settings(
        adapters::build_neural_ocr_service(&settings)?,
        adapters::build_trainable_ocr_service(&settings)?,
        &settings,
    );
    let session = CaptureSession::build(Arc::new(recognizer), runtime.handle().clone());
    let presenter = ConsoleResultPresenter::to_stdout();

    let capture_source = build_capture_source(&cli)?;
    let image = match capture_source.request_capture()? {
        Some(image) => image,
        None => {
            log::info!("{} Capture cancelled", LOG_TAG_MAIN);
            return Ok(());
        }
    };

    let pending = session.submit(image, hint)?;
    let result = runtime.block_on(pending.wait());

    log::info!(
        "{} [{}] Delivering {} characters from the {} engine",
        LOG_TAG_MAIN,
        result.request_id,
        result.character_count(),
        result.engine
    );
    presenter.deliver_result(&result.text);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    log::info!("{} Starting {}", LOG_TAG_MAIN, APPLICATION_NAME);

    let cli = Cli::parse();
    run(cli)
}
