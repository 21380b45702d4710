mod capture_source;
mod result_presenter;

pub use capture_source::CaptureSource;
pub use result_presenter::ResultPresenter;
