mod image_file_capturer;
mod xcap_screen_capturer;

pub use image_file_capturer::ImageFileCapturer;
pub use xcap_screen_capturer::XcapRegionCapturer;
