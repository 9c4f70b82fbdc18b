use image::{imageops, DynamicImage};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCameraEvent {
    Disconnected,
    Connected,
}

/// Downscaled RGB copy of a captured frame, for showing the live feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePreview {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB8, `width * height * 3` bytes.
    pub rgb: Arc<Vec<u8>>,
}

impl FramePreview {
    pub const MAX_WIDTH: u32 = 320;

    pub fn from_frame(frame: &DynamicImage) -> Self {
        let scaled = if frame.width() > Self::MAX_WIDTH {
            let height = (frame.height() * Self::MAX_WIDTH / frame.width()).max(1);
            frame.resize_exact(Self::MAX_WIDTH, height, imageops::FilterType::Triangle)
        } else {
            frame.clone()
        };
        let rgb = scaled.to_rgb8();
        Self {
            width: rgb.width(),
            height: rgb.height(),
            rgb: Arc::new(rgb.into_raw()),
        }
    }
}

pub trait DeviceCamera {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    #[allow(dead_code)]
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>>;
    fn events(&self) -> std::sync::mpsc::Receiver<DeviceCameraEvent>;
}
