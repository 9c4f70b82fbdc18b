use crate::device_camera::interface::FramePreview;
use crate::theme_store::interface::Theme;
use std::error::Error;

/// Colour cue for the current mood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Accent {
    #[default]
    Neutral,
    Happy,
    Sad,
    Stressed,
}

/// Everything the screen shows for one state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayFrame {
    pub mood_line: String,
    pub stress_line: String,
    /// Latest camera frame, drawn under the overlay.
    pub preview: Option<FramePreview>,
    /// Text drawn in the translucent box over the video.
    pub overlay: Option<String>,
    pub status: String,
    pub accent: Accent,
    pub theme: Theme,
    pub collecting: bool,
    pub paused: bool,
}

pub trait DeviceDisplay: Send + Sync {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show(&mut self, frame: &DisplayFrame) -> Result<(), Box<dyn Error + Send + Sync>>;
}
