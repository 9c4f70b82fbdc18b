use crate::mood_classifier::train::TrainOptions;
use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_rate: Duration,
    pub smoothing_window: usize,
    pub embedding_size: usize,
    pub backbone_input_shape: (u32, u32),
    pub backbone_path: Option<PathBuf>,
    pub camera_dir: Option<PathBuf>,
    pub model_path: PathBuf,
    pub export_path: PathBuf,
    pub theme_path: PathBuf,
    pub display: DisplayKind,
    pub train_options: TrainOptions,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(300),
            smoothing_window: 10,
            // MobileNetV2 global average pool width
            embedding_size: 1280,
            backbone_input_shape: (224, 224),
            backbone_path: None,
            camera_dir: None,
            model_path: PathBuf::from("models/mood-stress-model.json"),
            export_path: PathBuf::from("mood-stress-model.json"),
            theme_path: PathBuf::from(".mood-mirror-theme.json"),
            display: DisplayKind::Console,
            train_options: TrainOptions::default(),
            logger_timezone: mountain_standard_time(),
        }
    }
}

impl Config {
    /// Default config with `MOOD_MIRROR_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("MOOD_MIRROR_BACKBONE") {
            self.backbone_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("MOOD_MIRROR_CAMERA_DIR") {
            self.camera_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = lookup("MOOD_MIRROR_MODEL_PATH") {
            self.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("MOOD_MIRROR_EXPORT_PATH") {
            self.export_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("MOOD_MIRROR_THEME_PATH") {
            self.theme_path = PathBuf::from(path);
        }
        if let Some(display) = lookup("MOOD_MIRROR_DISPLAY") {
            self.display = match display.to_lowercase().as_str() {
                "gui" => DisplayKind::Gui,
                _ => DisplayKind::Console,
            };
        }
        if let Some(ms) = lookup("MOOD_MIRROR_TICK_MS").and_then(|v| v.parse::<u64>().ok()) {
            self.tick_rate = Duration::from_millis(ms.max(1));
        }
        self
    }
}

fn mountain_standard_time() -> chrono::FixedOffset {
    chrono::FixedOffset::west_opt(7 * 3600).unwrap_or_else(|| chrono::Utc.fix())
}
