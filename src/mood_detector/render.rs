use super::core::{Phase, State};
use crate::device_display::interface::{Accent, DeviceDisplay, DisplayFrame};
use crate::mood_classifier::sample::label_counts;
use crate::mood_classifier::MoodLabel;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>) -> Self {
        Self { device_display }
    }

    pub fn init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut device_display = self.device_display.lock().map_err(|e| e.to_string())?;
        device_display.init()
    }

    pub fn render(&self, state: &State) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let frame = to_display_frame(state);
        let mut device_display = self.device_display.lock().map_err(|e| e.to_string())?;
        device_display.show(&frame)
    }
}

/// Whole percent, halves rounded up.
fn percent(value: f32) -> String {
    format!("{:.0}%", (value * 100.0).round())
}

pub fn to_display_frame(state: &State) -> DisplayFrame {
    let (mood_line, stress_line, accent) = match &state.reading {
        Some(reading) => (
            format!(
                "Mood: {} ({})",
                reading.label.display_name(),
                percent(reading.confidence)
            ),
            format!("Stress: {}", percent(reading.stress)),
            match reading.label {
                MoodLabel::Happy => Accent::Happy,
                MoodLabel::Sad => Accent::Sad,
                MoodLabel::Stressed => Accent::Stressed,
            },
        ),
        None => (
            "Mood: --".to_string(),
            "Stress: --".to_string(),
            Accent::Neutral,
        ),
    };

    let overlay = match &state.phase {
        Phase::Halted { message } => Some(message.clone()),
        Phase::Initializing { .. } => state
            .message
            .clone()
            .or_else(|| Some("Starting camera...".to_string())),
        Phase::Running => state.message.clone(),
    };

    let counts = label_counts(&state.samples);
    let mut status = format!(
        "Samples happy {} / sad {} / stressed {}",
        counts[MoodLabel::Happy.index()],
        counts[MoodLabel::Sad.index()],
        counts[MoodLabel::Stressed.index()],
    );
    if let Some(label) = state.collecting {
        status.push_str(&format!(" | collecting {}", label.as_str()));
    }
    if state.training {
        status.push_str(" | training");
    }
    if state.paused {
        status.push_str(" | paused");
    }

    DisplayFrame {
        mood_line,
        stress_line,
        preview: state.preview.clone(),
        overlay,
        status,
        accent,
        theme: state.theme,
        collecting: state.collecting.is_some(),
        paused: state.paused,
    }
}
