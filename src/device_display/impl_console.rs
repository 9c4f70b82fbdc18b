use crate::device_display::interface::{DeviceDisplay, DisplayFrame};
use crate::theme_store::interface::Theme;
use std::error::Error;

const WIDTH: usize = 64;

pub struct DeviceDisplayConsole {
    last_frame: Option<DisplayFrame>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self { last_frame: None }
    }

    fn render_display(frame: &DisplayFrame) -> String {
        let (top, side, bottom) = match frame.theme {
            Theme::Light => ("┌", "│", "└"),
            Theme::Dark => ("╔", "║", "╚"),
        };
        let (top_end, bottom_end, bar) = match frame.theme {
            Theme::Light => ("┐", "┘", "─"),
            Theme::Dark => ("╗", "╝", "═"),
        };

        let mut lines = vec![frame.mood_line.clone(), frame.stress_line.clone()];
        if let Some(overlay) = &frame.overlay {
            lines.push(format!("> {}", overlay));
        }
        lines.push(frame.status.clone());

        let mut out = format!("{}{}{}\n", top, bar.repeat(WIDTH), top_end);
        for line in lines {
            let clipped: String = line.chars().take(WIDTH).collect();
            let pad = WIDTH - clipped.chars().count();
            out.push_str(&format!("{}{}{}{}\n", side, clipped, " ".repeat(pad), side));
        }
        out.push_str(&format!("{}{}{}", bottom, bar.repeat(WIDTH), bottom_end));
        out
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.last_frame = None;
        Ok(())
    }

    fn show(&mut self, frame: &DisplayFrame) -> Result<(), Box<dyn Error + Send + Sync>> {
        // text only: a new camera frame alone is not a change
        let text = DisplayFrame {
            preview: None,
            ..frame.clone()
        };
        if self.last_frame.as_ref() == Some(&text) {
            return Ok(());
        }
        println!("{}", Self::render_display(&text));
        self.last_frame = Some(text);
        Ok(())
    }
}
