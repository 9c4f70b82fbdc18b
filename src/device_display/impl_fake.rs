use crate::device_display::interface::{DeviceDisplay, DisplayFrame};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Records every frame it is asked to show.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    pub frames: Arc<Mutex<Vec<DisplayFrame>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<DisplayFrame> {
        self.frames.lock().ok().and_then(|f| f.last().cloned())
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn show(&mut self, frame: &DisplayFrame) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.frames
            .lock()
            .map_err(|e| e.to_string())?
            .push(frame.clone());
        Ok(())
    }
}
