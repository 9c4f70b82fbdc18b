use crate::device_input::interface::{DeviceInput, InputEvent};
use std::sync::mpsc::{channel, Receiver};

/// Replays a fixed list of commands to whoever subscribes.
#[derive(Debug, Clone, Default)]
pub struct DeviceInputFake {
    script: Vec<InputEvent>,
}

impl DeviceInputFake {
    pub fn new(script: Vec<InputEvent>) -> Self {
        Self { script }
    }
}

impl DeviceInput for DeviceInputFake {
    fn events(&self) -> Receiver<InputEvent> {
        let (tx, rx) = channel();
        for event in &self.script {
            let _ = tx.send(*event);
        }
        rx
    }
}
