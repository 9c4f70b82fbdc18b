use super::render::Render;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_input::interface::DeviceInput;
use crate::feature_extractor::interface::FeatureExtractor;
use crate::library::logger::interface::Logger;
use crate::mood_detector::core::Msg;
use crate::theme_store::interface::ThemeStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MoodDetector {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub device_input: Arc<dyn DeviceInput + Send + Sync>,
    pub feature_extractor: Arc<dyn FeatureExtractor + Send + Sync>,
    pub theme_store: Arc<dyn ThemeStore + Send + Sync>,
    pub render: Render,
    msg_sender: Sender<Msg>,
    msg_receiver: Arc<Mutex<Receiver<Msg>>>,
    stopped: Arc<AtomicBool>,
}

impl MoodDetector {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        device_input: Arc<dyn DeviceInput + Send + Sync>,
        feature_extractor: Arc<dyn FeatureExtractor + Send + Sync>,
        theme_store: Arc<dyn ThemeStore + Send + Sync>,
    ) -> Self {
        let (msg_sender, msg_receiver) = channel();

        Self {
            config,
            logger: logger.with_namespace("mood_detector"),
            device_camera,
            device_input,
            feature_extractor,
            theme_store,
            render: Render::new(device_display),
            msg_sender,
            msg_receiver: Arc::new(Mutex::new(msg_receiver)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn send(&self, msg: Msg) {
        if let Err(e) = self.msg_sender.send(msg) {
            let _ = self.logger.warn(&format!("Dropped message: {}", e));
        }
    }

    /// Tells long-running effects such as the tick timer to finish.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn recv(&self) -> Result<Msg, Box<dyn std::error::Error + Send + Sync>> {
        let receiver = self.msg_receiver.lock().map_err(|e| e.to_string())?;
        Ok(receiver.recv()?)
    }
}
