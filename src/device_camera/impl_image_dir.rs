use crate::device_camera::interface::{DeviceCamera, DeviceCameraEvent};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Plays back the images of a directory in name order, looping forever.
pub struct DeviceCameraImageDir {
    dir: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
    frames: Mutex<Vec<PathBuf>>,
    next: AtomicUsize,
}

impl DeviceCameraImageDir {
    pub fn new(dir: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            dir,
            logger: logger.with_namespace("camera").with_namespace("image_dir"),
            frames: Mutex::new(Vec::new()),
            next: AtomicUsize::new(0),
        }
    }

    fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if is_image {
                frames.push(path);
            }
        }
        frames.sort();
        Ok(frames)
    }
}

impl DeviceCamera for DeviceCameraImageDir {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger
            .info(&format!("Opening frames in {}", self.dir.display()))?;
        let found = Self::list_frames(&self.dir)?;
        if found.is_empty() {
            return Err(format!("No images found in {}", self.dir.display()).into());
        }
        self.logger.info(&format!("Found {} frames", found.len()))?;
        let mut frames = self.frames.lock().map_err(|e| e.to_string())?;
        *frames = found;
        self.next.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.frames.lock().map_err(|e| e.to_string())?.clear();
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        let path = {
            let frames = self.frames.lock().map_err(|e| e.to_string())?;
            if frames.is_empty() {
                return Err("Camera not started".into());
            }
            let idx = self.next.fetch_add(1, Ordering::SeqCst) % frames.len();
            frames[idx].clone()
        };
        Ok(image::open(&path)?)
    }

    fn events(&self) -> std::sync::mpsc::Receiver<DeviceCameraEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let event = if self.dir.is_dir() {
            DeviceCameraEvent::Connected
        } else {
            DeviceCameraEvent::Disconnected
        };
        let _ = tx.send(event);
        rx
    }
}
