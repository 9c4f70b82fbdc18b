use crate::device_camera::interface::{DeviceCamera, DeviceCameraEvent};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Synthetic camera: a face-sized blob whose tint drifts from frame to frame.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    width: u32,
    height: u32,
    started: AtomicBool,
    frame_count: AtomicU64,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            width: 640,
            height: 480,
            started: AtomicBool::new(false),
            frame_count: AtomicU64::new(0),
        }
    }

    fn render_frame(&self, n: u64) -> DynamicImage {
        let drift = (n % 120) as f32 / 120.0;
        let tint = [
            (80.0 + 150.0 * drift) as u8,
            (180.0 - 100.0 * drift) as u8,
            (60.0 + rand::random::<f32>() * 40.0) as u8,
        ];
        let (cx, cy) = (self.width as f32 / 2.0, self.height as f32 / 2.0);
        let radius = self.height as f32 / 3.0;
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= radius * radius {
                Rgb(tint)
            } else {
                Rgb([30, 30, 30])
            }
        });
        DynamicImage::ImageRgb8(image)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Starting camera...")?;
        self.started.store(true, Ordering::SeqCst);
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Stopping camera...")?;
        self.started.store(false, Ordering::SeqCst);
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        if !self.started.load(Ordering::SeqCst) {
            return Err("Camera not started".into());
        }
        let n = self.frame_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.render_frame(n))
    }

    fn events(&self) -> std::sync::mpsc::Receiver<DeviceCameraEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let _ = tx.send(DeviceCameraEvent::Connected);
        rx
    }
}
