use config::{Config, DisplayKind};
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::impl_image_dir::DeviceCameraImageDir;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::{DeviceDisplayGui, MirrorWindow};
use device_input::impl_console::DeviceInputConsole;
use device_input::interface::InputEvent;
use feature_extractor::impl_fake::FeatureExtractorFake;
use feature_extractor::impl_tract_onnx::FeatureExtractorTractOnnx;
use feature_extractor::interface::FeatureExtractor;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use mood_detector::core::Msg;
use mood_detector::main::MoodDetector;
use std::sync::{Arc, Mutex};
use theme_store::impl_file::ThemeStoreFile;

mod config;
mod device_camera;
mod device_display;
mod device_input;
mod feature_extractor;
mod library;
mod mood_classifier;
mod mood_detector;
mod theme_store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match &config.camera_dir {
        Some(dir) => Arc::new(DeviceCameraImageDir::new(dir.clone(), logger.clone())),
        None => Arc::new(DeviceCameraFake::new(logger.clone())),
    };

    let feature_extractor: Arc<dyn FeatureExtractor + Send + Sync> = match &config.backbone_path {
        Some(path) => Arc::new(
            FeatureExtractorTractOnnx::new(
                path,
                config.backbone_input_shape,
                config.embedding_size,
                logger.clone(),
            )
            .map_err(|e| e.to_string())?,
        ),
        None => Arc::new(FeatureExtractorFake::new(config.embedding_size, logger.clone())),
    };

    if feature_extractor.embedding_size() != config.embedding_size {
        return Err(format!(
            "Feature extractor produces {} features but the classifier expects {}",
            feature_extractor.embedding_size(),
            config.embedding_size
        )
        .into());
    }

    let theme_store = Arc::new(ThemeStoreFile::new(config.theme_path.clone(), logger.clone()));

    match config.display {
        DisplayKind::Console => {
            let device_input = Arc::new(DeviceInputConsole::new(logger.clone()));
            let mood_detector = MoodDetector::new(
                config,
                logger,
                device_camera,
                Arc::new(Mutex::new(DeviceDisplayConsole::new())),
                device_input,
                feature_extractor,
                theme_store,
            );

            mood_detector.run().map_err(|e| e.to_string())?;
        }
        DisplayKind::Gui => {
            let gui = DeviceDisplayGui::new();
            let window = gui.window();
            let mood_detector = MoodDetector::new(
                config,
                logger.clone(),
                device_camera,
                Arc::new(Mutex::new(gui.clone())),
                Arc::new(gui),
                feature_extractor,
                theme_store,
            );

            let background = mood_detector.clone();
            let handle = std::thread::spawn(move || background.run().map(|_| ()).map_err(|e| e.to_string()));

            // the window must own the main thread
            eframe::run_native(
                "Mood Mirror",
                MirrorWindow::native_options(),
                Box::new(|_cc| Box::new(window)),
            )?;

            mood_detector.send(Msg::Input(InputEvent::Quit));
            match handle.join() {
                Ok(result) => result?,
                Err(_) => logger.warn("Detector thread panicked").map_err(|e| e.to_string())?,
            }
        }
    }

    Ok(())
}
