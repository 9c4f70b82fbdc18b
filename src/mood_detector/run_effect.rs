use super::core::{Capture, CapturePurpose, Effect, Msg};
use crate::device_camera::interface::FramePreview;
use super::main::MoodDetector;
use crate::mood_classifier::{storage, train_classifier};

impl MoodDetector {
    pub fn run_effect(&self, effect: Effect) {
        if !matches!(effect, Effect::CaptureFrame { .. }) {
            let _ = self
                .logger
                .info(&format!("Running effect: {}", effect.to_display_string()));
        }

        match effect {
            Effect::SubscribeCamera => {
                let events = self.device_camera.events();
                while let Ok(event) = events.recv() {
                    self.send(Msg::CameraEvent(event));
                }
            }
            Effect::SubscribeInput => {
                let events = self.device_input.events();
                while let Ok(event) = events.recv() {
                    self.send(Msg::Input(event));
                }
            }
            Effect::SubscribeTick => {
                while !self.is_stopped() {
                    std::thread::sleep(self.config.tick_rate);
                    self.send(Msg::Tick);
                }
            }
            Effect::StartCamera => {
                let started = self.device_camera.start();
                self.send(Msg::CameraStartDone(started));
            }
            Effect::LoadClassifier => {
                let loaded = storage::load_model(&self.config.model_path, self.config.embedding_size);
                if let Err(e) = &loaded {
                    let _ = self.logger.warn(&format!("No classifier loaded: {}", e));
                }
                self.send(Msg::ClassifierLoadDone(loaded));
            }
            Effect::LoadTheme => {
                let loaded = self.theme_store.load();
                self.send(Msg::ThemeLoadDone(loaded));
            }
            Effect::SaveTheme { theme } => {
                let saved = self.theme_store.save(theme);
                self.send(Msg::ThemeSaveDone(saved));
            }
            Effect::CaptureFrame { purpose, session } => {
                let result = self.capture(purpose);
                self.send(Msg::CaptureDone {
                    purpose,
                    session,
                    result,
                });
            }
            Effect::TrainClassifier { samples } => {
                let trained = train_classifier(
                    &samples,
                    self.config.embedding_size,
                    &self.config.train_options,
                );
                if let Ok(report) = &trained {
                    let _ = self.logger.info(&format!(
                        "Trained on {} samples in {} epochs (train loss {:.4}, val loss {:?}, val accuracy {:?})",
                        report.samples_used,
                        report.epochs_run,
                        report.final_train_loss,
                        report.best_val_loss,
                        report.val_accuracy
                    ));
                }
                self.send(Msg::TrainDone(trained));
            }
            Effect::SaveClassifier { model } => {
                let path = self.config.export_path.clone();
                let saved = storage::save_model(&model, &path).map(|()| path);
                self.send(Msg::SaveDone(saved));
            }
        }
    }

    fn capture(
        &self,
        purpose: CapturePurpose,
    ) -> Result<Capture, Box<dyn std::error::Error + Send + Sync>> {
        let frame = self.device_camera.capture_frame()?;
        let preview = FramePreview::from_frame(&frame);
        if purpose == CapturePurpose::Preview {
            return Ok(Capture {
                preview,
                embedding: None,
            });
        }
        let embedding = self.feature_extractor.extract(&frame);
        if let Err(e) = &embedding {
            let _ = self
                .logger
                .warn(&format!("Embedding for {:?} failed: {}", purpose, e));
        }
        Ok(Capture {
            preview,
            embedding: Some(embedding?),
        })
    }
}
