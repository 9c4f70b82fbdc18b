use crate::device_camera::interface::FramePreview;
use crate::device_display::interface::{Accent, DeviceDisplay, DisplayFrame};
use crate::device_input::interface::{DeviceInput, InputEvent};
use crate::mood_classifier::{MoodLabel, MOOD_LABELS};
use crate::theme_store::interface::Theme;
use eframe::egui;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// egui window that is both the display and the button panel.
///
/// The window itself has to run on the main thread, so `window()` hands out
/// the `eframe::App` half while clones of this struct are given to the
/// detector as its display and input devices.
#[derive(Clone)]
pub struct DeviceDisplayGui {
    frame: Arc<Mutex<DisplayFrame>>,
    egui_ctx: Arc<Mutex<Option<egui::Context>>>,
    input_tx: Sender<InputEvent>,
    input_rx: Arc<Mutex<Option<Receiver<InputEvent>>>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        let (input_tx, input_rx) = channel();
        Self {
            frame: Arc::new(Mutex::new(DisplayFrame::default())),
            egui_ctx: Arc::new(Mutex::new(None)),
            input_tx,
            input_rx: Arc::new(Mutex::new(Some(input_rx))),
        }
    }

    pub fn window(&self) -> MirrorWindow {
        MirrorWindow {
            frame: self.frame.clone(),
            egui_ctx: self.egui_ctx.clone(),
            input_tx: self.input_tx.clone(),
            collecting: None,
            preview_texture: None,
        }
    }
}

impl Default for DeviceDisplayGui {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn show(&mut self, frame: &DisplayFrame) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.frame.lock().map_err(|e| e.to_string())? = frame.clone();
        if let Some(ctx) = self.egui_ctx.lock().map_err(|e| e.to_string())?.as_ref() {
            ctx.request_repaint();
        }
        Ok(())
    }
}

impl DeviceInput for DeviceDisplayGui {
    fn events(&self) -> Receiver<InputEvent> {
        let taken = self.input_rx.lock().ok().and_then(|mut rx| rx.take());
        match taken {
            Some(rx) => rx,
            // only one subscriber gets the button events
            None => channel().1,
        }
    }
}

pub struct MirrorWindow {
    frame: Arc<Mutex<DisplayFrame>>,
    egui_ctx: Arc<Mutex<Option<egui::Context>>>,
    input_tx: Sender<InputEvent>,
    collecting: Option<MoodLabel>,
    /// Uploaded camera frame and the pixels it was made from.
    preview_texture: Option<(egui::TextureHandle, Arc<Vec<u8>>)>,
}

impl MirrorWindow {
    pub fn native_options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([520.0, 460.0])
                .with_resizable(false),
            ..Default::default()
        }
    }

    fn send(&self, event: InputEvent) {
        let _ = self.input_tx.send(event);
    }

    fn sync_preview_texture(&mut self, ctx: &egui::Context, preview: Option<&FramePreview>) {
        let Some(preview) = preview else {
            self.preview_texture = None;
            return;
        };
        if let Some((_, shown)) = &self.preview_texture {
            if Arc::ptr_eq(shown, &preview.rgb) {
                return;
            }
        }
        let image = egui::ColorImage::from_rgb(
            [preview.width as usize, preview.height as usize],
            &preview.rgb,
        );
        match &mut self.preview_texture {
            Some((handle, shown)) => {
                handle.set(image, egui::TextureOptions::LINEAR);
                *shown = preview.rgb.clone();
            }
            None => {
                let handle = ctx.load_texture("camera-preview", image, egui::TextureOptions::LINEAR);
                self.preview_texture = Some((handle, preview.rgb.clone()));
            }
        }
    }

    fn draw_overlay(ui: &mut egui::Ui, frame: &DisplayFrame, texture: Option<&egui::TextureHandle>) {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 240.0),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, egui::Color32::from_gray(24));

        let video_rect = match (texture, &frame.preview) {
            (Some(texture), Some(preview)) => {
                let video_rect = fit_rect(rect, preview.width as f32, preview.height as f32);
                painter.image(
                    texture.id(),
                    video_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
                video_rect
            }
            _ => rect,
        };
        painter.rect_stroke(rect, 4.0, egui::Stroke::new(3.0, accent_color(frame.accent)));

        if let Some(text) = &frame.overlay {
            let box_rect = egui::Rect::from_min_size(
                egui::pos2(video_rect.left(), video_rect.bottom() - 40.0),
                egui::vec2(video_rect.width().min(360.0), 36.0),
            );
            painter.rect_filled(box_rect, 0.0, egui::Color32::from_black_alpha(128));
            painter.text(
                box_rect.left_center() + egui::vec2(8.0, 0.0),
                egui::Align2::LEFT_CENTER,
                text,
                egui::FontId::proportional(16.0),
                egui::Color32::WHITE,
            );
        }
    }
}

impl eframe::App for MirrorWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut slot) = self.egui_ctx.lock() {
            if slot.is_none() {
                *slot = Some(ctx.clone());
            }
        }
        let frame = match self.frame.lock() {
            Ok(frame) => frame.clone(),
            Err(_) => return,
        };
        self.sync_preview_texture(ctx, frame.preview.as_ref());

        ctx.set_visuals(match frame.theme {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        });

        // a release anywhere ends collection, like lifting the mouse off the button
        if self.collecting.is_some() && ctx.input(|i| i.pointer.any_released()) {
            self.collecting = None;
            self.send(InputEvent::CollectStop);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(
                egui::RichText::new(&frame.mood_line)
                    .size(26.0)
                    .strong()
                    .color(accent_color(frame.accent)),
            );
            ui.label(egui::RichText::new(&frame.stress_line).size(18.0));
            ui.add_space(8.0);

            let texture = self.preview_texture.as_ref().map(|(handle, _)| handle);
            Self::draw_overlay(ui, &frame, texture);
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                for label in MOOD_LABELS {
                    let button = egui::Button::new(format!("Hold: {}", label.display_name()))
                        .sense(egui::Sense::click_and_drag());
                    let response = ui.add(button);
                    if response.is_pointer_button_down_on() && self.collecting != Some(label) {
                        self.collecting = Some(label);
                        self.send(InputEvent::CollectStart(label));
                    }
                }
            });

            ui.horizontal(|ui| {
                if ui.button("Train").clicked() {
                    self.send(InputEvent::Train);
                }
                if ui.button("Save model").clicked() {
                    self.send(InputEvent::Save);
                }
                let (pause_text, pause_event) = if frame.paused {
                    ("Resume", InputEvent::Resume)
                } else {
                    ("Pause", InputEvent::Pause)
                };
                if ui.button(pause_text).clicked() {
                    self.send(pause_event);
                }
                let theme_text = match frame.theme {
                    Theme::Light => "Dark theme",
                    Theme::Dark => "Light theme",
                };
                if ui.button(theme_text).clicked() {
                    self.send(InputEvent::ToggleTheme);
                }
            });

            ui.add_space(4.0);
            ui.label(egui::RichText::new(&frame.status).small().weak());
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Largest rect with the frame's aspect ratio, centred in `area`.
fn fit_rect(area: egui::Rect, width: f32, height: f32) -> egui::Rect {
    if width <= 0.0 || height <= 0.0 {
        return area;
    }
    let scale = (area.width() / width).min(area.height() / height);
    egui::Rect::from_center_size(area.center(), egui::vec2(width * scale, height * scale))
}

fn accent_color(accent: Accent) -> egui::Color32 {
    match accent {
        Accent::Neutral => egui::Color32::from_rgb(140, 140, 140),
        Accent::Happy => egui::Color32::from_rgb(46, 160, 67),
        Accent::Sad => egui::Color32::from_rgb(56, 110, 200),
        Accent::Stressed => egui::Color32::from_rgb(210, 60, 50),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_updates_shared_frame() {
        let mut gui = DeviceDisplayGui::new();
        let window = gui.window();
        let frame = DisplayFrame {
            mood_line: "Mood: Sad (70%)".to_string(),
            ..DisplayFrame::default()
        };

        gui.show(&frame).unwrap();
        assert_eq!(*window.frame.lock().unwrap(), frame);
    }

    #[test]
    fn test_show_carries_camera_preview() {
        let mut gui = DeviceDisplayGui::new();
        let window = gui.window();
        let preview = FramePreview {
            width: 2,
            height: 1,
            rgb: Arc::new(vec![255, 0, 0, 0, 255, 0]),
        };
        let frame = DisplayFrame {
            preview: Some(preview.clone()),
            overlay: Some("Collected 3 (happy)".to_string()),
            ..DisplayFrame::default()
        };

        gui.show(&frame).unwrap();
        let shown = window.frame.lock().unwrap().preview.clone().unwrap();
        assert!(Arc::ptr_eq(&shown.rgb, &preview.rgb));
    }

    #[test]
    fn test_fit_rect_keeps_aspect_ratio() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(480.0, 240.0));

        let fitted = fit_rect(area, 320.0, 240.0);

        assert_eq!(fitted.height(), 240.0);
        assert_eq!(fitted.width(), 320.0);
        assert_eq!(fitted.center(), area.center());
        assert_eq!(fit_rect(area, 0.0, 10.0), area);
    }

    #[test]
    fn test_button_events_reach_first_subscriber_only() {
        let gui = DeviceDisplayGui::new();
        let window = gui.window();
        let events = gui.events();
        let late = gui.events();

        window.send(InputEvent::CollectStart(MoodLabel::Happy));
        window.send(InputEvent::CollectStop);

        assert_eq!(
            events.recv().unwrap(),
            InputEvent::CollectStart(MoodLabel::Happy)
        );
        assert_eq!(events.recv().unwrap(), InputEvent::CollectStop);
        assert!(late.try_recv().is_err());
    }
}
