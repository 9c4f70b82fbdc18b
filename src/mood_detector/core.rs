use crate::config::Config;
use crate::device_camera::interface::{DeviceCameraEvent, FramePreview};
use crate::device_input::interface::InputEvent;
use crate::feature_extractor::interface::Embedding;
use crate::mood_classifier::{
    ClassifierError, ClassifierModel, MoodLabel, MoodReading, PredictionWindow, Sample,
    TrainReport,
};
use crate::theme_store::interface::Theme;
use std::path::PathBuf;
use std::sync::Arc;

pub const NO_MODEL_MESSAGE: &str = "No saved model found! Please train and save a model first.";
pub const TRAINED_MESSAGE: &str =
    "Training finished. Start moving/expressing in front of camera to see live prediction.";

#[derive(Debug, Default, Clone, PartialEq)]
pub enum CameraState {
    #[default]
    Disconnected,
    Connected,
    Started,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Initializing {
        camera: CameraState,
        classifier_checked: bool,
    },
    Running,
    /// Terminal: the camera could not be started.
    Halted {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct State {
    pub phase: Phase,
    pub theme: Theme,
    pub paused: bool,
    pub collecting: Option<MoodLabel>,
    pub samples: Vec<Sample>,
    pub classifier: Option<Arc<ClassifierModel>>,
    pub window: PredictionWindow,
    pub reading: Option<MoodReading>,
    pub preview: Option<FramePreview>,
    /// Bumped every time the camera starts; captures from an older session are dropped.
    pub camera_session: u64,
    pub capture_in_flight: bool,
    pub training: bool,
    pub message: Option<String>,
    pub quit: bool,
}

impl State {
    pub fn new(config: &Config) -> Self {
        Self {
            phase: Phase::Initializing {
                camera: CameraState::Disconnected,
                classifier_checked: false,
            },
            theme: Theme::default(),
            paused: false,
            collecting: None,
            samples: Vec::new(),
            classifier: None,
            window: PredictionWindow::new(config.smoothing_window),
            reading: None,
            preview: None,
            camera_session: 0,
            capture_in_flight: false,
            training: false,
            message: None,
            quit: false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePurpose {
    Collect(MoodLabel),
    Predict,
    /// Only refresh the live feed.
    Preview,
}

#[derive(Debug, Clone)]
pub struct Capture {
    pub preview: FramePreview,
    /// `None` for `CapturePurpose::Preview`.
    pub embedding: Option<Embedding>,
}

#[derive(Debug)]
pub enum Msg {
    Tick,
    CameraEvent(DeviceCameraEvent),
    CameraStartDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    ClassifierLoadDone(Result<ClassifierModel, ClassifierError>),
    ThemeLoadDone(Result<Theme, Box<dyn std::error::Error + Send + Sync>>),
    ThemeSaveDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    Input(InputEvent),
    CaptureDone {
        purpose: CapturePurpose,
        session: u64,
        result: Result<Capture, Box<dyn std::error::Error + Send + Sync>>,
    },
    TrainDone(Result<TrainReport, ClassifierError>),
    SaveDone(Result<PathBuf, ClassifierError>),
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::CaptureDone {
                purpose,
                session,
                result: Ok(capture),
            } => format!(
                "CaptureDone({:?}, session {}, Ok(<{}x{} frame, {} floats>))",
                purpose,
                session,
                capture.preview.width,
                capture.preview.height,
                capture.embedding.as_ref().map_or(0, Vec::len)
            ),
            Msg::ClassifierLoadDone(Ok(model)) => {
                format!("ClassifierLoadDone(Ok(<input {}>))", model.input_size)
            }
            Msg::TrainDone(Ok(report)) => format!(
                "TrainDone(Ok(<{} samples, {} epochs>))",
                report.samples_used, report.epochs_run
            ),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SubscribeCamera,
    SubscribeInput,
    SubscribeTick,
    StartCamera,
    LoadClassifier,
    LoadTheme,
    SaveTheme { theme: Theme },
    CaptureFrame { purpose: CapturePurpose, session: u64 },
    TrainClassifier { samples: Vec<Sample> },
    SaveClassifier { model: Arc<ClassifierModel> },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::TrainClassifier { samples } => {
                format!("TrainClassifier {{ samples: <{}> }}", samples.len())
            }
            Effect::SaveClassifier { .. } => "SaveClassifier".to_string(),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init(config: &Config) -> (State, Vec<Effect>) {
    (
        State::new(config),
        vec![
            Effect::SubscribeCamera,
            Effect::SubscribeInput,
            Effect::SubscribeTick,
            Effect::LoadClassifier,
            Effect::LoadTheme,
        ],
    )
}

fn start_running_if_ready(state: &mut State) {
    if let Phase::Initializing {
        camera: CameraState::Started,
        classifier_checked: true,
    } = state.phase
    {
        state.phase = Phase::Running;
    }
}

pub fn transition(config: &Config, mut state: State, msg: Msg) -> (State, Vec<Effect>) {
    match msg {
        // Startup
        Msg::CameraEvent(DeviceCameraEvent::Connected) => {
            let waiting = matches!(
                state.phase,
                Phase::Initializing {
                    camera: CameraState::Disconnected,
                    ..
                }
            );
            if !waiting {
                return (state, vec![]);
            }
            if let Phase::Initializing { camera, .. } = &mut state.phase {
                *camera = CameraState::Connected;
            }
            (state, vec![Effect::StartCamera])
        }
        Msg::CameraStartDone(Ok(())) => {
            if let Phase::Initializing { camera, .. } = &mut state.phase {
                *camera = CameraState::Started;
                state.camera_session += 1;
            }
            start_running_if_ready(&mut state);
            (state, vec![])
        }
        Msg::CameraStartDone(Err(e)) => {
            state.collecting = None;
            state.phase = Phase::Halted {
                message: format!("Error starting camera: {}", e),
            };
            (state, vec![])
        }
        Msg::CameraEvent(DeviceCameraEvent::Disconnected) => {
            if matches!(state.phase, Phase::Halted { .. }) {
                return (state, vec![]);
            }
            state.collecting = None;
            state.preview = None;
            state.phase = Phase::Initializing {
                camera: CameraState::Disconnected,
                classifier_checked: true,
            };
            state.message = Some("Camera disconnected".to_string());
            (state, vec![])
        }
        Msg::ClassifierLoadDone(result) => {
            match result {
                // a classifier trained meanwhile wins over the saved one
                Ok(model) if state.classifier.is_none() => {
                    state.classifier = Some(Arc::new(model));
                }
                Ok(_) => {}
                Err(_) if state.classifier.is_none() => {
                    state.message = Some(NO_MODEL_MESSAGE.to_string());
                }
                Err(_) => {}
            }
            if let Phase::Initializing {
                classifier_checked, ..
            } = &mut state.phase
            {
                *classifier_checked = true;
            }
            start_running_if_ready(&mut state);
            (state, vec![])
        }
        Msg::ThemeLoadDone(Ok(theme)) => {
            state.theme = theme;
            (state, vec![])
        }
        Msg::ThemeLoadDone(Err(_)) => (state, vec![]),
        Msg::ThemeSaveDone(Ok(())) => (state, vec![]),
        Msg::ThemeSaveDone(Err(e)) => {
            state.message = Some(format!("Could not save theme: {}", e));
            (state, vec![])
        }

        // Main loop
        Msg::Tick => {
            if !state.is_running() || state.paused || state.capture_in_flight {
                return (state, vec![]);
            }
            let purpose = match (state.collecting, &state.classifier) {
                (Some(label), _) => CapturePurpose::Collect(label),
                (None, Some(_)) => CapturePurpose::Predict,
                (None, None) => CapturePurpose::Preview,
            };
            state.capture_in_flight = true;
            let session = state.camera_session;
            (state, vec![Effect::CaptureFrame { purpose, session }])
        }
        Msg::CaptureDone {
            purpose,
            session,
            result,
        } => {
            state.capture_in_flight = false;
            if session != state.camera_session || !state.is_running() {
                return (state, vec![]);
            }
            let capture = match result {
                Ok(capture) => capture,
                Err(e) => {
                    state.message = Some(format!("Frame skipped: {}", e));
                    return (state, vec![]);
                }
            };
            state.preview = Some(capture.preview);
            let embedding = match (purpose, capture.embedding) {
                (CapturePurpose::Preview, _) | (_, None) => return (state, vec![]),
                (_, Some(embedding)) => embedding,
            };
            match purpose {
                CapturePurpose::Collect(label) => {
                    if embedding.len() != config.embedding_size {
                        state.message = Some(
                            ClassifierError::InputWidthMismatch {
                                expected: config.embedding_size,
                                actual: embedding.len(),
                            }
                            .to_string(),
                        );
                        return (state, vec![]);
                    }
                    state.samples.push(Sample::new(embedding, label));
                    state.message = Some(format!(
                        "Collected {} ({})",
                        state.samples.len(),
                        label.as_str()
                    ));
                }
                CapturePurpose::Predict => {
                    let Some(classifier) = state.classifier.clone() else {
                        return (state, vec![]);
                    };
                    let pushed = classifier
                        .predict_proba(&embedding)
                        .and_then(|probs| state.window.push(probs));
                    match pushed {
                        Ok(()) => {
                            state.reading = state.window.reading();
                            if state.collecting.is_none() {
                                state.message = None;
                            }
                        }
                        Err(e) => state.message = Some(format!("Prediction failed: {}", e)),
                    }
                }
                CapturePurpose::Preview => {}
            }
            (state, vec![])
        }

        // User commands
        Msg::Input(InputEvent::CollectStart(label)) => {
            if state.is_running() {
                state.collecting = Some(label);
            }
            (state, vec![])
        }
        Msg::Input(InputEvent::CollectStop) => {
            state.collecting = None;
            (state, vec![])
        }
        Msg::Input(InputEvent::Train) => {
            if state.training {
                state.message = Some("Training already running".to_string());
                return (state, vec![]);
            }
            if state.samples.is_empty() {
                state.message = Some(ClassifierError::EmptySampleSet.to_string());
                return (state, vec![]);
            }
            state.training = true;
            state.message = Some(format!("Training on {} samples...", state.samples.len()));
            let samples = state.samples.clone();
            (state, vec![Effect::TrainClassifier { samples }])
        }
        Msg::TrainDone(Ok(report)) => {
            state.training = false;
            state.classifier = Some(Arc::new(report.model));
            state.window.clear();
            state.reading = None;
            state.message = Some(TRAINED_MESSAGE.to_string());
            (state, vec![])
        }
        Msg::TrainDone(Err(e)) => {
            state.training = false;
            state.message = Some(format!("Training failed: {}", e));
            (state, vec![])
        }
        Msg::Input(InputEvent::Save) => match state.classifier.clone() {
            Some(model) => (state, vec![Effect::SaveClassifier { model }]),
            None => {
                state.message = Some("Train model first".to_string());
                (state, vec![])
            }
        },
        Msg::SaveDone(Ok(path)) => {
            state.message = Some(format!("Saved model to {}", path.display()));
            (state, vec![])
        }
        Msg::SaveDone(Err(e)) => {
            state.message = Some(format!("Save failed: {}", e));
            (state, vec![])
        }
        Msg::Input(InputEvent::Pause) => {
            state.paused = true;
            (state, vec![])
        }
        Msg::Input(InputEvent::Resume) => {
            state.paused = false;
            (state, vec![])
        }
        Msg::Input(InputEvent::ToggleTheme) => {
            state.theme = state.theme.toggled();
            let theme = state.theme;
            (state, vec![Effect::SaveTheme { theme }])
        }
        Msg::Input(InputEvent::Quit) => {
            state.quit = true;
            (state, vec![])
        }
    }
}
