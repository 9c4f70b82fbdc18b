use super::fixture::{running_state, stressed_model, test_config, EMBEDDING_SIZE};
use crate::config::Config;
use crate::device_camera::interface::DeviceCameraEvent;
use crate::device_input::interface::InputEvent;
use crate::mood_classifier::model::tests::constant_model;
use crate::mood_classifier::{ClassifierError, MoodLabel, TrainReport};
use crate::device_camera::interface::FramePreview;
use crate::mood_detector::core::{
    init, transition, CameraState, Capture, CapturePurpose, Effect, Msg, Phase, State,
    NO_MODEL_MESSAGE, TRAINED_MESSAGE,
};
use crate::theme_store::interface::Theme;
use std::path::PathBuf;
use std::sync::Arc;

fn config() -> Config {
    let dir = tempfile::tempdir().unwrap();
    test_config(&dir)
}

fn tick(config: &Config, state: State) -> (State, Vec<Effect>) {
    transition(config, state, Msg::Tick)
}

fn preview(value: u8) -> FramePreview {
    FramePreview {
        width: 2,
        height: 2,
        rgb: Arc::new(vec![value; 2 * 2 * 3]),
    }
}

fn capture_done_in(session: u64, purpose: CapturePurpose, embedding: Option<Vec<f32>>) -> Msg {
    Msg::CaptureDone {
        purpose,
        session,
        result: Ok(Capture {
            preview: preview(128),
            embedding,
        }),
    }
}

fn embedding_done(purpose: CapturePurpose, embedding: Vec<f32>) -> Msg {
    capture_done_in(0, purpose, Some(embedding))
}

fn capture(purpose: CapturePurpose, session: u64) -> Vec<Effect> {
    vec![Effect::CaptureFrame { purpose, session }]
}

#[test]
fn test_init() {
    let config = config();
    let (state, effects) = init(&config);

    assert!(matches!(
        state.phase,
        Phase::Initializing {
            camera: CameraState::Disconnected,
            classifier_checked: false
        }
    ));
    assert_eq!(
        effects,
        vec![
            Effect::SubscribeCamera,
            Effect::SubscribeInput,
            Effect::SubscribeTick,
            Effect::LoadClassifier,
            Effect::LoadTheme,
        ]
    );
}

#[test]
fn test_startup_waits_for_camera_and_classifier() {
    let config = config();
    let (state, _) = init(&config);

    let (state, effects) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Connected),
    );
    assert_eq!(effects, vec![Effect::StartCamera]);

    // a second connect while starting does not start twice
    let (state, effects) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Connected),
    );
    assert!(effects.is_empty());

    let (state, effects) = transition(&config, state, Msg::CameraStartDone(Ok(())));
    assert!(effects.is_empty());
    assert!(!state.is_running());

    let (state, effects) = transition(
        &config,
        state,
        Msg::ClassifierLoadDone(Ok(stressed_model())),
    );
    assert!(effects.is_empty());
    assert!(state.is_running());
    assert!(state.classifier.is_some());
    assert_eq!(state.message, None);
}

#[test]
fn test_missing_model_keeps_collection_available() {
    let config = config();
    let (state, _) = init(&config);

    let (state, _) = transition(
        &config,
        state,
        Msg::ClassifierLoadDone(Err(ClassifierError::InvalidModel("missing".to_string()))),
    );
    let (state, _) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Connected),
    );
    let (state, _) = transition(&config, state, Msg::CameraStartDone(Ok(())));

    assert!(state.is_running());
    assert_eq!(state.message.as_deref(), Some(NO_MODEL_MESSAGE));

    // nothing to predict with, so the tick only refreshes the feed
    let (state, effects) = tick(&config, state);
    assert_eq!(effects, capture(CapturePurpose::Preview, 1));
    let (state, _) = transition(
        &config,
        state,
        capture_done_in(1, CapturePurpose::Preview, None),
    );
    assert_eq!(state.preview, Some(preview(128)));
    assert!(state.samples.is_empty());
    assert_eq!(state.message.as_deref(), Some(NO_MODEL_MESSAGE));

    let (state, _) = transition(
        &config,
        state,
        Msg::Input(InputEvent::CollectStart(MoodLabel::Sad)),
    );
    let (_, effects) = tick(&config, state);
    assert_eq!(effects, capture(CapturePurpose::Collect(MoodLabel::Sad), 1));
}

#[test]
fn test_camera_start_failure_halts() {
    let config = config();
    let state = running_state(&config, Some(stressed_model()));

    let (state, effects) = transition(
        &config,
        state,
        Msg::CameraStartDone(Err("no device".into())),
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.phase,
        Phase::Halted {
            message: "Error starting camera: no device".to_string()
        }
    );

    let (state, effects) = tick(&config, state);
    assert!(effects.is_empty());

    // a disconnect does not leave the halted phase
    let (state, _) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Disconnected),
    );
    assert!(matches!(state.phase, Phase::Halted { .. }));
}

#[test]
fn test_camera_disconnect_returns_to_initializing() {
    let config = config();
    let mut state = running_state(&config, None);
    state.collecting = Some(MoodLabel::Happy);

    let (state, effects) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Disconnected),
    );
    assert!(effects.is_empty());
    assert_eq!(state.collecting, None);
    assert_eq!(
        state.phase,
        Phase::Initializing {
            camera: CameraState::Disconnected,
            classifier_checked: true
        }
    );

    let (state, effects) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Connected),
    );
    assert_eq!(effects, vec![Effect::StartCamera]);
    let (state, _) = transition(&config, state, Msg::CameraStartDone(Ok(())));
    assert!(state.is_running());
}

#[test]
fn test_collecting_appends_samples() {
    let config = config();
    let state = running_state(&config, None);

    let (state, _) = transition(
        &config,
        state,
        Msg::Input(InputEvent::CollectStart(MoodLabel::Happy)),
    );
    let (state, effects) = tick(&config, state);
    let purpose = CapturePurpose::Collect(MoodLabel::Happy);
    assert_eq!(effects, capture(purpose, 0));
    assert!(state.capture_in_flight);

    // only one capture at a time
    let (state, effects) = tick(&config, state);
    assert!(effects.is_empty());

    let (state, _) = transition(
        &config,
        state,
        embedding_done(purpose, vec![0.5; EMBEDDING_SIZE]),
    );
    assert!(!state.capture_in_flight);
    assert_eq!(state.samples.len(), 1);
    assert_eq!(state.samples[0].label, MoodLabel::Happy);
    assert_eq!(state.message.as_deref(), Some("Collected 1 (happy)"));

    let (state, _) = transition(&config, state, Msg::Input(InputEvent::CollectStop));
    assert_eq!(state.collecting, None);
    let (_, effects) = tick(&config, state);
    assert_eq!(effects, capture(CapturePurpose::Preview, 0));
}

#[test]
fn test_collect_rejects_wrong_width() {
    let config = config();
    let state = running_state(&config, None);

    let (state, _) = transition(
        &config,
        state,
        embedding_done(CapturePurpose::Collect(MoodLabel::Sad), vec![0.5; 3]),
    );
    assert!(state.samples.is_empty());
    assert!(state.message.unwrap().contains("input width 8"));
}

#[test]
fn test_failed_capture_is_dropped() {
    let config = config();
    let mut state = running_state(&config, Some(stressed_model()));
    state.capture_in_flight = true;

    let (state, effects) = transition(
        &config,
        state,
        Msg::CaptureDone {
            purpose: CapturePurpose::Predict,
            session: 0,
            result: Err("Camera not started".into()),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.capture_in_flight);
    assert!(state.window.is_empty());
    assert!(state.reading.is_none());
}

#[test]
fn test_train_with_no_samples_keeps_previous_classifier() {
    let config = config();
    let previous = Arc::new(stressed_model());
    let mut state = running_state(&config, None);
    state.classifier = Some(previous.clone());

    let (state, effects) = transition(&config, state, Msg::Input(InputEvent::Train));

    assert!(effects.is_empty());
    assert!(!state.training);
    assert_eq!(state.message.as_deref(), Some("No samples collected"));
    assert!(Arc::ptr_eq(state.classifier.as_ref().unwrap(), &previous));
}

#[test]
fn test_train_flow_replaces_classifier() {
    let config = config();
    let mut state = running_state(&config, Some(stressed_model()));
    state.samples = vec![crate::mood_classifier::Sample::new(
        vec![0.1; EMBEDDING_SIZE],
        MoodLabel::Sad,
    )];
    state.window.push(vec![0.0, 0.0, 1.0]).unwrap();
    state.reading = state.window.reading();

    let (state, effects) = transition(&config, state, Msg::Input(InputEvent::Train));
    assert_eq!(
        effects,
        vec![Effect::TrainClassifier {
            samples: state.samples.clone()
        }]
    );
    assert!(state.training);

    // a second request while training is ignored
    let (state, effects) = transition(&config, state, Msg::Input(InputEvent::Train));
    assert!(effects.is_empty());

    let trained = constant_model(EMBEDDING_SIZE, [0.0, 3.0, 0.0]);
    let report = TrainReport {
        model: trained.clone(),
        samples_used: 1,
        epochs_run: 1,
        final_train_loss: 0.5,
        best_val_loss: None,
        val_accuracy: None,
    };
    let (state, effects) = transition(&config, state, Msg::TrainDone(Ok(report)));

    assert!(effects.is_empty());
    assert!(!state.training);
    assert_eq!(state.classifier.as_deref(), Some(&trained));
    assert!(state.window.is_empty());
    assert!(state.reading.is_none());
    assert_eq!(state.samples.len(), 1);
    assert_eq!(state.message.as_deref(), Some(TRAINED_MESSAGE));
}

#[test]
fn test_train_failure_is_reported() {
    let config = config();
    let mut state = running_state(&config, None);
    state.training = true;

    let (state, _) = transition(
        &config,
        state,
        Msg::TrainDone(Err(ClassifierError::EmptySampleSet)),
    );
    assert!(!state.training);
    assert!(state.classifier.is_none());
    assert_eq!(
        state.message.as_deref(),
        Some("Training failed: No samples collected")
    );
}

#[test]
fn test_prediction_is_smoothed_over_window() {
    let config = config();
    let mut state = running_state(&config, Some(stressed_model()));

    for _ in 0..config.smoothing_window + 3 {
        let (next, effects) = tick(&config, state);
        assert_eq!(effects, capture(CapturePurpose::Predict, 0));
        let (next, _) = transition(
            &config,
            next,
            embedding_done(CapturePurpose::Predict, vec![0.2; EMBEDDING_SIZE]),
        );
        state = next;
    }

    assert_eq!(state.window.len(), config.smoothing_window);
    let reading = state.reading.unwrap();
    assert_eq!(reading.label, MoodLabel::Stressed);
    assert!(reading.stress > 0.9);
    assert!((reading.confidence - reading.stress).abs() < 1e-6);
}

#[test]
fn test_prediction_rejects_wrong_width() {
    let config = config();
    let state = running_state(&config, Some(stressed_model()));

    let (state, _) = transition(
        &config,
        state,
        embedding_done(CapturePurpose::Predict, vec![0.2; 5]),
    );
    assert!(state.window.is_empty());
    assert!(state.message.unwrap().starts_with("Prediction failed"));
}

#[test]
fn test_save_requires_classifier() {
    let config = config();
    let state = running_state(&config, None);

    let (state, effects) = transition(&config, state, Msg::Input(InputEvent::Save));
    assert!(effects.is_empty());
    assert_eq!(state.message.as_deref(), Some("Train model first"));

    let model = Arc::new(stressed_model());
    let mut state = state;
    state.classifier = Some(model.clone());
    let (state, effects) = transition(&config, state, Msg::Input(InputEvent::Save));
    assert_eq!(effects, vec![Effect::SaveClassifier { model }]);

    let (state, _) = transition(
        &config,
        state,
        Msg::SaveDone(Ok(PathBuf::from("out/model.json"))),
    );
    assert_eq!(
        state.message.as_deref(),
        Some("Saved model to out/model.json")
    );
}

#[test]
fn test_pause_and_resume() {
    let config = config();
    let state = running_state(&config, Some(stressed_model()));

    let (state, _) = transition(&config, state, Msg::Input(InputEvent::Pause));
    assert!(state.paused);
    let (state, effects) = tick(&config, state);
    assert!(effects.is_empty());

    let (state, _) = transition(&config, state, Msg::Input(InputEvent::Resume));
    assert!(!state.paused);
    let (_, effects) = tick(&config, state);
    assert_eq!(effects.len(), 1);
}

#[test]
fn test_theme_load_and_toggle() {
    let config = config();
    let (state, _) = init(&config);

    let (state, _) = transition(&config, state, Msg::ThemeLoadDone(Ok(Theme::Dark)));
    assert_eq!(state.theme, Theme::Dark);

    let (state, effects) = transition(&config, state, Msg::Input(InputEvent::ToggleTheme));
    assert_eq!(state.theme, Theme::Light);
    assert_eq!(
        effects,
        vec![Effect::SaveTheme {
            theme: Theme::Light
        }]
    );

    // an unreadable theme file leaves the default
    let (state, _) = init(&config);
    let (state, _) = transition(&config, state, Msg::ThemeLoadDone(Err("bad".into())));
    assert_eq!(state.theme, Theme::Light);
}

#[test]
fn test_quit() {
    let config = config();
    let (state, _) = init(&config);
    let (state, effects) = transition(&config, state, Msg::Input(InputEvent::Quit));
    assert!(state.quit);
    assert!(effects.is_empty());
}

#[test]
fn test_capture_across_reconnect_is_not_doubled() {
    let config = config();
    let (state, _) = init(&config);
    let (state, _) = transition(
        &config,
        state,
        Msg::ClassifierLoadDone(Ok(stressed_model())),
    );
    let (state, _) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Connected),
    );
    let (state, _) = transition(&config, state, Msg::CameraStartDone(Ok(())));

    let (state, first) = tick(&config, state);
    assert_eq!(first, capture(CapturePurpose::Predict, 1));

    let (state, _) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Disconnected),
    );
    assert!(state.capture_in_flight);
    assert_eq!(state.preview, None);
    let (state, _) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Connected),
    );
    let (state, _) = transition(&config, state, Msg::CameraStartDone(Ok(())));
    assert!(state.is_running());

    // the capture from before the disconnect is still outstanding
    let (state, second) = tick(&config, state);
    assert!(second.is_empty());

    // and its result belongs to the old camera session
    let (state, _) = transition(
        &config,
        state,
        capture_done_in(1, CapturePurpose::Predict, Some(vec![0.2; EMBEDDING_SIZE])),
    );
    assert!(!state.capture_in_flight);
    assert!(state.window.is_empty());
    assert!(state.reading.is_none());
    assert_eq!(state.preview, None);

    let (_, third) = tick(&config, state);
    assert_eq!(third, capture(CapturePurpose::Predict, 2));
}

#[test]
fn test_capture_done_while_disconnected_is_dropped() {
    let config = config();
    let mut state = running_state(&config, None);
    state.collecting = Some(MoodLabel::Happy);
    let (state, _) = tick(&config, state);

    let (state, _) = transition(
        &config,
        state,
        Msg::CameraEvent(DeviceCameraEvent::Disconnected),
    );
    let (state, _) = transition(
        &config,
        state,
        embedding_done(CapturePurpose::Collect(MoodLabel::Happy), vec![0.5; EMBEDDING_SIZE]),
    );

    assert!(!state.capture_in_flight);
    assert!(state.samples.is_empty());
}
