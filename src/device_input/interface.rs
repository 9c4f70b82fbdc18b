use crate::mood_classifier::MoodLabel;

/// User commands: the buttons of the mirror plus the global pointer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Held down on a collect button.
    CollectStart(MoodLabel),
    /// Pointer released anywhere.
    CollectStop,
    Train,
    Save,
    Pause,
    Resume,
    ToggleTheme,
    Quit,
}

pub trait DeviceInput {
    fn events(&self) -> std::sync::mpsc::Receiver<InputEvent>;
}
