use serde::{Deserialize, Serialize};

/// Label order matches the classifier's output units.
pub const MOOD_LABELS: [MoodLabel; 3] = [MoodLabel::Happy, MoodLabel::Sad, MoodLabel::Stressed];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLabel {
    Happy,
    Sad,
    Stressed,
}

impl MoodLabel {
    pub fn from_index(idx: usize) -> Option<Self> {
        MOOD_LABELS.get(idx).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            MoodLabel::Happy => 0,
            MoodLabel::Sad => 1,
            MoodLabel::Stressed => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Happy => "happy",
            MoodLabel::Sad => "sad",
            MoodLabel::Stressed => "stressed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MoodLabel::Happy => "Happy",
            MoodLabel::Sad => "Sad",
            MoodLabel::Stressed => "Stressed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        MOOD_LABELS
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(value.trim()))
    }
}
