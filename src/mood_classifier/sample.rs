use super::label::{MoodLabel, MOOD_LABELS};

/// One embedding tagged with the label that was active when it was captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub embedding: Vec<f32>,
    pub label: MoodLabel,
}

impl Sample {
    pub fn new(embedding: Vec<f32>, label: MoodLabel) -> Self {
        Self { embedding, label }
    }
}

/// Number of samples per label, indexed like `MOOD_LABELS`.
pub fn label_counts(samples: &[Sample]) -> [usize; MOOD_LABELS.len()] {
    let mut counts = [0usize; MOOD_LABELS.len()];
    for sample in samples {
        counts[sample.label.index()] += 1;
    }
    counts
}
