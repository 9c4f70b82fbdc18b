use std::collections::VecDeque;

use super::error::ClassifierError;
use super::label::{MoodLabel, MOOD_LABELS};
use super::model::argmax_first;

/// Smoothed classification shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodReading {
    pub label: MoodLabel,
    pub confidence: f32,
    pub stress: f32,
    pub probabilities: Vec<f32>,
}

/// Bounded FIFO of the most recent probability vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionWindow {
    capacity: usize,
    entries: VecDeque<Vec<f32>>,
}

impl PredictionWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest first.
    #[cfg(test)]
    pub fn entries(&self) -> impl Iterator<Item = &Vec<f32>> {
        self.entries.iter()
    }

    /// Appends one prediction, evicting the oldest when full.
    pub fn push(&mut self, probabilities: Vec<f32>) -> Result<(), ClassifierError> {
        if probabilities.len() != MOOD_LABELS.len() {
            return Err(ClassifierError::ProbabilityWidthMismatch {
                expected: MOOD_LABELS.len(),
                actual: probabilities.len(),
            });
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(probabilities);
        Ok(())
    }

    /// Per-label arithmetic mean over the window.
    pub fn average(&self) -> Option<Vec<f32>> {
        if self.entries.is_empty() {
            return None;
        }
        let mut sums = vec![0.0f32; MOOD_LABELS.len()];
        for entry in &self.entries {
            for (sum, p) in sums.iter_mut().zip(entry) {
                *sum += p;
            }
        }
        let n = self.entries.len() as f32;
        Some(sums.into_iter().map(|s| s / n).collect())
    }

    pub fn reading(&self) -> Option<MoodReading> {
        let averaged = self.average()?;
        let idx = argmax_first(&averaged)?;
        let label = MoodLabel::from_index(idx)?;
        Some(MoodReading {
            label,
            confidence: averaged[idx],
            stress: averaged[MoodLabel::Stressed.index()],
            probabilities: averaged,
        })
    }
}
