//! Mood classifier: a small feed-forward network over backbone embeddings,
//! its trainer, JSON storage and the temporal smoother used for display.

pub mod error;
pub mod label;
pub mod model;
pub mod sample;
pub mod smoothing;
pub mod storage;
pub mod train;

pub use error::ClassifierError;
pub use label::{MoodLabel, MOOD_LABELS};
pub use model::ClassifierModel;
pub use sample::Sample;
pub use smoothing::{MoodReading, PredictionWindow};
pub use train::{train_classifier, TrainReport};
