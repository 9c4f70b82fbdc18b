use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::label::MOOD_LABELS;

pub const MODEL_VERSION: i64 = 1;

/// Fully connected layer. `weights` is row-major `output_size x input_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub input_size: usize,
    pub output_size: usize,
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    pub fn zeros(input_size: usize, output_size: usize) -> Self {
        Self {
            input_size,
            output_size,
            weights: vec![0.0; input_size * output_size],
            bias: vec![0.0; output_size],
        }
    }

    /// Writes `W * input + b` into `out`.
    pub fn forward_into(&self, input: &[f32], out: &mut [f32]) {
        for (o, slot) in out.iter_mut().enumerate().take(self.output_size) {
            let row = &self.weights[o * self.input_size..(o + 1) * self.input_size];
            let mut sum = self.bias[o];
            for (w, x) in row.iter().zip(input) {
                sum += w * x;
            }
            *slot = sum;
        }
    }

    fn validate(&self, name: &str) -> Result<(), ClassifierError> {
        if self.weights.len() != self.input_size * self.output_size {
            return Err(ClassifierError::InvalidModel(format!(
                "{} weights length {} (expected {})",
                name,
                self.weights.len(),
                self.input_size * self.output_size
            )));
        }
        if self.bias.len() != self.output_size {
            return Err(ClassifierError::InvalidModel(format!(
                "{} bias length {} (expected {})",
                name,
                self.bias.len(),
                self.output_size
            )));
        }
        if self.weights.iter().chain(&self.bias).any(|v| !v.is_finite()) {
            return Err(ClassifierError::InvalidModel(format!(
                "{} contains non-finite values",
                name
            )));
        }
        Ok(())
    }
}

/// Embedding -> relu(hidden1) -> relu(hidden2) -> softmax(output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierModel {
    pub model_version: i64,
    pub input_size: usize,
    pub classes: Vec<String>,
    pub hidden1: DenseLayer,
    pub hidden2: DenseLayer,
    pub output: DenseLayer,
}

impl ClassifierModel {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.model_version != MODEL_VERSION {
            return Err(ClassifierError::InvalidModel(format!(
                "unsupported model_version {} (expected {})",
                self.model_version, MODEL_VERSION
            )));
        }
        if self.classes.len() != MOOD_LABELS.len() {
            return Err(ClassifierError::InvalidModel(format!(
                "{} classes (expected {})",
                self.classes.len(),
                MOOD_LABELS.len()
            )));
        }
        if self.hidden1.input_size != self.input_size {
            return Err(ClassifierError::InvalidModel(
                "hidden1 input does not match input_size".to_string(),
            ));
        }
        if self.hidden2.input_size != self.hidden1.output_size {
            return Err(ClassifierError::InvalidModel(
                "hidden2 input does not match hidden1 output".to_string(),
            ));
        }
        if self.output.input_size != self.hidden2.output_size
            || self.output.output_size != self.classes.len()
        {
            return Err(ClassifierError::InvalidModel(
                "output layer shape mismatch".to_string(),
            ));
        }
        self.hidden1.validate("hidden1")?;
        self.hidden2.validate("hidden2")?;
        self.output.validate("output")?;
        Ok(())
    }

    pub fn ensure_input_size(&self, expected: usize) -> Result<(), ClassifierError> {
        if self.input_size != expected {
            return Err(ClassifierError::InputWidthMismatch {
                expected,
                actual: self.input_size,
            });
        }
        Ok(())
    }

    /// Probability per class, in `MOOD_LABELS` order.
    pub fn predict_proba(&self, embedding: &[f32]) -> Result<Vec<f32>, ClassifierError> {
        if embedding.len() != self.input_size {
            return Err(ClassifierError::InputWidthMismatch {
                expected: self.input_size,
                actual: embedding.len(),
            });
        }

        let mut h1 = vec![0.0f32; self.hidden1.output_size];
        self.hidden1.forward_into(embedding, &mut h1);
        relu_inplace(&mut h1);

        let mut h2 = vec![0.0f32; self.hidden2.output_size];
        self.hidden2.forward_into(&h1, &mut h2);
        relu_inplace(&mut h2);

        let mut logits = vec![0.0f32; self.output.output_size];
        self.output.forward_into(&h2, &mut logits);

        Ok(softmax(&logits))
    }
}

pub(crate) fn relu_inplace(values: &mut [f32]) {
    for v in values.iter_mut() {
        *v = v.max(0.0);
    }
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax_first(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &v) in values.iter().enumerate() {
        match best {
            Some((_, best_val)) if v <= best_val => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}

pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, |a, b| a.max(b));
    let mut exps = Vec::with_capacity(raw.len());
    let mut sum = 0.0f32;
    for &v in raw {
        let e = (v - max).exp();
        exps.push(e);
        sum += e;
    }
    if sum == 0.0 || !sum.is_finite() {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    for v in exps.iter_mut() {
        *v /= sum;
    }
    exps
}
