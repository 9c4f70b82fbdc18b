use rand::rngs::StdRng;
use rand::{seq::SliceRandom, Rng, SeedableRng};

use super::error::ClassifierError;
use super::label::MOOD_LABELS;
use super::model::{
    argmax_first, relu_inplace, softmax, ClassifierModel, DenseLayer, MODEL_VERSION,
};
use super::sample::Sample;

#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub hidden1_size: usize,
    pub hidden2_size: usize,
    pub dropout1: f32,
    pub dropout2: f32,
    pub l2_penalty: f32,
    pub learning_rate: f32,
    pub epochs: usize,
    pub batch_size: usize,
    pub validation_split: f32,
    pub patience: usize,
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            hidden1_size: 512,
            hidden2_size: 256,
            dropout1: 0.4,
            dropout2: 0.3,
            l2_penalty: 0.01,
            learning_rate: 1e-4,
            epochs: 50,
            batch_size: 32,
            validation_split: 0.2,
            patience: 10,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model: ClassifierModel,
    pub samples_used: usize,
    pub epochs_run: usize,
    pub final_train_loss: f32,
    pub best_val_loss: Option<f32>,
    pub val_accuracy: Option<f32>,
}

const ADAM_BETA1: f32 = 0.9;
const ADAM_BETA2: f32 = 0.999;
const ADAM_EPSILON: f32 = 1e-7;

/// First and second moment estimates for one layer.
struct AdamState {
    m_w: Vec<f32>,
    v_w: Vec<f32>,
    m_b: Vec<f32>,
    v_b: Vec<f32>,
}

impl AdamState {
    fn for_layer(layer: &DenseLayer) -> Self {
        Self {
            m_w: vec![0.0; layer.weights.len()],
            v_w: vec![0.0; layer.weights.len()],
            m_b: vec![0.0; layer.bias.len()],
            v_b: vec![0.0; layer.bias.len()],
        }
    }

    fn apply(&mut self, layer: &mut DenseLayer, grad: &DenseLayer, lr: f32, step: i32) {
        let bias_c1 = 1.0 - ADAM_BETA1.powi(step);
        let bias_c2 = 1.0 - ADAM_BETA2.powi(step);
        adam_update(
            &mut layer.weights,
            &grad.weights,
            &mut self.m_w,
            &mut self.v_w,
            lr,
            bias_c1,
            bias_c2,
        );
        adam_update(
            &mut layer.bias,
            &grad.bias,
            &mut self.m_b,
            &mut self.v_b,
            lr,
            bias_c1,
            bias_c2,
        );
    }
}

fn adam_update(
    params: &mut [f32],
    grads: &[f32],
    m: &mut [f32],
    v: &mut [f32],
    lr: f32,
    bias_c1: f32,
    bias_c2: f32,
) {
    for i in 0..params.len() {
        let g = grads[i];
        m[i] = ADAM_BETA1 * m[i] + (1.0 - ADAM_BETA1) * g;
        v[i] = ADAM_BETA2 * v[i] + (1.0 - ADAM_BETA2) * g * g;
        let m_hat = m[i] / bias_c1;
        let v_hat = v[i] / bias_c2;
        params[i] -= lr * m_hat / (v_hat.sqrt() + ADAM_EPSILON);
    }
}

struct Network {
    hidden1: DenseLayer,
    hidden2: DenseLayer,
    output: DenseLayer,
}

/// Intermediate values of one training forward pass.
struct Trace {
    z1: Vec<f32>,
    a1: Vec<f32>,
    mask1: Vec<f32>,
    z2: Vec<f32>,
    a2: Vec<f32>,
    mask2: Vec<f32>,
    probs: Vec<f32>,
}

impl Network {
    fn init(input: usize, options: &TrainOptions, rng: &mut StdRng) -> Self {
        let hidden1 = options.hidden1_size.max(1);
        let hidden2 = options.hidden2_size.max(1);
        Self {
            hidden1: glorot_layer(input, hidden1, rng),
            hidden2: glorot_layer(hidden1, hidden2, rng),
            output: glorot_layer(hidden2, MOOD_LABELS.len(), rng),
        }
    }

    fn zeros_like(&self) -> Self {
        Self {
            hidden1: DenseLayer::zeros(self.hidden1.input_size, self.hidden1.output_size),
            hidden2: DenseLayer::zeros(self.hidden2.input_size, self.hidden2.output_size),
            output: DenseLayer::zeros(self.output.input_size, self.output.output_size),
        }
    }

    fn forward_train(
        &self,
        x: &[f32],
        dropout1: f32,
        dropout2: f32,
        rng: &mut Option<&mut StdRng>,
    ) -> Trace {
        let mut z1 = vec![0.0f32; self.hidden1.output_size];
        self.hidden1.forward_into(x, &mut z1);
        let mut a1 = z1.clone();
        relu_inplace(&mut a1);
        let mask1 = dropout_mask(a1.len(), dropout1, rng);
        for (a, m) in a1.iter_mut().zip(&mask1) {
            *a *= m;
        }

        let mut z2 = vec![0.0f32; self.hidden2.output_size];
        self.hidden2.forward_into(&a1, &mut z2);
        let mut a2 = z2.clone();
        relu_inplace(&mut a2);
        let mask2 = dropout_mask(a2.len(), dropout2, rng);
        for (a, m) in a2.iter_mut().zip(&mask2) {
            *a *= m;
        }

        let mut logits = vec![0.0f32; self.output.output_size];
        self.output.forward_into(&a2, &mut logits);
        let probs = softmax(&logits);

        Trace {
            z1,
            a1,
            mask1,
            z2,
            a2,
            mask2,
            probs,
        }
    }

    /// Adds the cross-entropy gradient of one sample, scaled by `scale`, into `grad`.
    fn backward(&self, x: &[f32], target: usize, trace: &Trace, scale: f32, grad: &mut Network) {
        let classes = self.output.output_size;
        let h2 = self.hidden2.output_size;
        let h1 = self.hidden1.output_size;
        let input = self.hidden1.input_size;

        let mut d_a2 = vec![0.0f32; h2];
        for c in 0..classes {
            let y = if c == target { 1.0 } else { 0.0 };
            let dz = (trace.probs[c] - y) * scale;
            grad.output.bias[c] += dz;
            let base = c * h2;
            for h in 0..h2 {
                grad.output.weights[base + h] += dz * trace.a2[h];
                d_a2[h] += dz * self.output.weights[base + h];
            }
        }

        let mut d_a1 = vec![0.0f32; h1];
        for h in 0..h2 {
            if trace.z2[h] <= 0.0 || trace.mask2[h] == 0.0 {
                continue;
            }
            let dz = d_a2[h] * trace.mask2[h];
            grad.hidden2.bias[h] += dz;
            let base = h * h1;
            for i in 0..h1 {
                grad.hidden2.weights[base + i] += dz * trace.a1[i];
                d_a1[i] += dz * self.hidden2.weights[base + i];
            }
        }

        for h in 0..h1 {
            if trace.z1[h] <= 0.0 || trace.mask1[h] == 0.0 {
                continue;
            }
            let dz = d_a1[h] * trace.mask1[h];
            grad.hidden1.bias[h] += dz;
            let base = h * input;
            for i in 0..input {
                grad.hidden1.weights[base + i] += dz * x[i];
            }
        }
    }

    fn l2_penalty(&self, l2: f32) -> f32 {
        if l2 == 0.0 {
            return 0.0;
        }
        let sum: f32 = self
            .hidden1
            .weights
            .iter()
            .chain(&self.hidden2.weights)
            .map(|w| w * w)
            .sum();
        l2 * sum
    }

    fn into_model(self, input_size: usize) -> ClassifierModel {
        ClassifierModel {
            model_version: MODEL_VERSION,
            input_size,
            classes: MOOD_LABELS.iter().map(|l| l.as_str().to_string()).collect(),
            hidden1: self.hidden1,
            hidden2: self.hidden2,
            output: self.output,
        }
    }
}

fn glorot_layer(input: usize, output: usize, rng: &mut StdRng) -> DenseLayer {
    let mut layer = DenseLayer::zeros(input, output);
    let limit = (6.0 / (input + output) as f32).sqrt();
    for w in &mut layer.weights {
        *w = (rng.random::<f32>() * 2.0 - 1.0) * limit;
    }
    layer
}

/// Inverted dropout: kept units are scaled by `1 / (1 - rate)`.
fn dropout_mask(len: usize, rate: f32, rng: &mut Option<&mut StdRng>) -> Vec<f32> {
    match rng {
        Some(rng) if rate > 0.0 => {
            let keep_scale = 1.0 / (1.0 - rate);
            (0..len)
                .map(|_| {
                    if rng.random::<f32>() < rate {
                        0.0
                    } else {
                        keep_scale
                    }
                })
                .collect()
        }
        _ => vec![1.0; len],
    }
}

fn cross_entropy(probs: &[f32], target: usize) -> f32 {
    -probs[target].max(1e-7).ln()
}

/// Returns (loss, accuracy) on `indices` without dropout.
fn evaluate(net: &Network, samples: &[Sample], indices: &[usize], l2: f32) -> (f32, f32) {
    let mut none = None;
    let mut loss = 0.0f32;
    let mut correct = 0usize;
    for &idx in indices {
        let sample = &samples[idx];
        let trace = net.forward_train(&sample.embedding, 0.0, 0.0, &mut none);
        let target = sample.label.index();
        loss += cross_entropy(&trace.probs, target);
        if argmax_first(&trace.probs) == Some(target) {
            correct += 1;
        }
    }
    let n = indices.len().max(1) as f32;
    (loss / n + net.l2_penalty(l2), correct as f32 / n)
}

/// Fits a fresh classifier on `samples`.
///
/// Samples are shuffled once, the trailing `validation_split` share is held
/// out, and training stops early once validation loss has not improved for
/// `patience` epochs.
pub fn train_classifier(
    samples: &[Sample],
    input_size: usize,
    options: &TrainOptions,
) -> Result<TrainReport, ClassifierError> {
    if samples.is_empty() {
        return Err(ClassifierError::EmptySampleSet);
    }
    if let Some(bad) = samples.iter().find(|s| s.embedding.len() != input_size) {
        return Err(ClassifierError::InputWidthMismatch {
            expected: input_size,
            actual: bad.embedding.len(),
        });
    }

    let n = samples.len();
    let dropout1 = options.dropout1.clamp(0.0, 0.9);
    let dropout2 = options.dropout2.clamp(0.0, 0.9);
    let batch_size = options.batch_size.max(1);
    let split = options.validation_split.clamp(0.0, 0.9);
    let l2 = options.l2_penalty.max(0.0);

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);

    let mut train_count = ((n as f32) * (1.0 - split)).floor() as usize;
    if train_count == 0 {
        train_count = n;
    }
    let (train_idx, val_idx) = order.split_at(train_count);
    let mut train_idx = train_idx.to_vec();
    let val_idx = val_idx.to_vec();

    let mut net = Network::init(input_size, options, &mut rng);
    let mut adam_h1 = AdamState::for_layer(&net.hidden1);
    let mut adam_h2 = AdamState::for_layer(&net.hidden2);
    let mut adam_out = AdamState::for_layer(&net.output);
    let mut step = 0i32;

    let mut best_val_loss: Option<f32> = None;
    let mut val_accuracy: Option<f32> = None;
    let mut wait = 0usize;
    let mut epochs_run = 0usize;
    let mut final_train_loss = 0.0f32;

    for _epoch in 0..options.epochs {
        train_idx.shuffle(&mut rng);
        let mut epoch_loss = 0.0f32;

        for batch in train_idx.chunks(batch_size) {
            let mut grad = net.zeros_like();
            let scale = 1.0 / batch.len() as f32;

            for &idx in batch {
                let sample = &samples[idx];
                let target = sample.label.index();
                let mut drop_rng = Some(&mut rng);
                let trace =
                    net.forward_train(&sample.embedding, dropout1, dropout2, &mut drop_rng);
                epoch_loss += cross_entropy(&trace.probs, target);
                net.backward(&sample.embedding, target, &trace, scale, &mut grad);
            }

            if l2 > 0.0 {
                for (g, w) in grad.hidden1.weights.iter_mut().zip(&net.hidden1.weights) {
                    *g += 2.0 * l2 * w;
                }
                for (g, w) in grad.hidden2.weights.iter_mut().zip(&net.hidden2.weights) {
                    *g += 2.0 * l2 * w;
                }
            }

            step += 1;
            adam_h1.apply(&mut net.hidden1, &grad.hidden1, options.learning_rate, step);
            adam_h2.apply(&mut net.hidden2, &grad.hidden2, options.learning_rate, step);
            adam_out.apply(&mut net.output, &grad.output, options.learning_rate, step);
        }

        epochs_run += 1;
        final_train_loss = epoch_loss / train_idx.len().max(1) as f32 + net.l2_penalty(l2);

        if val_idx.is_empty() {
            continue;
        }
        let (val_loss, accuracy) = evaluate(&net, samples, &val_idx, l2);
        val_accuracy = Some(accuracy);
        match best_val_loss {
            Some(best) if val_loss >= best => {
                wait += 1;
                if wait >= options.patience {
                    break;
                }
            }
            _ => {
                best_val_loss = Some(val_loss);
                wait = 0;
            }
        }
    }

    let model = net.into_model(input_size);
    model.validate()?;

    Ok(TrainReport {
        model,
        samples_used: n,
        epochs_run,
        final_train_loss,
        best_val_loss,
        val_accuracy,
    })
}
