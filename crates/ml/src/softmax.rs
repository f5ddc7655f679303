use tripmind_core::Intent;

use crate::vectorizer::SparseVector;

/// Multinomial logistic regression over sparse TF-IDF vectors.
/// Training is full-batch gradient descent from zero-initialized
/// weights, so the fitted model is a pure function of the corpus.
#[derive(Debug, Clone)]
pub(crate) struct SoftmaxModel {
    classes: Vec<Intent>,
    // row-major: classes x dims
    weights: Vec<f32>,
    bias: Vec<f32>,
    dims: usize,
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub learning_rate: f32,
    pub epochs: usize,
    pub l2_penalty: f32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        // Tuned for separable corpora of tens to low hundreds of
        // examples; low regularization, as the source model used.
        Self {
            learning_rate: 1.0,
            epochs: 800,
            l2_penalty: 5e-4,
        }
    }
}

impl SoftmaxModel {
    pub(crate) fn train(
        classes: Vec<Intent>,
        features: &[SparseVector],
        labels: &[usize],
        dims: usize,
        config: &TrainingConfig,
    ) -> Self {
        let num_classes = classes.len();
        let mut weights = vec![0.0_f32; num_classes * dims];
        let mut bias = vec![0.0_f32; num_classes];
        let sample_count = features.len() as f32;

        let mut weight_grad = vec![0.0_f32; num_classes * dims];
        let mut bias_grad = vec![0.0_f32; num_classes];

        for _ in 0..config.epochs {
            weight_grad.iter_mut().for_each(|g| *g = 0.0);
            bias_grad.iter_mut().for_each(|g| *g = 0.0);

            for (vector, &label) in features.iter().zip(labels) {
                let probabilities = softmax(&logits(&weights, &bias, dims, vector));
                for class in 0..num_classes {
                    let error = probabilities[class] - if class == label { 1.0 } else { 0.0 };
                    bias_grad[class] += error;
                    for &(index, weight) in vector {
                        weight_grad[class * dims + index] += error * weight;
                    }
                }
            }

            let step = config.learning_rate;
            for (w, g) in weights.iter_mut().zip(&weight_grad) {
                *w -= step * (g / sample_count + config.l2_penalty * *w);
            }
            for (b, g) in bias.iter_mut().zip(&bias_grad) {
                *b -= step * g / sample_count;
            }
        }

        Self {
            classes,
            weights,
            bias,
            dims,
        }
    }

    pub(crate) fn classes(&self) -> &[Intent] {
        &self.classes
    }

    /// Probability distribution over all classes, summing to 1.
    pub(crate) fn predict_proba(&self, vector: &SparseVector) -> Vec<f32> {
        softmax(&logits(&self.weights, &self.bias, self.dims, vector))
    }
}

fn logits(weights: &[f32], bias: &[f32], dims: usize, vector: &SparseVector) -> Vec<f32> {
    bias.iter()
        .enumerate()
        .map(|(class, &b)| {
            let row = &weights[class * dims..(class + 1) * dims];
            b + vector.iter().map(|&(index, weight)| row[index] * weight).sum::<f32>()
        })
        .collect()
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.iter().map(|&l| (l - max).exp()).collect::<Vec<_>>();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}
