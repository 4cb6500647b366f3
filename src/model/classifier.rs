//! Classifier contract and the bundled linear implementation

use std::path::Path;

use candle_core::{Device, Tensor, D};
use serde::{Deserialize, Serialize};

use crate::errors::{InferenceError, Result};

/// A pre-trained multi-class classifier over a fixed binary feature layout
pub trait Classifier: Send + Sync {
    /// Length of the feature vector the model expects
    fn n_features(&self) -> usize;

    /// Number of label indices the model can emit
    fn n_classes(&self) -> usize;

    /// Predicted label index for one feature row
    fn predict(&self, features: &[f32]) -> Result<usize>;

    /// Class probabilities for one feature row, indexed by label
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>>;
}

/// Serialized form of a linear softmax model.
///
/// `weights[class][feature]`, one bias per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelSpec {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

/// Softmax regression evaluated with candle tensors
pub struct LinearClassifier {
    /// Shape (n_features, n_classes)
    weights: Tensor,
    /// Shape (n_classes)
    bias: Tensor,
    n_features: usize,
    n_classes: usize,
    device: Device,
}

impl LinearClassifier {
    /// Build from per-class weight rows and biases
    pub fn new(weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self> {
        let n_classes = weights.len();
        let n_features = weights.first().map(Vec::len).unwrap_or(0);

        if n_classes == 0 || n_features == 0 {
            return Err(InferenceError::ModelUnavailable(
                "linear model has no weights".to_string(),
            ));
        }
        if weights.iter().any(|row| row.len() != n_features) {
            return Err(InferenceError::ModelUnavailable(
                "linear model weight rows differ in length".to_string(),
            ));
        }
        if bias.len() != n_classes {
            return Err(InferenceError::ModelUnavailable(format!(
                "linear model has {} classes but {} biases",
                n_classes,
                bias.len()
            )));
        }

        // Stored transposed so a single row multiplies straight through
        let mut flat = Vec::with_capacity(n_features * n_classes);
        for feature in 0..n_features {
            for row in &weights {
                flat.push(row[feature]);
            }
        }

        let device = Device::Cpu;
        let weights = Tensor::from_vec(flat, (n_features, n_classes), &device)?;
        let bias = Tensor::from_vec(bias, n_classes, &device)?;

        Ok(Self {
            weights,
            bias,
            n_features,
            n_classes,
            device,
        })
    }

    pub fn from_spec(spec: LinearModelSpec) -> Result<Self> {
        Self::new(spec.weights, spec.bias)
    }

    /// Load a JSON-serialized `LinearModelSpec`
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let spec: LinearModelSpec = serde_json::from_str(&contents)?;
        Self::from_spec(spec)
    }

    fn check_width(&self, features: &[f32]) -> Result<()> {
        if features.len() != self.n_features {
            return Err(InferenceError::EncodingError(format!(
                "feature vector has {} slots, model expects {}",
                features.len(),
                self.n_features
            )));
        }
        Ok(())
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict(&self, features: &[f32]) -> Result<usize> {
        let probs = self.predict_proba(features)?;

        // Lowest index wins ties
        let mut best = 0;
        for (idx, p) in probs.iter().enumerate() {
            if *p > probs[best] {
                best = idx;
            }
        }
        Ok(best)
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>> {
        self.check_width(features)?;

        let x = Tensor::from_slice(features, (1, self.n_features), &self.device)?;
        let logits = x.matmul(&self.weights)?.broadcast_add(&self.bias)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;

        Ok(probs.squeeze(0)?.to_vec1::<f32>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class() -> LinearClassifier {
        // class 0 fires on feature 0, class 1 on feature 1
        LinearClassifier::new(vec![vec![4.0, 0.0, 0.0], vec![0.0, 4.0, 0.0]], vec![0.0, 0.0]).unwrap()
    }

    #[test]
    fn test_predict_follows_weights() {
        let model = two_class();
        assert_eq!(model.predict(&[1.0, 0.0, 0.0]).unwrap(), 0);
        assert_eq!(model.predict(&[0.0, 1.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = two_class();
        let probs = model.predict_proba(&[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(probs.len(), 2);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_tie_goes_to_lowest_label() {
        let model = two_class();
        assert_eq!(model.predict(&[0.0, 0.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_wrong_width_is_encoding_error() {
        let model = two_class();
        let err = model.predict_proba(&[1.0]).unwrap_err();
        assert!(matches!(err, InferenceError::EncodingError(_)));
    }

    #[test]
    fn test_inconsistent_shapes_rejected() {
        assert!(LinearClassifier::new(vec![], vec![]).is_err());
        assert!(LinearClassifier::new(vec![vec![1.0], vec![1.0, 2.0]], vec![0.0, 0.0]).is_err());
        assert!(LinearClassifier::new(vec![vec![1.0]], vec![0.0, 0.0]).is_err());
    }
}
