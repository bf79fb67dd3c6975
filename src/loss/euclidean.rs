use crate::error::Result;
use crate::loss::loss_fn::Loss;
use crate::math::matrix::Matrix;

/// Half squared Euclidean distance, averaged over the batch.
#[derive(Debug, Clone)]
pub struct EuclideanLoss {
    name: String,
}

impl EuclideanLoss {
    pub fn new(name: impl Into<String>) -> EuclideanLoss {
        EuclideanLoss { name: name.into() }
    }
}

impl Loss for EuclideanLoss {
    fn name(&self) -> &str {
        &self.name
    }

    /// L = (1/B) · Σ_b Σ_c (p - t)² / 2
    fn forward(&self, predictions: &Matrix, targets: &Matrix) -> Result<f64> {
        let diff = predictions.sub(targets)?;
        let batch = predictions.rows as f64;
        Ok(diff.map(|x| x * x).sum() / 2.0 / batch)
    }

    /// ∂L/∂p = (p - t) / B
    fn backward(&self, predictions: &Matrix, targets: &Matrix) -> Result<Matrix> {
        let batch = predictions.rows as f64;
        Ok(predictions.sub(targets)?.scale(1.0 / batch))
    }
}
