use crate::error::Result;
use crate::loss::loss_fn::Loss;
use crate::math::matrix::Matrix;

/// Row-wise softmax with the row maximum subtracted before exponentiating.
pub fn softmax_rows(logits: &Matrix) -> Matrix {
    let data = logits.data.iter()
        .map(|row| {
            let max = row_max(row);
            let exps: Vec<f64> = row.iter().map(|&x| (x - max).exp()).collect();
            let total: f64 = exps.iter().sum();
            exps.into_iter().map(|e| e / total).collect()
        })
        .collect();
    Matrix { rows: logits.rows, cols: logits.cols, data }
}

/// Row-wise `log(softmax(x))` via log-sum-exp; finite for any finite input.
pub fn log_softmax_rows(logits: &Matrix) -> Matrix {
    let data = logits.data.iter()
        .map(|row| {
            let max = row_max(row);
            let log_total = row.iter().map(|&x| (x - max).exp()).sum::<f64>().ln();
            row.iter().map(|&x| x - max - log_total).collect()
        })
        .collect();
    Matrix { rows: logits.rows, cols: logits.cols, data }
}

fn row_max(row: &[f64]) -> f64 {
    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Softmax followed by categorical cross-entropy. Predictions are logits.
#[derive(Debug, Clone)]
pub struct SoftmaxCrossEntropyLoss {
    name: String,
}

impl SoftmaxCrossEntropyLoss {
    pub fn new(name: impl Into<String>) -> SoftmaxCrossEntropyLoss {
        SoftmaxCrossEntropyLoss { name: name.into() }
    }
}

impl Loss for SoftmaxCrossEntropyLoss {
    fn name(&self) -> &str {
        &self.name
    }

    /// L = -(1/B) · Σ_b Σ_c t · log softmax(p)
    fn forward(&self, predictions: &Matrix, targets: &Matrix) -> Result<f64> {
        predictions.ensure_same_shape(targets, "softmax cross-entropy")?;
        let batch = predictions.rows as f64;
        let log_probs = log_softmax_rows(predictions);
        Ok(-log_probs.hadamard(targets)?.sum() / batch)
    }

    /// ∂L/∂p = (softmax(p) - t) / B
    fn backward(&self, predictions: &Matrix, targets: &Matrix) -> Result<Matrix> {
        predictions.ensure_same_shape(targets, "softmax cross-entropy")?;
        let batch = predictions.rows as f64;
        Ok(softmax_rows(predictions).sub(targets)?.scale(1.0 / batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_loss_is_negative_log_probability() {
        let loss = SoftmaxCrossEntropyLoss::new("loss");
        let x = Matrix::from_row(vec![1.0, 2.0, 0.5]);
        let t = Matrix::from_row(vec![0.0, 1.0, 0.0]);
        let z: f64 = x.data[0].iter().map(|v| v.exp()).sum();
        let expected = -(2.0f64.exp() / z).ln();
        assert!((loss.forward(&x, &t).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn softmax_rows_sum_to_one_even_for_huge_logits() {
        let x = Matrix::from_data(vec![vec![1000.0, 999.0, -1000.0], vec![-5.0, 0.0, 5.0]]).unwrap();
        let s = softmax_rows(&x);
        for row in &s.data {
            assert!(row.iter().all(|v| v.is_finite()));
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn loss_stays_finite_when_target_class_underflows() {
        let loss = SoftmaxCrossEntropyLoss::new("loss");
        let x = Matrix::from_row(vec![0.0, 2000.0]);
        let t = Matrix::from_row(vec![1.0, 0.0]);
        let l = loss.forward(&x, &t).unwrap();
        assert!((l - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn gradient_is_batch_normalized() {
        let loss = SoftmaxCrossEntropyLoss::new("loss");
        let x = Matrix::from_data(vec![vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap();
        let t = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let g = loss.backward(&x, &t).unwrap();
        assert_eq!(g.data, vec![vec![-0.25, 0.25], vec![0.25, -0.25]]);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let loss = SoftmaxCrossEntropyLoss::new("loss");
        assert!(loss.forward(&Matrix::zeros(1, 3), &Matrix::zeros(1, 2)).is_err());
        assert!(loss.backward(&Matrix::zeros(2, 3), &Matrix::zeros(1, 3)).is_err());
    }
}
