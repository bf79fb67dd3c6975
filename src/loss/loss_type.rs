use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NnError;
use crate::loss::{euclidean::EuclideanLoss, loss_fn::Loss, softmax_cross_entropy::SoftmaxCrossEntropyLoss};

/// Selects which loss the solver uses.
///
/// - `Euclidean` — half squared error; pair with any output layer.
/// - `Softmax`   — softmax + cross-entropy; the last layer should emit logits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossType {
    Euclidean,
    Softmax,
}

impl LossType {
    pub fn build(self, name: impl Into<String>) -> Box<dyn Loss> {
        match self {
            LossType::Euclidean => Box::new(EuclideanLoss::new(name)),
            LossType::Softmax => Box::new(SoftmaxCrossEntropyLoss::new(name)),
        }
    }
}

impl FromStr for LossType {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(LossType::Euclidean),
            "softmax" => Ok(LossType::Softmax),
            other => Err(NnError::Parse(format!(
                "unknown loss '{}', expected Euclidean or Softmax",
                other
            ))),
        }
    }
}
