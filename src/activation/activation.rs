use serde::{Serialize, Deserialize};

/// Elementwise nonlinearities with hand-derived gradients.
///
/// Each variant knows which tensor its layer must keep for the backward pass
/// (`caches_output`) and how to turn that cached value into a local derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Sigmoid => logistic(x),
        }
    }

    /// ReLU keeps its input, Sigmoid keeps its output.
    pub fn caches_output(&self) -> bool {
        matches!(self, ActivationFunction::Sigmoid)
    }

    /// Local derivative evaluated from the cached value.
    ///
    /// ReLU's derivative is 1 strictly above zero and 0 at or below it,
    /// including exactly at zero.
    pub fn derivative_from_cached(&self, cached: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if cached > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Sigmoid => cached * (1.0 - cached),
        }
    }
}

/// 1 / (1 + e^-x) without overflowing for large |x|.
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
