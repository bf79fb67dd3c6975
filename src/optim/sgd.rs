use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Hyperparameters shared by every trainable layer's `update`.
///
/// All three fields are required and must be finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfig {
    pub learning_rate: f64,
    pub momentum: f64,
    pub weight_decay: f64,
}

impl UpdateConfig {
    pub fn new(learning_rate: f64, momentum: f64, weight_decay: f64) -> UpdateConfig {
        UpdateConfig { learning_rate, momentum, weight_decay }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("learning_rate", self.learning_rate),
            ("momentum", self.momentum),
            ("weight_decay", self.weight_decay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NnError::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

/// One momentum-SGD step with L2 weight decay, in place:
///
/// ```text
/// diff  = momentum * diff + (grad + weight_decay * param)
/// param = param - learning_rate * diff
/// ```
///
/// `diff` is the velocity buffer carried between calls; it is never reset here.
pub fn momentum_step(
    param: &mut Matrix,
    grad: &Matrix,
    diff: &mut Matrix,
    config: &UpdateConfig,
) -> Result<()> {
    param.ensure_same_shape(grad, "momentum_step")?;
    param.ensure_same_shape(diff, "momentum_step")?;

    let UpdateConfig { learning_rate, momentum, weight_decay } = *config;
    for ((p_row, g_row), d_row) in param.data.iter_mut()
        .zip(grad.data.iter())
        .zip(diff.data.iter_mut())
    {
        for ((p, g), d) in p_row.iter_mut().zip(g_row.iter()).zip(d_row.iter_mut()) {
            *d = momentum * *d + (g + weight_decay * *p);
            *p -= learning_rate * *d;
        }
    }
    Ok(())
}
