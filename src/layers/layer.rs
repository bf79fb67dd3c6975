use std::fmt::Debug;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::optim::sgd::UpdateConfig;

/// A differentiable stage of the network with a hand-derived backward pass.
///
/// Calls must alternate: one `forward`, then at most one `backward` consuming
/// the tensor that forward saved. `backward` without a preceding `forward`
/// fails with `NnError::StaleCache`. Trainable layers overwrite (never
/// accumulate) their parameter gradients on each `backward`, so `update`
/// must run before the next backward if those gradients are to be used.
pub trait Layer: Debug {
    /// Diagnostic name; has no effect on behaviour.
    fn name(&self) -> &str;

    fn is_trainable(&self) -> bool {
        false
    }

    /// Maps `(batch, in_features)` to `(batch, out_features)` and saves what
    /// backward will need.
    fn forward(&mut self, input: &Matrix) -> Result<Matrix>;

    /// Maps the gradient w.r.t. this layer's output to the gradient w.r.t.
    /// its input.
    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix>;

    /// Applies one optimiser step to the layer's own parameters.
    fn update(&mut self, _config: &UpdateConfig) -> Result<()> {
        Ok(())
    }

    fn parameter_count(&self) -> usize {
        0
    }
}
