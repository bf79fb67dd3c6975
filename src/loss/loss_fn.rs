use crate::error::Result;
use crate::math::matrix::Matrix;

/// A scalar objective over a batch of predictions and one-hot targets, both
/// shaped `(batch_size, num_classes)`.
///
/// Losses are stateless: `backward` recomputes whatever it needs from
/// `predictions` and `targets`. Both the value and the gradient are
/// batch means, so the gradient returned by `backward` already carries the
/// `1 / batch_size` factor.
pub trait Loss {
    fn name(&self) -> &str;

    fn forward(&self, predictions: &Matrix, targets: &Matrix) -> Result<f64>;

    fn backward(&self, predictions: &Matrix, targets: &Matrix) -> Result<Matrix>;
}
