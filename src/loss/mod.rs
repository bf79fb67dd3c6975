pub mod euclidean;
pub mod loss_fn;
pub mod loss_type;
pub mod softmax_cross_entropy;

pub use euclidean::EuclideanLoss;
pub use loss_fn::Loss;
pub use loss_type::LossType;
pub use softmax_cross_entropy::{softmax_rows, SoftmaxCrossEntropyLoss};
