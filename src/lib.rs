pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod optim;
pub mod network;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use layers::{Layer, Linear, Relu, Sigmoid};
pub use loss::{EuclideanLoss, Loss, LossType, SoftmaxCrossEntropyLoss};
pub use optim::sgd::UpdateConfig;
pub use network::{Architecture, Network};
pub use data::Dataset;
pub use train::{train, SolverConfig, TrainingReport};
