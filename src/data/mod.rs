pub mod dataset;
pub mod idx;

pub use dataset::Dataset;
pub use idx::{load_mnist_2d, parse_idx_pair};
