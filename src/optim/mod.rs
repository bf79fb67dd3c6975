pub mod sgd;

pub use sgd::{momentum_step, UpdateConfig};
