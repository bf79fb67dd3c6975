pub mod cache;
mod elementwise;
pub mod layer;
pub mod linear;
pub mod relu;
pub mod sigmoid;

pub use cache::ForwardCache;
pub use layer::Layer;
pub use linear::Linear;
pub use relu::Relu;
pub use sigmoid::Sigmoid;
