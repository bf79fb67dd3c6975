pub mod arch;
pub mod network;

pub use arch::{Architecture, LayerKind, DEFAULT_INIT_STD};
pub use network::Network;
