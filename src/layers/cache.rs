use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// The tensor a layer saves during `forward` for use by the next `backward`.
///
/// `Idle --forward--> Saved --backward--> Idle`. A forward while `Saved`
/// replaces the tensor (evaluation passes never run backward); a backward
/// while `Idle` is a `StaleCache` error.
#[derive(Debug, Clone, Default)]
pub enum ForwardCache {
    #[default]
    Idle,
    Saved(Matrix),
}

impl ForwardCache {
    pub fn save(&mut self, tensor: Matrix) {
        *self = ForwardCache::Saved(tensor);
    }

    /// Borrows the saved tensor without consuming it.
    pub fn peek(&self, layer: &str) -> Result<&Matrix> {
        match self {
            ForwardCache::Saved(tensor) => Ok(tensor),
            ForwardCache::Idle => Err(NnError::StaleCache { layer: layer.to_owned() }),
        }
    }

    /// Drops the saved tensor once backward has used it.
    pub fn clear(&mut self) {
        *self = ForwardCache::Idle;
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, ForwardCache::Saved(_))
    }
}
