/// Errors raised by the layer, loss, and solver code.
///
/// Every failure inside a forward/backward/update step invalidates the whole
/// training step; callers are expected to abort the step (or the run) rather
/// than retry.
#[derive(Debug, thiserror::Error)]
pub enum NnError {
    /// Two tensors that must agree in shape do not.
    #[error("shape mismatch in {op}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// `backward` was called on a layer with no matching prior `forward`.
    #[error("layer '{layer}': backward called without a preceding forward")]
    StaleCache { layer: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("data error: {0}")]
    Data(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;

impl NnError {
    pub(crate) fn shape(op: &'static str, expected: (usize, usize), got: (usize, usize)) -> Self {
        NnError::ShapeMismatch { op, expected, got }
    }
}
