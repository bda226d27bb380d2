use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the tensor and network layers can report.
///
/// All variants describe caller misuse; none is expected during a normal
/// training run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid shape {rows}x{columns}: both dimensions must be non-zero")]
    InvalidShape { rows: usize, columns: usize },

    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    #[error(
        "incompatible shapes for matrix product: {}x{} * {}x{}",
        .left.0,
        .left.1,
        .right.0,
        .right.1
    )]
    IncompatibleShape {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid topology {0:?}: need at least two non-zero layer sizes")]
    InvalidTopology(Vec<usize>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn shape_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Error {
        Error::ShapeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}
