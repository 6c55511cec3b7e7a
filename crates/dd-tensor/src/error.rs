use thiserror::Error;

#[derive(Error, Debug)]
pub enum TensorError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: String, got: String },
    #[error("expected a 2D tensor, got {ndim} dimensions")]
    NotAMatrix { ndim: usize },
    #[error("index ({row}, {col}) out of bounds for [{rows}x{cols}]")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("failed to allocate storage for {requested} elements")]
    Allocation { requested: usize },
    #[error("backend initialization failed: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, TensorError>;
