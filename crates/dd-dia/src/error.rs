use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaError {
    #[error("diagonal offset {offset} out of range for [{rows}x{cols}] matrix")]
    OffsetOutOfRange { offset: i64, rows: usize, cols: usize },
    #[error("duplicate diagonal offset: {0}")]
    DuplicateOffset(i64),
    #[error("{op}: operand dimension mismatch, expected {expected}, got {got}")]
    OperandMismatch {
        op: &'static str,
        expected: String,
        got: String,
    },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: String, got: String },
    #[error("position ({row}, {col}) is not on a stored diagonal")]
    NotStored { row: usize, col: usize },
    #[error("block descriptor was built for a different diagonal pattern")]
    StaleDescriptor,
    #[error("failed to allocate storage for {requested} {what}")]
    Allocation { requested: usize, what: &'static str },
    #[error("tensor error: {0}")]
    Tensor(#[from] dd_tensor::TensorError),
}

pub type Result<T> = std::result::Result<T, DiaError>;
