use crate::backend::{ComputeBackend, ExecutionTarget};

/// Sequential CPU compute backend.
///
/// Every operation runs to completion on the calling thread. Intended as the
/// reference implementation and for problems too small to amortize a pool.
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn target(&self) -> ExecutionTarget {
        ExecutionTarget::Sequential
    }

    fn num_threads(&self) -> usize {
        1
    }
}
