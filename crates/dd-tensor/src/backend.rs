use std::fmt::{self, Debug};

/// Where a computation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionTarget {
    /// Single-threaded, in the calling thread.
    Sequential,
    /// Data-parallel across a worker pool.
    Parallel,
}

impl fmt::Display for ExecutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionTarget::Sequential => write!(f, "sequential"),
            ExecutionTarget::Parallel => write!(f, "parallel"),
        }
    }
}

/// Trait for pluggable compute backends (sequential CPU, thread pool, ...).
///
/// A backend identifies an execution target. Operations that need a
/// target-specific strategy are expressed as extension traits over this one,
/// so operands and auxiliary structures built for one backend cannot be handed
/// to another.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu", "parallel").
    fn name(&self) -> &str;

    /// Returns the execution target this backend drives.
    fn target(&self) -> ExecutionTarget;

    /// Number of worker threads computations are spread over.
    fn num_threads(&self) -> usize;
}
