use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::backend::{ComputeBackend, ExecutionTarget};
use crate::error::{Result, TensorError};

/// Configuration for a [`ParallelBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Worker count. `None` uses rayon's default (one per logical CPU, or
    /// `RAYON_NUM_THREADS` when set).
    pub num_threads: Option<usize>,
    /// Smallest number of tiles handed to one worker task.
    pub min_tiles_per_task: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        ParallelConfig {
            num_threads: None,
            min_tiles_per_task: 4,
        }
    }
}

impl ParallelConfig {
    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    pub fn with_min_tiles_per_task(mut self, n: usize) -> Self {
        self.min_tiles_per_task = n.max(1);
        self
    }
}

/// Data-parallel CPU backend owning a dedicated rayon thread pool.
///
/// Work submitted through [`ParallelBackend::install`] runs inside the pool,
/// so rayon parallel iterators used by an operation are bounded by the
/// configured worker count.
#[derive(Debug)]
pub struct ParallelBackend {
    pool: ThreadPool,
    config: ParallelConfig,
}

impl ParallelBackend {
    /// Create a backend with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ParallelConfig::default())
    }

    /// Create a backend with an explicit configuration.
    ///
    /// # Errors
    /// Returns `TensorError::Backend` if the thread pool cannot be started.
    pub fn with_config(config: ParallelConfig) -> Result<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("dd-worker-{i}"));
        if let Some(n) = config.num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| TensorError::Backend(e.to_string()))?;
        debug!(
            "parallel backend started with {} threads (min {} tiles per task)",
            pool.current_num_threads(),
            config.min_tiles_per_task
        );
        Ok(ParallelBackend { pool, config })
    }

    /// Returns the configuration this backend was built with.
    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Run `op` inside this backend's thread pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl ComputeBackend for ParallelBackend {
    fn name(&self) -> &str {
        "parallel"
    }

    fn target(&self) -> ExecutionTarget {
        ExecutionTarget::Parallel
    }

    fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}
