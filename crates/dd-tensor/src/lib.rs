//! `dd-tensor` - Dense operands and execution targets for densedia.
//!
//! This crate provides:
//! - A 2D-capable `Tensor` type backed by CPU storage, in row- or column-major layout
//! - Data type definitions (F32, F64, F16) and the `Element` trait for typed access
//! - A `ComputeBackend` trait identifying an execution target
//! - A sequential `CpuBackend` and a rayon-backed `ParallelBackend`

pub mod backend;
pub mod cpu;
pub mod dtype;
pub mod error;
pub mod parallel;
pub mod shape;
pub mod storage;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use backend::{ComputeBackend, ExecutionTarget};
pub use cpu::CpuBackend;
pub use dtype::{DType, Element};
pub use error::{Result, TensorError};
pub use half::f16;
pub use parallel::{ParallelBackend, ParallelConfig};
pub use shape::{Layout, Shape};
pub use storage::CpuStorage;
pub use tensor::Tensor;
