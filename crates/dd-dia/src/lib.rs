//! `dd-dia` - Dense-by-dense products restricted to a diagonal sparsity pattern.
//!
//! Computes `C <- fact_ab * (A * B^T) + fact_c * C` only at the positions
//! stored by a diagonal-sparse (DIA) matrix `C`. Two execution strategies share
//! one interface, [`DiaBackend`]:
//! - `CpuBackend` walks the diagonals directly on the calling thread.
//! - `ParallelBackend` builds a [`TiledBlockDescriptor`] once per pattern and
//!   then visits only the tiles the diagonals actually cross.
//!
//! ```no_run
//! use dd_dia::{Blend, DiaBackend, DiaMatrix, DiaPattern};
//! use dd_tensor::{DType, ParallelBackend, Shape, Tensor};
//!
//! # fn main() -> dd_dia::Result<()> {
//! let backend = ParallelBackend::new()?;
//! let pattern = DiaPattern::new(256, 256, [-1, 0, 1])?;
//! let descriptor = backend.build_block_descriptor(&pattern)?;
//!
//! let a = Tensor::ones::<f32>(Shape::matrix(256, 64));
//! let mut c = DiaMatrix::zeros(pattern, DType::F32)?;
//! backend.densedense_to_dia(&mut c, &descriptor, &a, &a, Blend::default())?;
//! # Ok(())
//! # }
//! ```

pub mod blend;
pub mod descriptor;
pub mod error;
pub mod matrix;
pub mod multiply;
pub mod pattern;

pub use blend::Blend;
pub use descriptor::{
    BlockDescriptor, BlockRecord, HostBlockDescriptor, TiledBlockDescriptor, TILE_SIZE,
};
pub use error::{DiaError, Result};
pub use matrix::DiaMatrix;
pub use multiply::{build_block_descriptor, densedense_to_dia, DiaBackend};
pub use pattern::DiaPattern;
