//! `C <- fact_ab * (A * B^T) + fact_c * C`, computed only on the stored
//! diagonals of a DIA matrix `C`.
//!
//! `A` is `[m, k]`, `B` is `[n, k]` and `C` is `[m, n]`. Positions of `C` off
//! its pattern are neither read nor written.

use dd_tensor::{f16, ComputeBackend, CpuBackend, DType, Element, ParallelBackend, Tensor};
use log::debug;
use rayon::prelude::*;

use crate::blend::{Blend, TypedBlend};
use crate::descriptor::{BlockDescriptor, HostBlockDescriptor, TiledBlockDescriptor, TILE_SIZE};
use crate::error::{DiaError, Result};
use crate::matrix::DiaMatrix;
use crate::pattern::DiaPattern;

/// Dense-by-dense products onto a diagonal pattern, per execution target.
///
/// Each backend pairs with its own descriptor type, so a descriptor built for
/// one target cannot be handed to the kernel of another.
pub trait DiaBackend: ComputeBackend {
    /// Spatial index consumed by this backend's kernel.
    type Descriptor: BlockDescriptor;

    /// Build the block descriptor for `pattern`.
    ///
    /// The descriptor may be reused for any number of products whose target
    /// matrix has exactly this pattern.
    fn build_block_descriptor(&self, pattern: &DiaPattern) -> Result<Self::Descriptor>;

    /// `C <- blend.fact_ab * (A * B^T) + blend.fact_c * C` on the pattern of `C`.
    ///
    /// All operands are checked before anything is written; on error `C` is
    /// unchanged.
    fn densedense_to_dia(
        &self,
        c: &mut DiaMatrix,
        descriptor: &Self::Descriptor,
        a: &Tensor,
        b: &Tensor,
        blend: Blend,
    ) -> Result<()>;
}

/// Build the block descriptor for `pattern` on `backend`.
pub fn build_block_descriptor<B: DiaBackend>(
    backend: &B,
    pattern: &DiaPattern,
) -> Result<B::Descriptor> {
    backend.build_block_descriptor(pattern)
}

/// `C <- blend.fact_ab * (A * B^T) + blend.fact_c * C` on `backend`.
pub fn densedense_to_dia<B: DiaBackend>(
    backend: &B,
    c: &mut DiaMatrix,
    descriptor: &B::Descriptor,
    a: &Tensor,
    b: &Tensor,
    blend: Blend,
) -> Result<()> {
    backend.densedense_to_dia(c, descriptor, a, b, blend)
}

impl DiaBackend for CpuBackend {
    type Descriptor = HostBlockDescriptor;

    fn build_block_descriptor(&self, pattern: &DiaPattern) -> Result<HostBlockDescriptor> {
        Ok(HostBlockDescriptor::new(pattern))
    }

    fn densedense_to_dia(
        &self,
        c: &mut DiaMatrix,
        _descriptor: &HostBlockDescriptor,
        a: &Tensor,
        b: &Tensor,
        blend: Blend,
    ) -> Result<()> {
        let dims = check_operands(c, a, b)?;
        debug!(
            "densedense_to_dia on {}: {} onto {} diagonals, {:?}",
            self.name(),
            dims,
            c.pattern().len(),
            blend
        );
        if blend.is_identity() {
            return Ok(());
        }
        match dims.dtype {
            DType::F32 => sequential::<f32>(c, a, b, blend),
            DType::F64 => sequential::<f64>(c, a, b, blend),
            DType::F16 => sequential::<f16>(c, a, b, blend),
        }
    }
}

impl DiaBackend for ParallelBackend {
    type Descriptor = TiledBlockDescriptor;

    fn build_block_descriptor(&self, pattern: &DiaPattern) -> Result<TiledBlockDescriptor> {
        let min_len = self.config().min_tiles_per_task;
        self.install(|| TiledBlockDescriptor::build(pattern, min_len))
    }

    fn densedense_to_dia(
        &self,
        c: &mut DiaMatrix,
        descriptor: &TiledBlockDescriptor,
        a: &Tensor,
        b: &Tensor,
        blend: Blend,
    ) -> Result<()> {
        let dims = check_operands(c, a, b)?;
        if !descriptor.matches(c.pattern()) {
            return Err(DiaError::StaleDescriptor);
        }
        debug!(
            "densedense_to_dia on {} ({} threads): {} over {} blocks, {:?}",
            self.name(),
            self.num_threads(),
            dims,
            descriptor.len(),
            blend
        );
        if blend.is_identity() {
            return Ok(());
        }
        let min_len = self.config().min_tiles_per_task;
        self.install(|| match dims.dtype {
            DType::F32 => tiled::<f32>(c, descriptor, a, b, blend, min_len),
            DType::F64 => tiled::<f64>(c, descriptor, a, b, blend, min_len),
            DType::F16 => tiled::<f16>(c, descriptor, a, b, blend, min_len),
        })
    }
}

/// Checked problem dimensions.
#[derive(Debug, Clone, Copy)]
struct Dims {
    m: usize,
    n: usize,
    k: usize,
    dtype: DType,
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}x{}] * [{}x{}]^T ({})",
            self.m, self.k, self.n, self.k, self.dtype
        )
    }
}

fn check_operands(c: &DiaMatrix, a: &Tensor, b: &Tensor) -> Result<Dims> {
    const OP: &str = "densedense_to_dia";
    let (m, k) = a.matrix_dims()?;
    let (n, kb) = b.matrix_dims()?;

    if kb != k {
        return Err(DiaError::OperandMismatch {
            op: OP,
            expected: format!("B with {} columns", k),
            got: format!("B of shape {}", b.shape()),
        });
    }
    if (c.rows(), c.cols()) != (m, n) {
        return Err(DiaError::OperandMismatch {
            op: OP,
            expected: format!("C of shape [{}x{}]", m, n),
            got: format!("C of shape [{}x{}]", c.rows(), c.cols()),
        });
    }
    for dtype in [a.dtype(), b.dtype()] {
        if dtype != c.dtype() {
            return Err(DiaError::DTypeMismatch {
                expected: c.dtype().to_string(),
                got: dtype.to_string(),
            });
        }
    }

    Ok(Dims {
        m,
        n,
        k,
        dtype: c.dtype(),
    })
}

/// Strided read-only view of a 2D operand.
struct DenseView<'a, T> {
    data: &'a [T],
    row_stride: usize,
    col_stride: usize,
    cols: usize,
}

impl<'a, T: Element> DenseView<'a, T> {
    fn new(t: &'a Tensor) -> Result<Self> {
        let (rows, cols) = t.matrix_dims()?;
        let (row_stride, col_stride) = t.layout().strides(rows, cols);
        Ok(DenseView {
            data: t.data::<T>()?,
            row_stride,
            col_stride,
            cols,
        })
    }

    /// Inner product of row `i` of `self` with row `j` of `other`.
    #[inline]
    fn dot(&self, i: usize, other: &DenseView<'_, T>, j: usize) -> T::Acc {
        let mut acc = T::acc_zero();
        if self.col_stride == 1 && other.col_stride == 1 {
            let x = &self.data[i * self.row_stride..][..self.cols];
            let y = &other.data[j * other.row_stride..][..self.cols];
            for (&p, &q) in x.iter().zip(y) {
                acc = acc + p.to_acc() * q.to_acc();
            }
        } else {
            for p in 0..self.cols {
                let x = self.data[i * self.row_stride + p * self.col_stride];
                let y = other.data[j * other.row_stride + p * other.col_stride];
                acc = acc + x.to_acc() * y.to_acc();
            }
        }
        acc
    }
}

/// Walk each stored diagonal top to bottom on the calling thread.
fn sequential<T: Element>(c: &mut DiaMatrix, a: &Tensor, b: &Tensor, blend: Blend) -> Result<()> {
    let av = DenseView::<T>::new(a)?;
    let bv = DenseView::<T>::new(b)?;
    let blend = TypedBlend::<T>::new(blend);
    let rows = c.rows();
    let (pattern, values) = c.parts_mut::<T>()?;

    for (kd, &d) in pattern.offsets().iter().enumerate() {
        let base = kd * rows;
        for i in pattern.row_range(kd) {
            let j = (i as i64 + d) as usize;
            let slot = &mut values[base + i];
            *slot = blend.apply(*slot, || av.dot(i, &bv, j));
        }
    }
    Ok(())
}

/// Visit only the tiles recorded in `descriptor`, in parallel.
///
/// Every tile's results are staged first; `C` is written after all tiles are
/// done. Each pattern position belongs to exactly one tile, so the staged
/// updates never overlap.
fn tiled<T: Element>(
    c: &mut DiaMatrix,
    descriptor: &TiledBlockDescriptor,
    a: &Tensor,
    b: &Tensor,
    blend: Blend,
    min_len: usize,
) -> Result<()> {
    let av = DenseView::<T>::new(a)?;
    let bv = DenseView::<T>::new(b)?;
    let blend = TypedBlend::<T>::new(blend);
    let (rows, cols) = (c.rows(), c.cols());
    let offsets = descriptor.pattern().offsets();

    // Workers only read C; the staged values are scattered once every tile is
    // done, so a failure before the scatter leaves C untouched.
    let nnz = c.pattern().nnz();
    let mut updates: Vec<(usize, T)> = Vec::new();
    updates
        .try_reserve_exact(nnz)
        .map_err(|_| DiaError::Allocation {
            requested: nnz,
            what: "staged values",
        })?;
    {
        let values = c.values::<T>()?;
        let (av, bv, blend) = (&av, &bv, &blend);
        updates.par_extend(descriptor
            .blocks()
            .par_iter()
            .with_min_len(min_len)
            .flat_map_iter(move |block| {
                let (r0, c0) = (block.start_row() as i64, block.start_col() as i64);
                let r1 = (block.start_row() + TILE_SIZE).min(rows) as i64;
                let c1 = (block.start_col() + TILE_SIZE).min(cols) as i64;
                block.diagonal_indices().flat_map(move |kd| {
                    let d = offsets[kd];
                    // rows of this tile whose column i + d also lies in it
                    let start = r0.max(c0 - d);
                    let end = r1.min(c1 - d).max(start);
                    (start..end).map(move |i| {
                        let i = i as usize;
                        let j = (i as i64 + d) as usize;
                        let idx = kd * rows + i;
                        (idx, blend.apply(values[idx], || av.dot(i, bv, j)))
                    })
                })
            }));
    }

    let values = c.values_mut::<T>()?;
    for (idx, v) in updates {
        values[idx] = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dd_tensor::{Layout, ParallelConfig, Shape};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn parallel() -> ParallelBackend {
        ParallelBackend::with_config(
            ParallelConfig::default()
                .with_num_threads(4)
                .with_min_tiles_per_task(1),
        )
        .unwrap()
    }

    fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize, layout: Layout) -> Tensor {
        Tensor::from_fn(rows, cols, layout, |_, _| rng.gen_range(-1.0f32..1.0))
    }

    fn random_dia(rng: &mut StdRng, pattern: &DiaPattern) -> DiaMatrix {
        let mut c = DiaMatrix::zeros(pattern.clone(), DType::F32).unwrap();
        for k in 0..pattern.len() {
            for v in c.diagonal_mut::<f32>(k).unwrap() {
                *v = rng.gen_range(-1.0f32..1.0);
            }
        }
        c
    }

    /// `fact_ab * dot(A[i,:], B[j,:]) + fact_c * old`, in f64.
    fn reference(a: &Tensor, b: &Tensor, i: usize, j: usize, old: f32, blend: Blend) -> f64 {
        let (_, k) = a.matrix_dims().unwrap();
        let dot: f64 = (0..k)
            .map(|p| a.get::<f32>(i, p).unwrap() as f64 * b.get::<f32>(j, p).unwrap() as f64)
            .sum();
        blend.fact_ab * dot + blend.fact_c * old as f64
    }

    fn run<B: DiaBackend>(backend: &B, c: &mut DiaMatrix, a: &Tensor, b: &Tensor, blend: Blend) {
        let bd = build_block_descriptor(backend, c.pattern()).unwrap();
        densedense_to_dia(backend, c, &bd, a, b, blend).unwrap();
    }

    fn check_against_reference<B: DiaBackend>(backend: &B, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (m, n, k) = (53, 41, 19);
        let pattern = DiaPattern::new(m, n, [-52, -20, -1, 0, 3, 17, 40]).unwrap();
        let a = random_matrix(&mut rng, m, k, Layout::RowMajor);
        let b = random_matrix(&mut rng, n, k, Layout::ColMajor);
        let old = random_dia(&mut rng, &pattern);
        let blend = Blend::new(1.5, -0.25);

        let mut c = old.clone();
        run(backend, &mut c, &a, &b, blend);

        for i in 0..m {
            for j in 0..n {
                match old.get::<f32>(i, j).unwrap() {
                    Some(prev) => {
                        let got = c.get::<f32>(i, j).unwrap().unwrap();
                        let want = reference(&a, &b, i, j, prev, blend);
                        assert_relative_eq!(got as f64, want, epsilon = 1e-5, max_relative = 1e-5);
                    }
                    None => assert_eq!(c.get::<f32>(i, j).unwrap(), None),
                }
            }
        }
    }

    #[test]
    fn test_sequential_matches_reference() {
        check_against_reference(&CpuBackend::new(), 7);
    }

    #[test]
    fn test_tiled_matches_reference() {
        check_against_reference(&parallel(), 7);
    }

    #[test]
    fn test_main_diagonal_of_ones() {
        let a = Tensor::ones::<f32>(Shape::matrix(4, 4));
        let pattern = DiaPattern::new(4, 4, [0]).unwrap();
        for backend_is_parallel in [false, true] {
            let mut c = DiaMatrix::zeros(pattern.clone(), DType::F32).unwrap();
            if backend_is_parallel {
                run(&parallel(), &mut c, &a, &a, Blend::default());
            } else {
                run(&CpuBackend::new(), &mut c, &a, &a, Blend::default());
            }
            assert_eq!(c.diagonal::<f32>(0).unwrap(), &[4.0; 4]);
            let dense = c.to_dense().unwrap();
            assert_eq!(dense.get::<f32>(0, 1).unwrap(), 0.0);
            assert_eq!(dense.get::<f32>(3, 0).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_two_diagonals_with_blend() {
        let a = Tensor::ones::<f32>(Shape::matrix(4, 4));
        let pattern = DiaPattern::new(4, 4, [0, 1]).unwrap();
        let blend = Blend::new(2.0, 0.5);

        let mut seq = DiaMatrix::zeros(pattern.clone(), DType::F32).unwrap();
        run(&CpuBackend::new(), &mut seq, &a, &a, blend);
        let mut par = DiaMatrix::zeros(pattern, DType::F32).unwrap();
        run(&parallel(), &mut par, &a, &a, blend);

        for c in [&seq, &par] {
            assert_eq!(c.diagonal::<f32>(0).unwrap(), &[8.0; 4]);
            assert_eq!(c.diagonal::<f32>(1).unwrap(), &[8.0; 3]);
        }
    }

    #[test]
    fn test_strategies_agree() {
        let mut rng = StdRng::seed_from_u64(11);
        let (m, n, k) = (130, 97, 33);
        let pattern = DiaPattern::new(m, n, [-129, -64, -5, -4, -3, 0, 1, 2, 50, 96]).unwrap();
        let a = random_matrix(&mut rng, m, k, Layout::ColMajor);
        let b = random_matrix(&mut rng, n, k, Layout::RowMajor);
        let old = random_dia(&mut rng, &pattern);
        let blend = Blend::new(0.75, 2.0);

        let mut seq = old.clone();
        run(&CpuBackend::new(), &mut seq, &a, &b, blend);
        let mut par = old;
        run(&parallel(), &mut par, &a, &b, blend);

        for kd in 0..pattern.len() {
            let s = seq.diagonal::<f32>(kd).unwrap();
            let p = par.diagonal::<f32>(kd).unwrap();
            for (x, y) in s.iter().zip(p) {
                assert_relative_eq!(*x, *y, epsilon = 1e-6, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_identity_blend_is_bit_exact_noop() {
        let mut rng = StdRng::seed_from_u64(3);
        let pattern = DiaPattern::banded(40, 40, 3, 5).unwrap();
        let a = random_matrix(&mut rng, 40, 8, Layout::RowMajor);
        let b = random_matrix(&mut rng, 40, 8, Layout::RowMajor);
        let old = random_dia(&mut rng, &pattern);

        let mut seq = old.clone();
        run(&CpuBackend::new(), &mut seq, &a, &b, Blend::new(0.0, 1.0));
        let mut par = old.clone();
        run(&parallel(), &mut par, &a, &b, Blend::new(0.0, 1.0));
        assert_eq!(seq, old);
        assert_eq!(par, old);
    }

    #[test]
    fn test_overwrite_ignores_nan_in_target() {
        let a = Tensor::ones::<f32>(Shape::matrix(20, 3));
        let pattern = DiaPattern::new(20, 20, [-2, 0, 7]).unwrap();
        let mut c = DiaMatrix::zeros(pattern.clone(), DType::F32).unwrap();
        c.fill(f32::NAN).unwrap();
        let mut d = c.clone();
        run(&CpuBackend::new(), &mut c, &a, &a, Blend::overwrite());
        run(&parallel(), &mut d, &a, &a, Blend::overwrite());
        for kd in 0..pattern.len() {
            assert!(c.diagonal::<f32>(kd).unwrap().iter().all(|&v| v == 3.0));
            assert!(d.diagonal::<f32>(kd).unwrap().iter().all(|&v| v == 3.0));
        }
    }

    #[test]
    fn test_tiled_writes_each_stored_position_once() {
        let a = Tensor::ones::<f32>(Shape::matrix(37, 2));
        let b = Tensor::ones::<f32>(Shape::matrix(50, 2));
        let pattern = DiaPattern::banded(37, 50, 36, 49).unwrap();
        let mut c = DiaMatrix::zeros(pattern.clone(), DType::F32).unwrap();
        c.fill(f32::NAN).unwrap();
        run(&parallel(), &mut c, &a, &b, Blend::overwrite());

        let values = c.values::<f32>().unwrap();
        let written = values.iter().filter(|&&v| v == 2.0).count();
        assert_eq!(written, pattern.nnz());
        assert_eq!(written, 37 * 50);
        assert_eq!(values.len() - written, values.iter().filter(|v| v.is_nan()).count());
    }

    #[test]
    fn test_rectangular_padding_untouched() {
        let a = Tensor::ones::<f64>(Shape::matrix(3, 2));
        let b = Tensor::ones::<f64>(Shape::matrix(5, 2));
        let pattern = DiaPattern::new(3, 5, [-2, 3]).unwrap();
        let mut c = DiaMatrix::zeros(pattern, DType::F64).unwrap();
        run(&parallel(), &mut c, &a, &b, Blend::accumulate());
        // offset -2 holds only row 2, offset 3 only rows 0 and 1
        assert_eq!(c.values::<f64>().unwrap(), &[0.0, 0.0, 2.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn test_f16_and_f64() {
        let pattern = DiaPattern::new(18, 18, [-1, 0, 16]).unwrap();

        let a = Tensor::from_fn(18, 4, Layout::RowMajor, |i, p| f16::from_f32((i + p) as f32 * 0.5));
        let mut c = DiaMatrix::zeros(pattern.clone(), DType::F16).unwrap();
        run(&parallel(), &mut c, &a, &a, Blend::default());
        let mut s = DiaMatrix::zeros(pattern.clone(), DType::F16).unwrap();
        run(&CpuBackend::new(), &mut s, &a, &a, Blend::default());
        assert_eq!(c, s);
        // row 0 = [0, .5, 1, 1.5]; row 16 = [8, 8.5, 9, 9.5]
        assert_eq!(c.get::<f16>(0, 16).unwrap(), Some(f16::from_f32(27.5)));

        let a = Tensor::from_fn(18, 4, Layout::ColMajor, |i, p| (i * p) as f64);
        let mut c = DiaMatrix::zeros(pattern, DType::F64).unwrap();
        run(&parallel(), &mut c, &a, &a, Blend::default());
        // (i, i): i^2 * (0 + 1 + 4 + 9)
        assert_eq!(c.get::<f64>(3, 3).unwrap(), Some(126.0));
    }

    #[test]
    fn test_descriptor_reused_across_calls() {
        let backend = parallel();
        let pattern = DiaPattern::banded(64, 64, 1, 1).unwrap();
        let bd = backend.build_block_descriptor(&pattern).unwrap();
        let a = Tensor::ones::<f32>(Shape::matrix(64, 2));
        let mut c = DiaMatrix::zeros(pattern, DType::F32).unwrap();
        for _ in 0..3 {
            backend
                .densedense_to_dia(&mut c, &bd, &a, &a, Blend::accumulate())
                .unwrap();
        }
        assert_eq!(c.get::<f32>(10, 11).unwrap(), Some(6.0));
    }

    #[test]
    fn test_empty_cases() {
        let a = Tensor::zeros(Shape::matrix(0, 3), DType::F32).unwrap();
        let b = Tensor::zeros(Shape::matrix(5, 3), DType::F32).unwrap();
        let mut c = DiaMatrix::zeros(DiaPattern::new(0, 5, []).unwrap(), DType::F32).unwrap();
        run(&parallel(), &mut c, &a, &b, Blend::default());
        run(&CpuBackend::new(), &mut c, &a, &b, Blend::default());

        // k = 0: every product is an empty sum
        let a = Tensor::zeros(Shape::matrix(4, 0), DType::F32).unwrap();
        let mut c = DiaMatrix::zeros(DiaPattern::new(4, 4, [0]).unwrap(), DType::F32).unwrap();
        c.fill(9.0f32).unwrap();
        run(&parallel(), &mut c, &a, &a, Blend::default());
        assert_eq!(c.diagonal::<f32>(0).unwrap(), &[0.0; 4]);
    }

    #[test]
    fn test_inner_dimension_mismatch() {
        let a = Tensor::ones::<f32>(Shape::matrix(4, 3));
        let b = Tensor::ones::<f32>(Shape::matrix(4, 2));
        let mut c = DiaMatrix::zeros(DiaPattern::new(4, 4, [0]).unwrap(), DType::F32).unwrap();
        c.fill(1.0f32).unwrap();
        let before = c.clone();
        let err = densedense_to_dia(&CpuBackend::new(), &mut c, &HostBlockDescriptor, &a, &b, Blend::default());
        assert!(matches!(err, Err(DiaError::OperandMismatch { .. })));
        assert_eq!(c, before);
    }

    #[test]
    fn test_target_shape_mismatch() {
        let backend = parallel();
        let a = Tensor::ones::<f32>(Shape::matrix(4, 3));
        let b = Tensor::ones::<f32>(Shape::matrix(5, 3));
        let pattern = DiaPattern::new(4, 4, [0]).unwrap();
        let bd = backend.build_block_descriptor(&pattern).unwrap();
        let mut c = DiaMatrix::zeros(pattern, DType::F32).unwrap();
        let err = backend.densedense_to_dia(&mut c, &bd, &a, &b, Blend::default());
        assert!(matches!(err, Err(DiaError::OperandMismatch { .. })));
    }

    #[test]
    fn test_dtype_mismatch() {
        let a = Tensor::ones::<f32>(Shape::matrix(4, 3));
        let b = Tensor::ones::<f64>(Shape::matrix(4, 3));
        let mut c = DiaMatrix::zeros(DiaPattern::new(4, 4, [0]).unwrap(), DType::F32).unwrap();
        let err = CpuBackend::new().densedense_to_dia(&mut c, &HostBlockDescriptor, &a, &b, Blend::default());
        assert!(matches!(err, Err(DiaError::DTypeMismatch { .. })));
    }

    #[test]
    fn test_stale_descriptor_rejected() {
        let backend = parallel();
        let a = Tensor::ones::<f32>(Shape::matrix(32, 3));
        let built_for = DiaPattern::new(32, 32, [0]).unwrap();
        let bd = backend.build_block_descriptor(&built_for).unwrap();
        let mut c = DiaMatrix::zeros(DiaPattern::new(32, 32, [0, 20]).unwrap(), DType::F32).unwrap();
        let before = c.clone();
        let err = backend.densedense_to_dia(&mut c, &bd, &a, &a, Blend::default());
        assert!(matches!(err, Err(DiaError::StaleDescriptor)));
        assert_eq!(c, before);
    }

    #[test]
    fn test_non_matrix_operand() {
        let a = Tensor::ones::<f32>(Shape::new(vec![4]));
        let mut c = DiaMatrix::zeros(DiaPattern::new(4, 4, [0]).unwrap(), DType::F32).unwrap();
        let err = CpuBackend::new().densedense_to_dia(&mut c, &HostBlockDescriptor, &a, &a, Blend::default());
        assert!(matches!(err, Err(DiaError::Tensor(_))));
    }
}
