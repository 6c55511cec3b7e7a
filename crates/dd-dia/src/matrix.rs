use dd_tensor::{f16, CpuStorage, DType, Element, Layout, Shape, Tensor};

use crate::error::{DiaError, Result};
use crate::pattern::DiaPattern;

/// A matrix stored by diagonals.
///
/// Values live in one packed buffer of `pattern.len() * rows` elements. The
/// `k`-th diagonal occupies `k * rows .. (k + 1) * rows`, indexed by row, so
/// position `(i, i + d)` is at `k * rows + i`. Slots whose column falls outside
/// the matrix are padding and are never read.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaMatrix {
    pattern: DiaPattern,
    values: CpuStorage,
}

impl DiaMatrix {
    /// Create a matrix with every stored position set to zero.
    ///
    /// # Errors
    /// Returns an allocation error if the diagonal buffer cannot be reserved.
    pub fn zeros(pattern: DiaPattern, dtype: DType) -> Result<Self> {
        let n = pattern
            .len()
            .checked_mul(pattern.rows())
            .ok_or(DiaError::Allocation {
                requested: usize::MAX,
                what: "diagonal values",
            })?;
        let values = CpuStorage::try_zeros(dtype, n)?;
        Ok(DiaMatrix { pattern, values })
    }

    /// Copy the pattern positions of a dense `[rows, cols]` tensor.
    pub fn from_dense(pattern: DiaPattern, dense: &Tensor) -> Result<Self> {
        let dims = dense.matrix_dims()?;
        if dims != (pattern.rows(), pattern.cols()) {
            return Err(DiaError::OperandMismatch {
                op: "from_dense",
                expected: format!("[{}x{}]", pattern.rows(), pattern.cols()),
                got: dense.shape().to_string(),
            });
        }
        let mut m = Self::zeros(pattern, dense.dtype())?;
        match dense.dtype() {
            DType::F32 => m.copy_from_dense::<f32>(dense)?,
            DType::F64 => m.copy_from_dense::<f64>(dense)?,
            DType::F16 => m.copy_from_dense::<f16>(dense)?,
        }
        Ok(m)
    }

    fn copy_from_dense<T: Element>(&mut self, dense: &Tensor) -> Result<()> {
        let rows = self.pattern.rows();
        for k in 0..self.pattern.len() {
            let d = self.pattern.offsets()[k];
            for i in self.pattern.row_range(k) {
                let v = dense.get::<T>(i, (i as i64 + d) as usize)?;
                self.values.as_slice_mut::<T>()?[k * rows + i] = v;
            }
        }
        Ok(())
    }

    /// Expand into a dense row-major tensor with zeros off the pattern.
    pub fn to_dense(&self) -> Result<Tensor> {
        match self.dtype() {
            DType::F32 => self.to_dense_typed::<f32>(),
            DType::F64 => self.to_dense_typed::<f64>(),
            DType::F16 => self.to_dense_typed::<f16>(),
        }
    }

    fn to_dense_typed<T: Element>(&self) -> Result<Tensor> {
        let (rows, cols) = (self.pattern.rows(), self.pattern.cols());
        let mut data = vec![T::zero(); rows * cols];
        let values = self.values::<T>()?;
        for k in 0..self.pattern.len() {
            let d = self.pattern.offsets()[k];
            for i in self.pattern.row_range(k) {
                data[i * cols + (i as i64 + d) as usize] = values[k * rows + i];
            }
        }
        Ok(Tensor::from_vec(data, Shape::matrix(rows, cols), Layout::RowMajor)?)
    }

    pub fn pattern(&self) -> &DiaPattern {
        &self.pattern
    }

    pub fn rows(&self) -> usize {
        self.pattern.rows()
    }

    pub fn cols(&self) -> usize {
        self.pattern.cols()
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    /// Element `(i, j)`, or `None` if it is not on a stored diagonal.
    pub fn get<T: Element>(&self, i: usize, j: usize) -> Result<Option<T>> {
        match self.pattern.diagonal_at(i, j) {
            Some(k) => Ok(Some(self.values::<T>()?[k * self.rows() + i])),
            None => Ok(None),
        }
    }

    /// Overwrite element `(i, j)`.
    ///
    /// # Errors
    /// `NotStored` if `(i, j)` is not on a stored diagonal.
    pub fn set<T: Element>(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        let k = self
            .pattern
            .diagonal_at(i, j)
            .ok_or(DiaError::NotStored { row: i, col: j })?;
        let rows = self.rows();
        self.values_mut::<T>()?[k * rows + i] = value;
        Ok(())
    }

    /// In-bounds values of the `k`-th stored diagonal, top to bottom.
    pub fn diagonal<T: Element>(&self, k: usize) -> Result<&[T]> {
        let base = k * self.rows();
        let range = self.pattern.row_range(k);
        Ok(&self.values::<T>()?[base + range.start..base + range.end])
    }

    /// Mutable in-bounds values of the `k`-th stored diagonal.
    pub fn diagonal_mut<T: Element>(&mut self, k: usize) -> Result<&mut [T]> {
        let base = k * self.rows();
        let range = self.pattern.row_range(k);
        Ok(&mut self.values_mut::<T>()?[base + range.start..base + range.end])
    }

    /// Set every stored position to `value`.
    pub fn fill<T: Element>(&mut self, value: T) -> Result<()> {
        for k in 0..self.pattern.len() {
            self.diagonal_mut::<T>(k)?.fill(value);
        }
        Ok(())
    }

    /// The packed diagonal buffer, padding included.
    pub(crate) fn values<T: Element>(&self) -> Result<&[T]> {
        Ok(self.values.as_slice()?)
    }

    pub(crate) fn values_mut<T: Element>(&mut self) -> Result<&mut [T]> {
        Ok(self.values.as_slice_mut()?)
    }

    /// The pattern together with the mutable packed buffer.
    pub(crate) fn parts_mut<T: Element>(&mut self) -> Result<(&DiaPattern, &mut [T])> {
        Ok((&self.pattern, self.values.as_slice_mut()?))
    }
}
