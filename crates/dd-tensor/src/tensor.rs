use crate::dtype::{DType, Element};
use crate::error::{Result, TensorError};
use crate::shape::{Layout, Shape};
use crate::storage::CpuStorage;

/// A dense tensor backed by CPU storage.
///
/// Holds contiguous data with an associated shape, dtype and memory layout.
/// The layout only matters for 2D tensors; higher ranks are always row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    storage: CpuStorage,
    shape: Shape,
    layout: Layout,
}

impl Tensor {
    /// Create a new row-major tensor from typed data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new<T: Element>(data: Vec<T>, shape: Shape) -> Self {
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {:?} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        Tensor {
            storage: CpuStorage::from_vec(data),
            shape,
            layout: Layout::RowMajor,
        }
    }

    /// Create a tensor from typed data laid out in `layout` order.
    pub fn from_vec<T: Element>(data: Vec<T>, shape: Shape, layout: Layout) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Tensor {
            storage: CpuStorage::from_vec(data),
            shape,
            layout,
        })
    }

    /// Create a `[rows, cols]` matrix whose element `(i, j)` is `f(i, j)`.
    pub fn from_fn<T, F>(rows: usize, cols: usize, layout: Layout, mut f: F) -> Self
    where
        T: Element,
        F: FnMut(usize, usize) -> T,
    {
        let mut data = vec![T::zero(); rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                data[layout.index(i, j, rows, cols)] = f(i, j);
            }
        }
        Tensor {
            storage: CpuStorage::from_vec(data),
            shape: Shape::matrix(rows, cols),
            layout,
        }
    }

    /// Create a zero-filled row-major tensor of the given dtype.
    ///
    /// # Errors
    /// Returns `TensorError::Allocation` if the buffer cannot be reserved.
    pub fn zeros(shape: Shape, dtype: DType) -> Result<Self> {
        let storage = CpuStorage::try_zeros(dtype, shape.numel())?;
        Ok(Tensor {
            storage,
            shape,
            layout: Layout::RowMajor,
        })
    }

    /// Create a row-major tensor filled with ones.
    pub fn ones<T: Element>(shape: Shape) -> Self {
        let n = shape.numel();
        Tensor::new(vec![T::from_f64(1.0); n], shape)
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Returns the tensor's memory layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns `(rows, cols)` of a 2D tensor.
    pub fn matrix_dims(&self) -> Result<(usize, usize)> {
        if self.shape.ndim() != 2 {
            return Err(TensorError::NotAMatrix {
                ndim: self.shape.ndim(),
            });
        }
        Ok((self.shape.dim(0), self.shape.dim(1)))
    }

    /// Returns the underlying data as a typed slice in storage order.
    pub fn data<T: Element>(&self) -> Result<&[T]> {
        self.storage.as_slice()
    }

    /// Read element `(i, j)` of a 2D tensor.
    pub fn get<T: Element>(&self, i: usize, j: usize) -> Result<T> {
        let (rows, cols) = self.matrix_dims()?;
        if i >= rows || j >= cols {
            return Err(TensorError::IndexOutOfBounds {
                row: i,
                col: j,
                rows,
                cols,
            });
        }
        Ok(self.data::<T>()?[self.layout.index(i, j, rows, cols)])
    }

    /// Returns a copy of this 2D tensor stored in `layout` order.
    pub fn to_layout(&self, layout: Layout) -> Result<Tensor> {
        let (rows, cols) = self.matrix_dims()?;
        if layout == self.layout {
            return Ok(self.clone());
        }
        let storage = match &self.storage {
            CpuStorage::F32(v) => CpuStorage::F32(relayout(v, rows, cols, self.layout, layout)),
            CpuStorage::F64(v) => CpuStorage::F64(relayout(v, rows, cols, self.layout, layout)),
            CpuStorage::F16(v) => CpuStorage::F16(relayout(v, rows, cols, self.layout, layout)),
        };
        Ok(Tensor {
            storage,
            shape: self.shape.clone(),
            layout,
        })
    }
}

fn relayout<T: Copy>(src: &[T], rows: usize, cols: usize, from: Layout, to: Layout) -> Vec<T> {
    let mut out = src.to_vec();
    for i in 0..rows {
        for j in 0..cols {
            out[to.index(i, j, rows, cols)] = src[from.index(i, j, rows, cols)];
        }
    }
    out
}
