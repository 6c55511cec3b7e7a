use half::f16;

use crate::dtype::{DType, Element};
use crate::error::{Result, TensorError};

/// CPU-side tensor storage, one contiguous buffer per dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum CpuStorage {
    /// 32-bit floating point storage.
    F32(Vec<f32>),
    /// 64-bit floating point storage.
    F64(Vec<f64>),
    /// 16-bit floating point storage.
    F16(Vec<f16>),
}

impl CpuStorage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        match self {
            CpuStorage::F32(v) => v.len(),
            CpuStorage::F64(v) => v.len(),
            CpuStorage::F16(v) => v.len(),
        }
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self {
            CpuStorage::F32(_) => DType::F32,
            CpuStorage::F64(_) => DType::F64,
            CpuStorage::F16(_) => DType::F16,
        }
    }

    /// Borrow the data as a typed slice.
    ///
    /// # Errors
    /// Returns an error if `T` does not match the stored dtype.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::slice(self)
    }

    /// Borrow the data as a mutable typed slice.
    ///
    /// # Errors
    /// Returns an error if `T` does not match the stored dtype.
    pub fn as_slice_mut<T: Element>(&mut self) -> Result<&mut [T]> {
        T::slice_mut(self)
    }

    /// Create zero-filled storage for the given dtype and element count.
    ///
    /// The buffer is reserved with `try_reserve_exact`, so an oversized
    /// request surfaces as `TensorError::Allocation` instead of aborting.
    pub fn try_zeros(dtype: DType, n: usize) -> Result<Self> {
        match dtype {
            DType::F32 => Ok(CpuStorage::F32(try_filled(n, 0.0f32)?)),
            DType::F64 => Ok(CpuStorage::F64(try_filled(n, 0.0f64)?)),
            DType::F16 => Ok(CpuStorage::F16(try_filled(n, f16::ZERO)?)),
        }
    }

    /// Create storage from a typed vector.
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        T::into_storage(data)
    }
}

/// Allocate a vector of `n` copies of `value`, reporting allocation failure.
pub fn try_filled<T: Clone>(n: usize, value: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|_| TensorError::Allocation { requested: n })?;
    v.resize(n, value);
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let s = CpuStorage::from_vec(vec![1.0f32, 2.0, 3.0]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(s.dtype(), DType::F32);
        assert_eq!(s.as_slice::<f32>().unwrap(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_zeros_each_dtype() {
        for dtype in [DType::F32, DType::F64, DType::F16] {
            let s = CpuStorage::try_zeros(dtype, 5).unwrap();
            assert_eq!(s.len(), 5);
            assert_eq!(s.dtype(), dtype);
        }
        let s = CpuStorage::try_zeros(DType::F64, 2).unwrap();
        assert_eq!(s.as_slice::<f64>().unwrap(), &[0.0; 2]);
    }

    #[test]
    fn test_try_filled_reports_allocation_failure() {
        let err = try_filled(usize::MAX, 0u64).unwrap_err();
        assert!(matches!(err, TensorError::Allocation { requested } if requested == usize::MAX));
    }

    #[test]
    fn test_wrong_dtype_slice() {
        let s = CpuStorage::from_vec(vec![1.0f64]);
        assert!(s.as_slice::<f32>().is_err());
    }

    #[test]
    fn test_mut_slice() {
        let mut s = CpuStorage::from_vec(vec![1.0f32, 2.0]);
        let slice = s.as_slice_mut::<f32>().unwrap();
        slice[0] = 42.0;
        assert_eq!(s.as_slice::<f32>().unwrap()[0], 42.0);
    }
}
