use std::fmt;
use std::ops::{Add, Mul};

use half::f16;

use crate::error::{Result, TensorError};
use crate::storage::CpuStorage;

/// Supported data types for tensor storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// 16-bit floating point (IEEE 754 half-precision, via the `half` crate).
    F16,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
            DType::F16 => write!(f, "f16"),
        }
    }
}

/// A scalar type that can live in a `CpuStorage`.
///
/// `Acc` is the type inner products are accumulated in. Half precision
/// accumulates in `f32`; the other types accumulate in themselves.
pub trait Element: Copy + Send + Sync + PartialEq + fmt::Debug + 'static {
    /// The runtime tag for this element type.
    const DTYPE: DType;

    /// Accumulator used for sums of products.
    type Acc: Copy + Send + Sync + Add<Output = Self::Acc> + Mul<Output = Self::Acc>;

    fn zero() -> Self;
    fn from_f64(v: f64) -> Self;

    fn to_acc(self) -> Self::Acc;
    fn from_acc(acc: Self::Acc) -> Self;
    fn acc_zero() -> Self::Acc;
    fn acc_from_f64(v: f64) -> Self::Acc;

    /// Borrow typed data out of untyped storage.
    ///
    /// # Errors
    /// Returns `DTypeMismatch` if the storage holds a different dtype.
    fn slice(storage: &CpuStorage) -> Result<&[Self]>;

    /// Mutably borrow typed data out of untyped storage.
    ///
    /// # Errors
    /// Returns `DTypeMismatch` if the storage holds a different dtype.
    fn slice_mut(storage: &mut CpuStorage) -> Result<&mut [Self]>;

    /// Wrap a typed vector into untyped storage.
    fn into_storage(data: Vec<Self>) -> CpuStorage;
}

fn mismatch(expected: DType, got: DType) -> TensorError {
    TensorError::DTypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
    type Acc = f32;

    fn zero() -> Self {
        0.0
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
    fn to_acc(self) -> f32 {
        self
    }
    fn from_acc(acc: f32) -> Self {
        acc
    }
    fn acc_zero() -> f32 {
        0.0
    }
    fn acc_from_f64(v: f64) -> f32 {
        v as f32
    }

    fn slice(storage: &CpuStorage) -> Result<&[Self]> {
        match storage {
            CpuStorage::F32(v) => Ok(v.as_slice()),
            other => Err(mismatch(Self::DTYPE, other.dtype())),
        }
    }

    fn slice_mut(storage: &mut CpuStorage) -> Result<&mut [Self]> {
        match storage {
            CpuStorage::F32(v) => Ok(v.as_mut_slice()),
            other => Err(mismatch(Self::DTYPE, other.dtype())),
        }
    }

    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::F32(data)
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
    type Acc = f64;

    fn zero() -> Self {
        0.0
    }
    fn from_f64(v: f64) -> Self {
        v
    }
    fn to_acc(self) -> f64 {
        self
    }
    fn from_acc(acc: f64) -> Self {
        acc
    }
    fn acc_zero() -> f64 {
        0.0
    }
    fn acc_from_f64(v: f64) -> f64 {
        v
    }

    fn slice(storage: &CpuStorage) -> Result<&[Self]> {
        match storage {
            CpuStorage::F64(v) => Ok(v.as_slice()),
            other => Err(mismatch(Self::DTYPE, other.dtype())),
        }
    }

    fn slice_mut(storage: &mut CpuStorage) -> Result<&mut [Self]> {
        match storage {
            CpuStorage::F64(v) => Ok(v.as_mut_slice()),
            other => Err(mismatch(Self::DTYPE, other.dtype())),
        }
    }

    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::F64(data)
    }
}

impl Element for f16 {
    const DTYPE: DType = DType::F16;
    type Acc = f32;

    fn zero() -> Self {
        f16::ZERO
    }
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
    fn to_acc(self) -> f32 {
        self.to_f32()
    }
    fn from_acc(acc: f32) -> Self {
        f16::from_f32(acc)
    }
    fn acc_zero() -> f32 {
        0.0
    }
    fn acc_from_f64(v: f64) -> f32 {
        v as f32
    }

    fn slice(storage: &CpuStorage) -> Result<&[Self]> {
        match storage {
            CpuStorage::F16(v) => Ok(v.as_slice()),
            other => Err(mismatch(Self::DTYPE, other.dtype())),
        }
    }

    fn slice_mut(storage: &mut CpuStorage) -> Result<&mut [Self]> {
        match storage {
            CpuStorage::F16(v) => Ok(v.as_mut_slice()),
            other => Err(mismatch(Self::DTYPE, other.dtype())),
        }
    }

    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::F16(data)
    }
}
