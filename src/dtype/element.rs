//! Element trait for mapping Rust scalar types to DType

use super::DType;
use super::complex::{Complex64, Complex128};
use bytemuck::{Pod, Zeroable};
use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for scalar types the batched BLAS kernels operate on
///
/// Implemented for the four BLAS precisions: `f32` (s), `f64` (d),
/// [`Complex64`] (c) and [`Complex128`] (z).
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - kernels run data-parallel over the batch
/// - `Pod + Zeroable` - byte-level host/device transfers (bytemuck)
/// - `Add + Sub + Mul + Div + Neg` - field arithmetic (Output = Self)
pub trait Element:
    Copy
    + Clone
    + Debug
    + Display
    + Send
    + Sync
    + Pod
    + Zeroable
    + PartialEq
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Complex conjugate (identity for real types)
    fn conj(self) -> Self;

    /// Absolute value as f64 (|z| for complex types)
    fn magnitude(self) -> f64;

    /// Convert from f64 to this type
    ///
    /// For complex types this creates a real number (imaginary part = 0).
    fn from_f64(v: f64) -> Self;

    /// Exact comparison against zero
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

macro_rules! impl_real_element {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn magnitude(self) -> f64 {
                self.abs() as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    };
}

impl_real_element!(f32, DType::F32);
impl_real_element!(f64, DType::F64);

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex64;

    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn one() -> Self {
        Self::ONE
    }

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(self)
    }

    #[inline]
    fn magnitude(self) -> f64 {
        Complex64::magnitude(self) as f64
    }

    /// Creates a real complex number (im = 0)
    #[inline]
    fn from_f64(v: f64) -> Self {
        Self::from(v as f32)
    }
}

impl Element for Complex128 {
    const DTYPE: DType = DType::Complex128;

    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn one() -> Self {
        Self::ONE
    }

    #[inline]
    fn conj(self) -> Self {
        Complex128::conj(self)
    }

    #[inline]
    fn magnitude(self) -> f64 {
        Complex128::magnitude(self)
    }

    /// Creates a real complex number (im = 0)
    #[inline]
    fn from_f64(v: f64) -> Self {
        Self::from(v)
    }
}
