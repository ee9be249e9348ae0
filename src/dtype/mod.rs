//! Data type system for batched matrices
//!
//! This module provides the `DType` enum naming the four BLAS precisions,
//! along with the [`Element`] trait that maps Rust scalar types onto it.

pub mod complex;
mod element;

pub use complex::{Complex64, Complex128};
pub use element::Element;

use std::fmt;

/// Element types supported by the batched kernels
///
/// # Discriminant Values (Serialization Stability)
///
/// The discriminant values match the numbering used by the rest of the
/// dense layer and are never changed:
/// - Floats: F64=0, F32=1
/// - Complex: Complex64=40, Complex128=41
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point (BLAS `d`)
    F64 = 0,
    /// 32-bit floating point (BLAS `s`)
    F32 = 1,
    /// 64-bit complex, two f32 (BLAS `c`)
    Complex64 = 40,
    /// 128-bit complex, two f64 (BLAS `z`)
    Complex128 = 41,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::Complex128 => 16,
            Self::F64 | Self::Complex64 => 8,
            Self::F32 => 4,
        }
    }

    /// Returns true if this is a complex type
    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    /// BLAS precision prefix (`s`, `d`, `c`, `z`)
    #[inline]
    pub const fn blas_prefix(self) -> char {
        match self {
            Self::F32 => 's',
            Self::F64 => 'd',
            Self::Complex64 => 'c',
            Self::Complex128 => 'z',
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_match_rust_types() {
        assert_eq!(DType::F32.size_in_bytes(), size_of::<f32>());
        assert_eq!(DType::F64.size_in_bytes(), size_of::<f64>());
        assert_eq!(DType::Complex64.size_in_bytes(), size_of::<Complex64>());
        assert_eq!(DType::Complex128.size_in_bytes(), size_of::<Complex128>());
    }

    #[test]
    fn test_blas_prefix() {
        assert_eq!(DType::Complex128.blas_prefix(), 'z');
        assert_eq!(DType::F32.blas_prefix(), 's');
        assert!(DType::Complex64.is_complex());
        assert!(!DType::F64.is_complex());
    }
}
