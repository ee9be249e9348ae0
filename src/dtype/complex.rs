//! Complex number types for the `c` and `z` BLAS precisions
//!
//! `Complex64` (two f32) and `Complex128` (two f64) are `#[repr(C)]`,
//! bytemuck-compatible and stored interleaved (re, im, re, im...), which
//! is the layout every BLAS/LAPACK implementation and device runtime expects
//! for `cuFloatComplex` / `cuDoubleComplex`.
//!
//! # Arithmetic Operations
//!
//! - Multiplication: `(a+bi)(c+di) = (ac-bd) + (ad+bc)i`
//! - Division: `(a+bi)/(c+di) = (a+bi)*conj(c+di)/|c+di|²`
//!
//! Division by zero yields NaN components. The triangular solvers rely on
//! this: a singular diagonal entry poisons the affected solution column
//! instead of being reported.

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Generates a complex type over the given float type.
macro_rules! impl_complex {
    (
        $name:ident,
        $float:ty,
        $doc_bits:literal,
        $doc_float_bits:literal,
        $doc_blas_prefix:literal
    ) => {
        #[doc = concat!($doc_bits, "-bit complex number with ", $doc_float_bits, " real and imaginary parts")]
        ///
        #[doc = concat!("BLAS precision prefix: `", $doc_blas_prefix, "`.")]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part
            pub re: $float,
            /// Imaginary part
            pub im: $float,
        }

        impl $name {
            /// Zero complex number
            pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

            /// One (real unit)
            pub const ONE: Self = Self { re: 1.0, im: 0.0 };

            /// Imaginary unit i
            pub const I: Self = Self { re: 0.0, im: 1.0 };

            /// Create a new complex number
            #[inline]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// Magnitude (absolute value): |z| = sqrt(re² + im²)
            #[inline]
            pub fn magnitude(self) -> $float {
                self.re.hypot(self.im)
            }

            /// Squared magnitude: |z|² = re² + im²
            #[inline]
            pub fn magnitude_squared(self) -> $float {
                self.re * self.re + self.im * self.im
            }

            /// Complex conjugate: conj(a + bi) = a - bi
            #[inline]
            pub fn conj(self) -> Self {
                Self {
                    re: self.re,
                    im: -self.im,
                }
            }

            /// Reciprocal: 1/z = conj(z)/|z|²
            #[inline]
            pub fn recip(self) -> Self {
                let mag_sq = self.magnitude_squared();
                if mag_sq == 0.0 {
                    Self {
                        re: <$float>::INFINITY,
                        im: <$float>::INFINITY,
                    }
                } else {
                    Self {
                        re: self.re / mag_sq,
                        im: -self.im / mag_sq,
                    }
                }
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self {
                    re: self.re + rhs.re,
                    im: self.im + rhs.im,
                }
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    re: self.re - rhs.re,
                    im: self.im - rhs.im,
                }
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    re: self.re * rhs.re - self.im * rhs.im,
                    im: self.re * rhs.im + self.im * rhs.re,
                }
            }
        }

        impl Div for $name {
            type Output = Self;

            #[inline]
            fn div(self, rhs: Self) -> Self {
                let denom = rhs.magnitude_squared();
                if denom == 0.0 {
                    Self {
                        re: <$float>::NAN,
                        im: <$float>::NAN,
                    }
                } else {
                    Self {
                        re: (self.re * rhs.re + self.im * rhs.im) / denom,
                        im: (self.im * rhs.re - self.re * rhs.im) / denom,
                    }
                }
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self {
                    re: -self.re,
                    im: -self.im,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.im >= 0.0 {
                    write!(f, "{}+{}i", self.re, self.im)
                } else {
                    write!(f, "{}{}i", self.re, self.im)
                }
            }
        }

        impl From<$float> for $name {
            #[inline]
            fn from(re: $float) -> Self {
                Self { re, im: 0.0 }
            }
        }
    };
}

impl_complex!(Complex64, f32, "64", "f32", "c");
impl_complex!(Complex128, f64, "128", "f64", "z");
