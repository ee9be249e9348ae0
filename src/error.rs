//! Error types for vblas
//!
//! Only the checked entry points and buffer management report errors. The
//! unchecked batched kernels follow the dense-BLAS convention: a caller
//! contract violation is undefined, and a singular triangular system shows
//! up as Inf/NaN in the solution rather than as an error.

use thiserror::Error;

/// Result type alias using vblas's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vblas operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument to a batched BLAS routine
    ///
    /// `position` follows the BLAS convention of numbering the routine's
    /// arguments from 1, so callers porting from LAPACK-style `info` codes
    /// can map `-position` directly.
    #[error("{routine}: invalid argument '{arg}' (position {position}): {reason}")]
    BlasArgument {
        /// Routine that rejected the call
        routine: &'static str,
        /// The argument name
        arg: &'static str,
        /// 1-based argument position
        position: i32,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid argument to a buffer or client helper
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Device mismatch between operands
    #[error("Device mismatch: {arg} lives on a different device than the queue")]
    DeviceMismatch {
        /// The offending argument
        arg: &'static str,
    },
}

impl Error {
    /// Create a BLAS argument error
    pub fn blas_argument(
        routine: &'static str,
        arg: &'static str,
        position: i32,
        reason: impl Into<String>,
    ) -> Self {
        Self::BlasArgument {
            routine,
            arg,
            position,
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// BLAS-style `info` code: `-position` for BLAS argument errors, 0 otherwise
    pub fn info(&self) -> i32 {
        match self {
            Self::BlasArgument { position, .. } => -position,
            _ => 0,
        }
    }
}
