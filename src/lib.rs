//! # vblas
//!
//! **Variable-size batched dense linear algebra with a recursive batched
//! triangular solve.**
//!
//! vblas solves many independent triangular systems of *different* sizes in
//! one call. Every problem lives in its own column-major matrix; a batch is
//! an array of device pointers plus an array of leading dimensions, and the
//! solver works through sub-blocks of all of them at once by shifting a
//! shared (row, col) offset.
//!
//! ## How the Solve Works
//!
//! - The `(side, uplo, trans)` triple selects one of eight recursion shapes
//! - Each level splits the batch-wide largest dimension at a power of two
//! - One half is solved recursively, a batched GEMM folds it into the other
//!   half's right-hand sides, then the other half is solved
//! - Blocks at or below the queue's stop size go to a direct small solver
//!
//! All launches are enqueued on the caller's client in order; no hidden
//! global queue exists.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vblas::prelude::*;
//!
//! let client = CpuRuntime::default_client(&CpuRuntime::default_device());
//! let a = vec![DeviceMatrix::<CpuRuntime, f64>::from_col_major(&client, 2, 2, &[2.0, 1.0, 0.0, 4.0])?];
//! let mut b = vec![DeviceMatrix::<CpuRuntime, f64>::from_col_major(&client, 2, 1, &[2.0, 9.0])?];
//!
//! trsm_vbatched(
//!     &client, Side::Left, Uplo::Lower, Transpose::NoTrans, Diag::NonUnit,
//!     &[2], &[1], 1.0, &a, &mut b,
//! )?;
//! assert_eq!(b[0].to_host()?, vec![1.0, 2.0]);
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): problems of one launch run in parallel on the CPU

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithm;
pub mod batch;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::trsm::{TrsmPolicy, trsm, trsm_vbatched};
    pub use crate::batch::DeviceMatrix;
    pub use crate::dtype::{Complex64, Complex128, DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{BatchedBlasKernels, Diag, Side, Transpose, Uplo};
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
}

/// Default runtime
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
