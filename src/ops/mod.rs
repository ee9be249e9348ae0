//! Batched BLAS operations
//!
//! This module defines the parameter types and the kernel interface a
//! backend queue implements to run variable-size batched BLAS.
//!
//! # Design
//!
//! Kernels are defined as a trait implemented by the runtime's client, the
//! same object that owns the launch queue. Generic algorithms such as the
//! recursive triangular solve are written once against the trait and run on
//! any backend that implements it.
//!
//! ```text
//! RuntimeClient<R>
//!   └── implements BatchedBlasKernels<R>
//!         ├── gemm_vbatched        (variable-size batched GEMM)
//!         ├── trsm_small_vbatched  (direct solve of small triangular blocks)
//!         ├── laset_vbatched       (batched fill)
//!         └── trsm_stop_nb         (base-case threshold of the recursion)
//! ```
//!
//! # Variable-Size Launches
//!
//! Every launch carries per-problem dimension arrays plus a [`BatchExtent`]
//! per axis. Operand handles share one (row, col) offset across the batch,
//! so a problem smaller than the offset simply has nothing to do.

mod kernel;
mod params;

pub use kernel::BatchedBlasKernels;
pub use params::{
    BatchExtent, Diag, GemmVbatched, LasetVbatched, Side, Transpose, TrsmSmallVbatched, Uplo,
};
