//! Batches of device matrices
//!
//! [`DeviceMatrix`] owns one column-major matrix in device memory.
//! [`BatchPtrs`] and [`MatrixHandle`] are the non-owning, pointer-array
//! views the batched kernels consume.

mod buffer;
mod handle;

pub use buffer::DeviceMatrix;
pub use handle::{BatchPtrs, MatrixHandle};
