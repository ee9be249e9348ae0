//! CPU runtime implementation
//!
//! The CPU runtime uses standard heap allocation and provides the reference
//! implementation of the batched BLAS kernels.
//!
//! # Batched Launches
//!
//! Every kernel launch covers a whole batch. Problems are independent, so
//! with the `rayon` feature each launch fans its problems out across the
//! rayon pool and joins before returning. Within one problem the kernels are
//! plain column-major loops over raw device pointers.

mod client;
mod device;
mod kernel;
pub(crate) mod kernels;
mod runtime;

pub use client::{CpuAllocator, CpuClient};
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
