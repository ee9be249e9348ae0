//! Runtime backends for batched kernel execution
//!
//! This module defines the `Runtime` trait and provides the CPU
//! implementation that executes the batched BLAS kernels.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies a specific accelerator/CPU)
//! ├── Client (one ordered launch queue on a device)
//! ├── Allocator (device memory management with byte tracking)
//! └── LaunchCapture (optional record of every enqueued launch)
//! ```
//!
//! # Queue Semantics
//!
//! A client is the explicit execution queue that every batched routine
//! takes as a parameter. Launches on one client execute in submission
//! order, which is the only ordering the recursive solvers rely on: an
//! update launch always completes before the next launch reads its output.
//! Nothing here is process-global; two clients are two independent queues
//! unless one was cloned from the other.

mod allocator;
pub mod capture;
pub mod cpu;

pub use allocator::{Allocator, DefaultAllocator};
pub use capture::{LaunchCapture, LaunchKind, LaunchRecord};

use crate::error::Result;

/// Core trait for compute backends
///
/// `Runtime` abstracts over different compute devices (CPU, GPU, etc.).
/// It uses static dispatch via generics for zero-cost abstraction.
///
/// # Example
///
/// ```ignore
/// let device = CpuRuntime::default_device();
/// let ptr = CpuRuntime::allocate(1024, &device)?;
/// // ... use memory ...
/// CpuRuntime::deallocate(ptr, 1024, &device);
/// ```
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client (launch queue) for dispatching kernels
    type Client: RuntimeClient<Self>;

    /// Memory allocator type
    type Allocator: Allocator;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Allocate device memory
    ///
    /// Returns a device pointer (u64) that can be used for operations.
    /// Zero-sized requests return the null pointer `0`.
    /// Returns `Err(OutOfMemory)` if allocation fails.
    fn allocate(size_bytes: usize, device: &Self::Device) -> Result<u64>;

    /// Deallocate device memory
    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device);

    /// Copy data from host to device
    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device) -> Result<()>;

    /// Copy data from device to host
    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device) -> Result<()>;

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}

/// Trait for runtime clients that own a launch queue
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Synchronize: wait for all launches enqueued so far to complete
    fn synchronize(&self);

    /// Get the allocator for this client
    fn allocator(&self) -> &R::Allocator;
}
