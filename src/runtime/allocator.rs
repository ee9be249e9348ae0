//! Memory allocator trait and default implementation
//!
//! Device matrices are allocated through the client's allocator so that a
//! queue can report how much device memory its batches currently hold.

use crate::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Memory allocator trait for runtime backends
pub trait Allocator: Clone + Send + Sync {
    /// Allocate memory of given size
    ///
    /// Returns a device pointer (u64) that can be used for operations.
    fn allocate(&self, size_bytes: usize) -> Result<u64>;

    /// Deallocate memory
    fn deallocate(&self, ptr: u64, size_bytes: usize);

    /// Get the total allocated bytes
    fn allocated_bytes(&self) -> usize {
        0 // Default: tracking not supported
    }
}

/// Default allocator that delegates to Runtime methods
///
/// Clones share one byte counter, so every clone of a client reports the
/// same outstanding total.
#[derive(Clone, Debug)]
pub struct DefaultAllocator<D> {
    device: D,
    allocate_fn: fn(usize, &D) -> Result<u64>,
    deallocate_fn: fn(u64, usize, &D),
    allocated: Arc<AtomicUsize>,
}

impl<D: Clone + Send + Sync> DefaultAllocator<D> {
    /// Create a new default allocator
    pub fn new(
        device: D,
        allocate_fn: fn(usize, &D) -> Result<u64>,
        deallocate_fn: fn(u64, usize, &D),
    ) -> Self {
        Self {
            device,
            allocate_fn,
            deallocate_fn,
            allocated: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the device this allocator is associated with
    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: Clone + Send + Sync> Allocator for DefaultAllocator<D> {
    fn allocate(&self, size_bytes: usize) -> Result<u64> {
        let ptr = (self.allocate_fn)(size_bytes, &self.device)?;
        self.allocated.fetch_add(size_bytes, Ordering::Relaxed);
        Ok(ptr)
    }

    fn deallocate(&self, ptr: u64, size_bytes: usize) {
        (self.deallocate_fn)(ptr, size_bytes, &self.device);
        self.allocated.fetch_sub(size_bytes, Ordering::Relaxed);
    }

    fn allocated_bytes(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}
