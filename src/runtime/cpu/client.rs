//! CPU client and allocator implementation

use super::device::CpuDevice;
use super::runtime::CpuRuntime;
use crate::algorithm::trsm::TrsmPolicy;
use crate::runtime::{DefaultAllocator, LaunchCapture, LaunchRecord, Runtime, RuntimeClient};
use std::sync::Arc;

/// Default minimum number of batch entries handed to one rayon task
const DEFAULT_RAYON_MIN_LEN: usize = 1;

/// CPU client: an ordered launch queue on the host
///
/// Launches execute eagerly on the calling thread, with the problems of a
/// single launch spread across rayon workers when the `rayon` feature is
/// enabled. Because a launch returns only after all of its problems are
/// done, submission order is execution order.
///
/// Clones share the same capture log and allocator byte counter, so a
/// cloned client behaves as another handle to the same queue.
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    allocator: CpuAllocator,
    capture: Arc<LaunchCapture>,
    rayon_min_len: usize,
    trsm_policy: TrsmPolicy,
}

impl CpuClient {
    /// Create a new CPU client
    ///
    /// The TRSM base-case policy is read from the environment, see
    /// [`TrsmPolicy::from_env`].
    pub fn new(device: CpuDevice) -> Self {
        let allocator = create_cpu_allocator(device.clone());
        Self {
            device,
            allocator,
            capture: Arc::new(LaunchCapture::default()),
            rayon_min_len: DEFAULT_RAYON_MIN_LEN,
            trsm_policy: TrsmPolicy::from_env(),
        }
    }

    /// Set the minimum number of batch entries per rayon task
    pub fn with_rayon_min_len(mut self, min_len: usize) -> Self {
        self.rayon_min_len = min_len.max(1);
        self
    }

    /// Replace the TRSM base-case policy
    pub fn with_trsm_policy(mut self, policy: TrsmPolicy) -> Self {
        self.trsm_policy = policy;
        self
    }

    /// Minimum number of batch entries per rayon task
    pub fn rayon_min_len(&self) -> usize {
        self.rayon_min_len
    }

    /// TRSM base-case policy of this queue
    pub fn trsm_policy(&self) -> &TrsmPolicy {
        &self.trsm_policy
    }

    /// Start recording every launch enqueued on this queue
    pub fn begin_capture(&self) {
        self.capture.begin();
    }

    /// Stop recording and return the launches since [`begin_capture`](Self::begin_capture)
    pub fn end_capture(&self) -> Vec<LaunchRecord> {
        self.capture.end()
    }

    pub(crate) fn record(&self, make: impl FnOnce() -> LaunchRecord) {
        self.capture.record(make);
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // Launches complete before they return, nothing to wait for
    }

    fn allocator(&self) -> &CpuAllocator {
        &self.allocator
    }
}

/// CPU-specific allocator type alias
pub type CpuAllocator = DefaultAllocator<CpuDevice>;

/// Create a CPU allocator for the given device
fn create_cpu_allocator(device: CpuDevice) -> CpuAllocator {
    DefaultAllocator::new(device, CpuRuntime::allocate, CpuRuntime::deallocate)
}
