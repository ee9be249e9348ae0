//! Launch capture for queue introspection
//!
//! When capture is active, every kernel enqueued on a client is also
//! appended to a log as a [`LaunchRecord`]. The log shows how a recursive
//! routine decomposed its work: the number of launches, their order and
//! the block each one covered.

use crate::ops::{BatchExtent, Side};
use parking_lot::Mutex;

/// Kind of batched kernel a launch ran
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LaunchKind {
    /// Variable-size batched GEMM
    GemmVbatched,
    /// Variable-size batched small triangular solve
    TrsmSmallVbatched,
    /// Variable-size batched matrix fill
    LasetVbatched,
}

/// One recorded launch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRecord {
    /// Kernel that ran
    pub kind: LaunchKind,
    /// Side of the triangular operand (small solves only)
    pub side: Option<Side>,
    /// Number of problems in the batch
    pub batch_count: usize,
    /// Row offset of the written operand (C for GEMM, B for TRSM/LASET)
    pub out_row: usize,
    /// Column offset of the written operand
    pub out_col: usize,
    /// Row extent of the written block
    pub rows: BatchExtent,
    /// Column extent of the written block
    pub cols: BatchExtent,
    /// Inner (k) extent, GEMM only
    pub inner: Option<BatchExtent>,
}

/// Shared capture state of a launch queue
#[derive(Debug, Default)]
pub struct LaunchCapture {
    log: Mutex<Option<Vec<LaunchRecord>>>,
}

impl LaunchCapture {
    /// Start recording, discarding any previous unfinished capture
    pub fn begin(&self) {
        *self.log.lock() = Some(Vec::new());
    }

    /// Stop recording and return everything launched since `begin`
    ///
    /// Returns an empty list if capture was not active.
    pub fn end(&self) -> Vec<LaunchRecord> {
        self.log.lock().take().unwrap_or_default()
    }

    /// Whether a capture is in progress
    pub fn is_active(&self) -> bool {
        self.log.lock().is_some()
    }

    /// Append a record if capture is active
    ///
    /// The record is built lazily so that an idle queue pays nothing.
    pub fn record(&self, make: impl FnOnce() -> LaunchRecord) {
        if let Some(log) = self.log.lock().as_mut() {
            log.push(make());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LaunchRecord {
        LaunchRecord {
            kind: LaunchKind::LasetVbatched,
            side: None,
            batch_count: 1,
            out_row: 0,
            out_col: 0,
            rows: BatchExtent::new(4),
            cols: BatchExtent::new(4),
            inner: None,
        }
    }

    #[test]
    fn test_inactive_capture_drops_records() {
        let capture = LaunchCapture::default();
        capture.record(record);
        assert!(!capture.is_active());
        assert!(capture.end().is_empty());
    }

    #[test]
    fn test_capture_collects_in_order() {
        let capture = LaunchCapture::default();
        capture.begin();
        capture.record(record);
        capture.record(|| LaunchRecord {
            kind: LaunchKind::GemmVbatched,
            ..record()
        });

        let log = capture.end();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].kind, LaunchKind::LasetVbatched);
        assert_eq!(log[1].kind, LaunchKind::GemmVbatched);
        assert!(!capture.is_active());
    }
}
