//! Non-owning views of a batch of device matrices
//!
//! A batch is described by two parallel arrays: the base device pointer of
//! every matrix and its leading dimension. A [`MatrixHandle`] adds a shared
//! (row, col) offset so one value addresses the same sub-block of every
//! matrix in the batch. Sub-block handles are cheap to derive and never
//! copy or mutate the arrays they point into.

use crate::dtype::Element;
use crate::runtime::Runtime;
use std::fmt;
use std::marker::PhantomData;

/// Borrowed pointer and leading-dimension arrays of one batch
///
/// Entry `i` addresses a column-major matrix whose element `(r, c)` lives at
/// `ptrs[i] + (r + c * ld[i]) * size_of::<T>()`.
pub struct BatchPtrs<'a, R: Runtime, T: Element> {
    ptrs: &'a [u64],
    ld: &'a [usize],
    _marker: PhantomData<(R, T)>,
}

impl<'a, R: Runtime, T: Element> BatchPtrs<'a, R, T> {
    /// Create a batch view from parallel pointer and leading-dimension arrays
    ///
    /// # Panics
    /// Panics if the two arrays differ in length.
    pub fn new(ptrs: &'a [u64], ld: &'a [usize]) -> Self {
        assert_eq!(
            ptrs.len(),
            ld.len(),
            "pointer and leading-dimension arrays must be parallel"
        );
        Self {
            ptrs,
            ld,
            _marker: PhantomData,
        }
    }

    /// Number of matrices in the batch
    #[inline]
    pub fn len(&self) -> usize {
        self.ptrs.len()
    }

    /// Whether the batch is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ptrs.is_empty()
    }

    /// Base device pointer of matrix `i`
    #[inline]
    pub fn ptr(&self, i: usize) -> u64 {
        self.ptrs[i]
    }

    /// Leading dimension of matrix `i`
    #[inline]
    pub fn ld(&self, i: usize) -> usize {
        self.ld[i]
    }

    /// Handle on the top-left corner of every matrix
    #[inline]
    pub fn handle(&self) -> MatrixHandle<'a, R, T> {
        MatrixHandle {
            batch: *self,
            row: 0,
            col: 0,
        }
    }
}

impl<R: Runtime, T: Element> Clone for BatchPtrs<'_, R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Runtime, T: Element> Copy for BatchPtrs<'_, R, T> {}

impl<R: Runtime, T: Element> fmt::Debug for BatchPtrs<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchPtrs")
            .field("len", &self.ptrs.len())
            .field("ld", &self.ld)
            .finish()
    }
}

/// A batch of matrices viewed at a shared (row, col) offset
pub struct MatrixHandle<'a, R: Runtime, T: Element> {
    batch: BatchPtrs<'a, R, T>,
    row: usize,
    col: usize,
}

impl<'a, R: Runtime, T: Element> MatrixHandle<'a, R, T> {
    /// Handle on the sub-block starting `drow` rows and `dcol` columns further in
    #[inline]
    pub fn sub(&self, drow: usize, dcol: usize) -> Self {
        Self {
            batch: self.batch,
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Row offset shared by every matrix
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column offset shared by every matrix
    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// Leading dimension of matrix `i`
    #[inline]
    pub fn ld(&self, i: usize) -> usize {
        self.batch.ld(i)
    }

    /// Element offset of this handle's corner inside matrix `i`
    #[inline]
    pub fn offset(&self, i: usize) -> usize {
        self.row + self.col * self.batch.ld(i)
    }

    /// Pointer to this handle's corner inside matrix `i`
    ///
    /// # Safety
    /// The corner must lie inside the allocation of matrix `i`, and the
    /// pointer must only be used while that allocation is alive.
    #[inline]
    pub unsafe fn ptr(&self, i: usize) -> *mut T {
        let base = self.batch.ptr(i) as usize as *mut T;
        unsafe { base.add(self.offset(i)) }
    }
}

impl<R: Runtime, T: Element> Clone for MatrixHandle<'_, R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Runtime, T: Element> Copy for MatrixHandle<'_, R, T> {}

impl<R: Runtime, T: Element> fmt::Debug for MatrixHandle<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixHandle")
            .field("row", &self.row)
            .field("col", &self.col)
            .field("batch", &self.batch)
            .finish()
    }
}
