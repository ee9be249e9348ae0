//! Owned device matrices

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{Allocator, Runtime, RuntimeClient};
use std::fmt;
use std::marker::PhantomData;

/// A column-major matrix in device memory
///
/// Storage is `ld * cols` elements; element `(r, c)` lives at index
/// `r + c * ld`. Rows `rows..ld` of every column are padding that the
/// batched kernels never touch. The allocation is returned to the queue's
/// allocator on drop.
pub struct DeviceMatrix<R: Runtime, T: Element> {
    ptr: u64,
    rows: usize,
    cols: usize,
    ld: usize,
    allocator: R::Allocator,
    device: R::Device,
    _elem: PhantomData<T>,
}

impl<R: Runtime, T: Element> DeviceMatrix<R, T> {
    /// Allocate a zero-filled `rows x cols` matrix with leading dimension `ld`
    pub fn zeros(client: &R::Client, rows: usize, cols: usize, ld: usize) -> Result<Self> {
        validate_ld(rows, ld)?;
        let bytes = storage_len(ld, cols)
            .and_then(|len| len.checked_mul(size_of::<T>()))
            .ok_or(Error::OutOfMemory { size: usize::MAX })?;
        let ptr = client.allocator().allocate(bytes)?;
        Ok(Self {
            ptr,
            rows,
            cols,
            ld,
            allocator: client.allocator().clone(),
            device: client.device().clone(),
            _elem: PhantomData,
        })
    }

    /// Upload a column-major host matrix of `ld * cols` elements
    pub fn from_host(
        client: &R::Client,
        rows: usize,
        cols: usize,
        ld: usize,
        host: &[T],
    ) -> Result<Self> {
        validate_ld(rows, ld)?;
        if storage_len(ld, cols) != Some(host.len()) {
            return Err(Error::invalid_argument(
                "host",
                format!(
                    "expected ld * cols = {} * {} elements, got {}",
                    ld,
                    cols,
                    host.len()
                ),
            ));
        }
        let matrix = Self::zeros(client, rows, cols, ld)?;
        R::copy_to_device(bytemuck::cast_slice(host), matrix.ptr, &matrix.device)?;
        Ok(matrix)
    }

    /// Upload a tightly packed column-major host matrix (`ld = max(1, rows)`)
    pub fn from_col_major(
        client: &R::Client,
        rows: usize,
        cols: usize,
        host: &[T],
    ) -> Result<Self> {
        Self::from_host(client, rows, cols, rows.max(1), host)
    }

    /// Download the full storage, padding included
    pub fn to_host(&self) -> Result<Vec<T>> {
        let mut out = vec![T::zero(); self.ld * self.cols];
        R::copy_from_device(self.ptr, bytemuck::cast_slice_mut(&mut out), &self.device)?;
        Ok(out)
    }

    /// Download the logical `rows x cols` block, tightly packed column-major
    pub fn to_host_packed(&self) -> Result<Vec<T>> {
        let full = self.to_host()?;
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for c in 0..self.cols {
            out.extend_from_slice(&full[c * self.ld..c * self.ld + self.rows]);
        }
        Ok(out)
    }

    /// Device pointer to element (0, 0)
    #[inline]
    pub fn ptr(&self) -> u64 {
        self.ptr
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Leading dimension (column stride in elements)
    #[inline]
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Device holding the storage
    #[inline]
    pub fn device(&self) -> &R::Device {
        &self.device
    }

    /// Storage size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.ld * self.cols * size_of::<T>()
    }
}

impl<R: Runtime, T: Element> Drop for DeviceMatrix<R, T> {
    fn drop(&mut self) {
        self.allocator.deallocate(self.ptr, self.size_in_bytes());
    }
}

impl<R: Runtime, T: Element> fmt::Debug for DeviceMatrix<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceMatrix")
            .field("dtype", &T::DTYPE)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("ld", &self.ld)
            .field("ptr", &format_args!("{:#x}", self.ptr))
            .finish()
    }
}

fn validate_ld(rows: usize, ld: usize) -> Result<()> {
    if ld < rows.max(1) {
        return Err(Error::invalid_argument(
            "ld",
            format!("leading dimension {} < max(1, rows = {})", ld, rows),
        ));
    }
    Ok(())
}

fn storage_len(ld: usize, cols: usize) -> Option<usize> {
    ld.checked_mul(cols)
}
