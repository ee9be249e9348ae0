//! Batched BLAS kernel interface

use super::params::{GemmVbatched, LasetVbatched, Side, TrsmSmallVbatched};
use crate::dtype::Element;
use crate::runtime::Runtime;

/// Batched kernels a backend queue provides
///
/// Each method enqueues one launch covering the whole batch. Launches on
/// one queue take effect in submission order. The methods are unchecked:
/// array lengths, leading dimensions and pointers are trusted, and
/// arithmetic faults such as a zero pivot surface as Inf/NaN in the output.
///
/// # Implementing for a New Backend
///
/// ```ignore
/// impl BatchedBlasKernels<CudaRuntime> for CudaClient {
///     fn trsm_stop_nb(&self, side: Side, max_m: usize, max_n: usize) -> usize {
///         self.trsm_policy().stop_nb(side, max_m, max_n)
///     }
///
///     unsafe fn gemm_vbatched<T: Element>(&self, params: &GemmVbatched<'_, CudaRuntime, T>) {
///         // upload nothing: params already carry device pointer arrays
///         launch_gemm_vbatched(self.stream(), params);
///     }
///     // ...
/// }
/// ```
pub trait BatchedBlasKernels<R: Runtime>: Send + Sync {
    /// Largest triangular block size the small solver handles directly
    ///
    /// The recursive solve stops splitting once the largest triangular
    /// dimension of the batch is at or below this value. Always at least 1.
    fn trsm_stop_nb(&self, side: Side, max_m: usize, max_n: usize) -> usize;

    /// Enqueue `C := alpha * op(A) * op(B) + beta * C` over the batch
    ///
    /// # Safety
    /// - `m`, `n`, `k` and the handles' arrays hold at least `batch_count` entries
    /// - every block addressed by [`GemmVbatched::problem_dims`] lies inside
    ///   its matrix's allocation
    /// - the C block of each problem does not overlap its A or B blocks
    unsafe fn gemm_vbatched<T: Element>(&self, params: &GemmVbatched<'_, R, T>);

    /// Enqueue a direct triangular solve of every problem's block
    ///
    /// # Safety
    /// - arrays hold at least `batch_count` entries
    /// - every block addressed by [`TrsmSmallVbatched::problem_dims`] lies
    ///   inside its matrix's allocation
    /// - A and B of a problem do not overlap
    unsafe fn trsm_small_vbatched<T: Element>(&self, params: &TrsmSmallVbatched<'_, R, T>);

    /// Enqueue a fill of every problem's block
    ///
    /// # Safety
    /// - arrays hold at least `batch_count` entries
    /// - every block addressed by [`LasetVbatched::problem_dims`] lies inside
    ///   its matrix's allocation
    unsafe fn laset_vbatched<T: Element>(&self, params: &LasetVbatched<'_, R, T>);
}
