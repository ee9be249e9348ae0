//! Variable-size batched fill kernel

use crate::dtype::Element;
use crate::ops::LasetVbatched;
use crate::runtime::Runtime;

/// Fill problem `i`'s block: `diag` on the diagonal, `offdiag` elsewhere
///
/// # Safety
/// See [`BatchedBlasKernels::laset_vbatched`](crate::ops::BatchedBlasKernels::laset_vbatched).
pub unsafe fn laset_problem<R: Runtime, T: Element>(params: &LasetVbatched<'_, R, T>, i: usize) {
    let (rows, cols) = params.problem_dims(i);
    if rows == 0 || cols == 0 {
        return;
    }

    let a = params.a.ptr(i);
    let lda = params.a.ld(i);
    for j in 0..cols {
        for r in 0..rows {
            *a.add(r + j * lda) = if r == j { params.diag } else { params.offdiag };
        }
    }
}
