//! Variable-size batched GEMM kernel

use super::{load_op, scale_block};
use crate::dtype::Element;
use crate::ops::GemmVbatched;
use crate::runtime::Runtime;

/// `C := alpha * op(A) * op(B) + beta * C` for problem `i` of a launch
///
/// Problems whose local row or column count is zero are skipped. With an
/// empty inner dimension or a zero `alpha`, only the `beta` scaling of C is
/// applied and A and B are not read.
///
/// # Safety
/// See [`BatchedBlasKernels::gemm_vbatched`](crate::ops::BatchedBlasKernels::gemm_vbatched).
pub unsafe fn gemm_problem<R: Runtime, T: Element>(params: &GemmVbatched<'_, R, T>, i: usize) {
    let (m, n, k) = params.problem_dims(i);
    if m == 0 || n == 0 {
        return;
    }

    let c = params.c.ptr(i);
    let ldc = params.c.ld(i);
    if k == 0 || params.alpha.is_zero() {
        scale_block(c, m, n, ldc, params.beta);
        return;
    }

    let a = params.a.ptr(i) as *const T;
    let lda = params.a.ld(i);
    let b = params.b.ptr(i) as *const T;
    let ldb = params.b.ld(i);
    let (alpha, beta) = (params.alpha, params.beta);

    for j in 0..n {
        for r in 0..m {
            let mut acc = T::zero();
            for l in 0..k {
                acc = acc
                    + load_op(a, lda, params.trans_a, r, l) * load_op(b, ldb, params.trans_b, l, j);
            }
            let dst = c.add(r + j * ldc);
            *dst = if beta.is_zero() {
                alpha * acc
            } else {
                alpha * acc + beta * *dst
            };
        }
    }
}
