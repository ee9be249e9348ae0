//! Small triangular solve kernel
//!
//! Direct substitution on one diagonal block per problem. The recursive
//! solver only hands this kernel blocks no larger than the queue's stop
//! size, so the quadratic inner loops stay cheap.

use super::{load_op, scale_block};
use crate::dtype::Element;
use crate::ops::{Diag, Side, TrsmSmallVbatched, Uplo};
use crate::runtime::Runtime;

/// Solve problem `i` of a small batched TRSM launch in place
///
/// B is first scaled by `alpha`, then overwritten by the solution of
/// `op(A) * X = B` (left) or `X * op(A) = B` (right). A zero pivot on a
/// non-unit diagonal produces Inf/NaN in the affected columns.
///
/// # Safety
/// See [`BatchedBlasKernels::trsm_small_vbatched`](crate::ops::BatchedBlasKernels::trsm_small_vbatched).
pub unsafe fn trsm_small_problem<R: Runtime, T: Element>(
    params: &TrsmSmallVbatched<'_, R, T>,
    i: usize,
) {
    let (rows, cols) = params.problem_dims(i);
    if rows == 0 || cols == 0 {
        return;
    }

    let a = params.a.ptr(i) as *const T;
    let lda = params.a.ld(i);
    let b = params.b.ptr(i);
    let ldb = params.b.ld(i);

    scale_block(b, rows, cols, ldb, params.alpha);
    if params.alpha.is_zero() {
        return;
    }

    let trans = params.trans;
    let unit = params.diag == Diag::Unit;
    // Triangle of op(A), which fixes the substitution direction
    let op_lower = (params.uplo == Uplo::Lower) != trans.is_transposed();

    match params.side {
        Side::Left => {
            let k = rows;
            for j in 0..cols {
                let x = b.add(j * ldb);
                if op_lower {
                    for r in 0..k {
                        let mut v = *x.add(r);
                        for l in 0..r {
                            v = v - load_op(a, lda, trans, r, l) * *x.add(l);
                        }
                        if !unit {
                            v = v / load_op(a, lda, trans, r, r);
                        }
                        *x.add(r) = v;
                    }
                } else {
                    for r in (0..k).rev() {
                        let mut v = *x.add(r);
                        for l in r + 1..k {
                            v = v - load_op(a, lda, trans, r, l) * *x.add(l);
                        }
                        if !unit {
                            v = v / load_op(a, lda, trans, r, r);
                        }
                        *x.add(r) = v;
                    }
                }
            }
        }
        Side::Right => {
            let k = cols;
            // Column j of X depends on the columns l with op(A)[l, j] != 0
            if op_lower {
                for j in (0..k).rev() {
                    solve_right_column(a, lda, params, b, ldb, rows, j, j + 1..k, unit);
                }
            } else {
                for j in 0..k {
                    solve_right_column(a, lda, params, b, ldb, rows, j, 0..j, unit);
                }
            }
        }
    }
}

/// `X[:, j] := (X[:, j] - sum_l X[:, l] * op(A)[l, j]) / op(A)[j, j]`
#[inline]
#[allow(clippy::too_many_arguments)]
unsafe fn solve_right_column<R: Runtime, T: Element>(
    a: *const T,
    lda: usize,
    params: &TrsmSmallVbatched<'_, R, T>,
    b: *mut T,
    ldb: usize,
    rows: usize,
    j: usize,
    solved: std::ops::Range<usize>,
    unit: bool,
) {
    let xj = b.add(j * ldb);
    for l in solved {
        let coef = load_op(a, lda, params.trans, l, j);
        if coef.is_zero() {
            continue;
        }
        let xl = b.add(l * ldb) as *const T;
        for r in 0..rows {
            *xj.add(r) = *xj.add(r) - *xl.add(r) * coef;
        }
    }
    if !unit {
        let pivot = load_op(a, lda, params.trans, j, j);
        for r in 0..rows {
            *xj.add(r) = *xj.add(r) / pivot;
        }
    }
}
