//! Recursive variable-size batched triangular solve
//!
//! Each level splits the recursion axis of the batch (rows of B for the
//! left side, columns for the right side) into a leading and a trailing
//! block, solves the independent block, folds its contribution into the
//! other block's right-hand sides with one batched GEMM, then solves the
//! remaining block. Blocks at or below the queue's stop size go to the
//! small direct solver.
//!
//! ```text
//! left, op(A) lower            left, op(A) upper
//! [ A11  .  ] [X1]   [B1]      [ A11 A12 ] [X1]   [B1]
//! [ A21 A22 ] [X2] = [B2]      [  .  A22 ] [X2] = [B2]
//!   X1 first, B2 -= A21 X1       X2 first, B1 -= A12 X2
//! ```
//!
//! All blocks are addressed by shifting the shared (row, col) offset of the
//! A and B handles. Problems smaller than a block's offset clip to nothing
//! inside the kernels, which is what lets one batch-wide recursion serve
//! problems of different sizes.

use super::shape::{Block, Shape};
use super::split::partition;
use crate::batch::MatrixHandle;
use crate::dtype::Element;
use crate::ops::{
    BatchExtent, BatchedBlasKernels, Diag, GemmVbatched, Side, Transpose, TrsmSmallVbatched, Uplo,
};
use crate::runtime::Runtime;
use log::debug;

/// One variable-size batched triangular solve
///
/// Solves `op(A_i) X_i = alpha B_i` (left) or `X_i op(A_i) = alpha B_i`
/// (right) for every problem `i`, overwriting `B_i` with `X_i`. `B_i` is
/// `m[i] x n[i]`; `A_i` is `m[i] x m[i]` on the left and `n[i] x n[i]` on
/// the right.
pub struct TrsmVbatched<'a, R: Runtime, T: Element> {
    /// Side of the triangular factor
    pub side: Side,
    /// Referenced triangle of A
    pub uplo: Uplo,
    /// Operation on A
    pub trans: Transpose,
    /// Unit or non-unit diagonal
    pub diag: Diag,
    /// Rows of B per problem
    pub m: &'a [usize],
    /// Columns of B per problem
    pub n: &'a [usize],
    /// Right-hand side scale
    pub alpha: T,
    /// Triangular factors
    pub a: MatrixHandle<'a, R, T>,
    /// Right-hand sides, overwritten by the solutions
    pub b: MatrixHandle<'a, R, T>,
    /// Row bound: `max` must be at least every `m[i]`
    pub extent_m: BatchExtent,
    /// Column bound: `max` must be at least every `n[i]`
    pub extent_n: BatchExtent,
    /// Number of problems
    pub batch_count: usize,
}

/// Enqueue the recursive solve of a batch on `client`'s queue
///
/// The launches are only enqueued; results are visible after the queue is
/// synchronized. Nothing is validated: a zero pivot yields Inf/NaN in the
/// affected problem, and `alpha` must be non-zero because shapes that solve
/// the trailing block first rescale their update by `-1/alpha`.
///
/// # Safety
/// - `m`, `n` and both handles' arrays hold at least `batch_count` entries
/// - `extent_m.max >= m[i]` and `extent_n.max >= n[i]` for every problem
/// - every A and B block implied by the dimensions and handle offsets lies
///   inside its allocation, with `ldda[i] >= max(1, k_i)` and
///   `lddb[i] >= max(1, m[i])`
/// - A and B of a problem do not overlap
pub unsafe fn trsm_vbatched_core<R, C, T>(client: &C, params: &TrsmVbatched<'_, R, T>)
where
    R: Runtime,
    C: BatchedBlasKernels<R>,
    T: Element,
{
    let shape = Shape::classify(params.side, params.uplo, params.trans);
    let frame = Frame {
        alpha: params.alpha,
        a: params.a,
        b: params.b,
        extent_m: params.extent_m,
        extent_n: params.extent_n,
    };
    unsafe { solve(client, params, shape, &frame) }
}

/// Per-call state of the recursion: the block being solved and its scale
struct Frame<'a, R: Runtime, T: Element> {
    alpha: T,
    a: MatrixHandle<'a, R, T>,
    b: MatrixHandle<'a, R, T>,
    extent_m: BatchExtent,
    extent_n: BatchExtent,
}

impl<'a, R: Runtime, T: Element> Frame<'a, R, T> {
    fn axis(&self, side: Side) -> BatchExtent {
        match side {
            Side::Left => self.extent_m,
            Side::Right => self.extent_n,
        }
    }

    /// Sub-frame for the diagonal block `[offset, offset + size)` of the recursion axis
    fn block(&self, side: Side, offset: usize, size: usize, alpha: T) -> Self {
        let extent = BatchExtent::block(size);
        let a = self.a.sub(offset, offset);
        match side {
            Side::Left => Self {
                alpha,
                a,
                b: self.b.sub(offset, 0),
                extent_m: extent,
                extent_n: self.extent_n,
            },
            Side::Right => Self {
                alpha,
                a,
                b: self.b.sub(0, offset),
                extent_m: self.extent_m,
                extent_n: extent,
            },
        }
    }
}

unsafe fn solve<R, C, T>(
    client: &C,
    params: &TrsmVbatched<'_, R, T>,
    shape: Shape,
    frame: &Frame<'_, R, T>,
) where
    R: Runtime,
    C: BatchedBlasKernels<R>,
    T: Element,
{
    let side = params.side;
    let axis = frame.axis(side);
    let stop_nb = client.trsm_stop_nb(side, frame.extent_m.max, frame.extent_n.max);

    if axis.max <= stop_nb {
        let small = TrsmSmallVbatched {
            side,
            uplo: params.uplo,
            trans: params.trans,
            diag: params.diag,
            m: params.m,
            n: params.n,
            alpha: frame.alpha,
            a: frame.a,
            b: frame.b,
            extent_m: frame.extent_m,
            extent_n: frame.extent_n,
            batch_count: params.batch_count,
        };
        unsafe { client.trsm_small_vbatched(&small) };
        return;
    }

    let rule = shape.rule();
    let (lead, trail) = partition(axis.max, rule.nb_block);
    debug!(
        "trsm_vbatched {}: split {} into {} + {}, {:?} block first",
        shape, axis.max, lead, trail, rule.solved_first
    );

    // Once the first half is solved it already carries alpha. Solving the
    // leading block first leaves alpha to be applied to the unsolved
    // right-hand sides in the update; solving the trailing block first
    // divides it back out of the update and applies it in the second solve.
    let one = T::one();
    let (update_alpha, update_beta, second_alpha) = match rule.solved_first {
        Block::Leading => (-one, frame.alpha, one),
        Block::Trailing => (-(one / frame.alpha), one, frame.alpha),
    };
    let (first, second) = match rule.solved_first {
        Block::Leading => (
            frame.block(side, 0, lead, frame.alpha),
            frame.block(side, lead, trail, second_alpha),
        ),
        Block::Trailing => (
            frame.block(side, lead, trail, frame.alpha),
            frame.block(side, 0, lead, second_alpha),
        ),
    };
    let off_diag = match params.uplo {
        Uplo::Lower => frame.a.sub(lead, 0),
        Uplo::Upper => frame.a.sub(0, lead),
    };

    unsafe { solve(client, params, shape, &first) };

    let update = match side {
        // B_second := update_alpha * op(A_off) * X_first + update_beta * B_second
        Side::Left => GemmVbatched {
            trans_a: params.trans,
            trans_b: Transpose::NoTrans,
            m: params.m,
            n: params.n,
            k: params.m,
            alpha: update_alpha,
            a: off_diag,
            b: first.b,
            beta: update_beta,
            c: second.b,
            extent_m: second.extent_m,
            extent_n: frame.extent_n,
            extent_k: first.extent_m,
            batch_count: params.batch_count,
        },
        // B_second := update_alpha * X_first * op(A_off) + update_beta * B_second
        Side::Right => GemmVbatched {
            trans_a: Transpose::NoTrans,
            trans_b: params.trans,
            m: params.m,
            n: params.n,
            k: params.n,
            alpha: update_alpha,
            a: first.b,
            b: off_diag,
            beta: update_beta,
            c: second.b,
            extent_m: frame.extent_m,
            extent_n: second.extent_n,
            extent_k: first.extent_n,
            batch_count: params.batch_count,
        },
    };
    unsafe { client.gemm_vbatched(&update) };

    unsafe { solve(client, params, shape, &second) };
}
