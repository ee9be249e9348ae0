//! Parameter types for the batched BLAS kernels

use crate::batch::MatrixHandle;
use crate::dtype::Element;
use crate::runtime::Runtime;
use std::fmt;

/// Which side of `X` the triangular matrix multiplies
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Solve `op(A) * X = alpha * B`
    Left,
    /// Solve `X * op(A) = alpha * B`
    Right,
}

/// Which triangle of `A` is referenced
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Uplo {
    /// Upper triangle
    Upper,
    /// Lower triangle
    Lower,
}

/// Operation applied to a matrix operand
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transpose {
    /// `op(A) = A`
    NoTrans,
    /// `op(A) = A^T`
    Trans,
    /// `op(A) = A^H`
    ConjTrans,
}

impl Transpose {
    /// True for `Trans` and `ConjTrans`
    #[inline]
    pub const fn is_transposed(self) -> bool {
        !matches!(self, Self::NoTrans)
    }
}

/// Whether the diagonal of `A` is implicitly one
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Diag {
    /// Diagonal entries are read from `A`
    NonUnit,
    /// Diagonal entries are taken as one and never read
    Unit,
}

macro_rules! impl_blas_char {
    ($ty:ty { $($variant:ident => $ch:literal),+ $(,)? }) => {
        impl $ty {
            /// Single-character BLAS code
            pub const fn as_char(self) -> char {
                match self {
                    $(Self::$variant => $ch,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_char())
            }
        }
    };
}

impl_blas_char!(Side { Left => 'L', Right => 'R' });
impl_blas_char!(Uplo { Upper => 'U', Lower => 'L' });
impl_blas_char!(Transpose { NoTrans => 'N', Trans => 'T', ConjTrans => 'C' });
impl_blas_char!(Diag { NonUnit => 'N', Unit => 'U' });

/// Launch bound along one axis of a batched launch
///
/// `max` is the largest extent any problem can have along the axis and
/// `spec` optionally fixes the block size covered by this launch. Per
/// problem, the extent actually processed is the remaining size past the
/// handle offset, capped by [`cap`](Self::cap).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BatchExtent {
    /// Upper bound over all problems
    pub max: usize,
    /// Fixed block size, if the launch covers only a block
    pub spec: Option<usize>,
}

impl BatchExtent {
    /// Unbounded-block extent: every problem is clipped only by `max`
    pub const fn new(max: usize) -> Self {
        Self { max, spec: None }
    }

    /// Extent covering exactly one block of `size`
    pub const fn block(size: usize) -> Self {
        Self {
            max: size,
            spec: Some(size),
        }
    }

    /// Effective cap: `min(max, spec)` if a block size is given
    #[inline]
    pub fn cap(&self) -> usize {
        match self.spec {
            Some(spec) => spec.min(self.max),
            None => self.max,
        }
    }

    /// Extent of one problem of size `total` past `offset`, capped
    ///
    /// Offsets at or beyond `total` yield 0, which marks the problem as
    /// having nothing to do in this launch.
    #[inline]
    pub fn clip(&self, total: usize, offset: usize) -> usize {
        total.saturating_sub(offset).min(self.cap())
    }
}

/// Variable-size batched GEMM: `C := alpha * op(A) * op(B) + beta * C`
///
/// For problem `i`, `m[i]`, `n[i]`, `k[i]` are the full problem sizes and
/// the handles locate the blocks used by this launch. When `beta` is zero,
/// `C` is overwritten without being read.
pub struct GemmVbatched<'a, R: Runtime, T: Element> {
    /// Operation on `A`
    pub trans_a: Transpose,
    /// Operation on `B`
    pub trans_b: Transpose,
    /// Rows of C per problem
    pub m: &'a [usize],
    /// Columns of C per problem
    pub n: &'a [usize],
    /// Inner dimension per problem
    pub k: &'a [usize],
    /// Scale of the product
    pub alpha: T,
    /// Left factor
    pub a: MatrixHandle<'a, R, T>,
    /// Right factor
    pub b: MatrixHandle<'a, R, T>,
    /// Scale of the existing C
    pub beta: T,
    /// Output
    pub c: MatrixHandle<'a, R, T>,
    /// Bound on rows of C
    pub extent_m: BatchExtent,
    /// Bound on columns of C
    pub extent_n: BatchExtent,
    /// Bound on the inner dimension
    pub extent_k: BatchExtent,
    /// Number of problems
    pub batch_count: usize,
}

impl<R: Runtime, T: Element> GemmVbatched<'_, R, T> {
    /// Local `(rows, cols, inner)` processed for problem `i`
    ///
    /// Each dimension is the problem size minus the largest offset any
    /// operand applies along it, capped by the launch extent.
    pub fn problem_dims(&self, i: usize) -> (usize, usize, usize) {
        let (a_row, a_col) = op_offsets(self.trans_a, &self.a);
        let (b_row, b_col) = op_offsets(self.trans_b, &self.b);

        let rows = self.extent_m.clip(self.m[i], a_row.max(self.c.row()));
        let cols = self.extent_n.clip(self.n[i], b_col.max(self.c.col()));
        let inner = self.extent_k.clip(self.k[i], a_col.max(b_row));
        (rows, cols, inner)
    }
}

/// Variable-size batched triangular solve for small blocks
///
/// Solves `op(A) * X = alpha * B` (left) or `X * op(A) = alpha * B`
/// (right) in place of `B` for every problem, by direct substitution.
pub struct TrsmSmallVbatched<'a, R: Runtime, T: Element> {
    /// Side of the triangular factor
    pub side: Side,
    /// Referenced triangle
    pub uplo: Uplo,
    /// Operation on `A`
    pub trans: Transpose,
    /// Unit or non-unit diagonal
    pub diag: Diag,
    /// Rows of B per problem
    pub m: &'a [usize],
    /// Columns of B per problem
    pub n: &'a [usize],
    /// Right-hand side scale
    pub alpha: T,
    /// Triangular factor, at the diagonal block
    pub a: MatrixHandle<'a, R, T>,
    /// Right-hand sides, overwritten by the solution
    pub b: MatrixHandle<'a, R, T>,
    /// Bound on rows of B
    pub extent_m: BatchExtent,
    /// Bound on columns of B
    pub extent_n: BatchExtent,
    /// Number of problems
    pub batch_count: usize,
}

impl<R: Runtime, T: Element> TrsmSmallVbatched<'_, R, T> {
    /// Local `(rows, cols)` of B solved for problem `i`
    ///
    /// The triangular axis is clipped past the furthest of the A and B
    /// offsets along it, so a diagonal block that starts beyond a smaller
    /// problem leaves that problem untouched.
    pub fn problem_dims(&self, i: usize) -> (usize, usize) {
        let diag_off = self.a.row().max(self.a.col());
        match self.side {
            Side::Left => (
                self.extent_m.clip(self.m[i], diag_off.max(self.b.row())),
                self.extent_n.clip(self.n[i], self.b.col()),
            ),
            Side::Right => (
                self.extent_m.clip(self.m[i], self.b.row()),
                self.extent_n.clip(self.n[i], diag_off.max(self.b.col())),
            ),
        }
    }
}

/// Variable-size batched fill: off-diagonal entries to `offdiag`, diagonal to `diag`
pub struct LasetVbatched<'a, R: Runtime, T: Element> {
    /// Rows per problem
    pub m: &'a [usize],
    /// Columns per problem
    pub n: &'a [usize],
    /// Value of off-diagonal entries
    pub offdiag: T,
    /// Value of diagonal entries
    pub diag: T,
    /// Target matrices
    pub a: MatrixHandle<'a, R, T>,
    /// Bound on rows
    pub extent_m: BatchExtent,
    /// Bound on columns
    pub extent_n: BatchExtent,
    /// Number of problems
    pub batch_count: usize,
}

impl<R: Runtime, T: Element> LasetVbatched<'_, R, T> {
    /// Local `(rows, cols)` filled for problem `i`
    pub fn problem_dims(&self, i: usize) -> (usize, usize) {
        (
            self.extent_m.clip(self.m[i], self.a.row()),
            self.extent_n.clip(self.n[i], self.a.col()),
        )
    }
}

/// Row and column offsets of `op(X)` given the handle offsets of `X`
#[inline]
fn op_offsets<R: Runtime, T: Element>(
    trans: Transpose,
    x: &MatrixHandle<'_, R, T>,
) -> (usize, usize) {
    if trans.is_transposed() {
        (x.col(), x.row())
    } else {
        (x.row(), x.col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchPtrs;
    use crate::runtime::cpu::CpuRuntime;

    #[test]
    fn test_extent_clip() {
        let e = BatchExtent {
            max: 10,
            spec: Some(4),
        };
        assert_eq!(e.cap(), 4);
        assert_eq!(e.clip(9, 3), 4);
        assert_eq!(e.clip(5, 3), 2);
        assert_eq!(e.clip(2, 3), 0);
        assert_eq!(BatchExtent::new(6).clip(9, 0), 6);
    }

    #[test]
    fn test_blas_chars() {
        assert_eq!(Side::Right.to_string(), "R");
        assert_eq!(Transpose::ConjTrans.as_char(), 'C');
        assert_eq!(Diag::Unit.as_char(), 'U');
        assert!(Transpose::Trans.is_transposed());
        assert!(!Transpose::NoTrans.is_transposed());
    }

    #[test]
    fn test_gemm_dims_follow_transposed_offsets() {
        let ptrs = [0x1000u64];
        let ld = [16usize];
        let batch = BatchPtrs::<CpuRuntime, f64>::new(&ptrs, &ld);
        let m = [12usize];
        let n = [3usize];
        let k = [12usize];

        // Leading rows [0, 5) updated from trailing rows [5, 12) through A21^T
        let params = GemmVbatched {
            trans_a: Transpose::Trans,
            trans_b: Transpose::NoTrans,
            m: &m,
            n: &n,
            k: &k,
            alpha: -1.0,
            a: batch.handle().sub(5, 0),
            b: batch.handle().sub(5, 0),
            beta: 1.0,
            c: batch.handle(),
            extent_m: BatchExtent::block(5),
            extent_n: BatchExtent::new(3),
            extent_k: BatchExtent::block(11),
            batch_count: 1,
        };
        assert_eq!(params.problem_dims(0), (5, 3, 7));
    }

    #[test]
    fn test_small_trsm_dims_skip_problems_past_the_block() {
        let ptrs = [0x1000u64, 0x2000];
        let ld = [8usize, 8];
        let batch = BatchPtrs::<CpuRuntime, f64>::new(&ptrs, &ld);
        let m = [8usize, 3];
        let n = [2usize, 2];

        let params = TrsmSmallVbatched {
            side: Side::Left,
            uplo: Uplo::Lower,
            trans: Transpose::NoTrans,
            diag: Diag::NonUnit,
            m: &m,
            n: &n,
            alpha: 1.0,
            a: batch.handle().sub(4, 4),
            b: batch.handle().sub(4, 0),
            extent_m: BatchExtent::block(4),
            extent_n: BatchExtent::new(2),
            batch_count: 2,
        };
        assert_eq!(params.problem_dims(0), (4, 2));
        assert_eq!(params.problem_dims(1).0, 0);
    }
}
