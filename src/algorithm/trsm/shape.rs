//! Classification of a triangular solve into one of eight recursion shapes

use crate::ops::{Side, Transpose, Uplo};
use std::fmt;

/// One of the eight `(side, uplo, op)` combinations of a triangular solve
///
/// Transpose and conjugate-transpose share a shape: the conjugation is
/// applied to A inside the kernels and never changes the recursion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Shape {
    /// `op(A) X = B`, A lower, no transpose
    LeftLowerNoTrans = 0,
    /// `op(A) X = B`, A upper, no transpose
    LeftUpperNoTrans = 1,
    /// `op(A) X = B`, A lower, transposed
    LeftLowerTrans = 2,
    /// `op(A) X = B`, A upper, transposed
    LeftUpperTrans = 3,
    /// `X op(A) = B`, A lower, no transpose
    RightLowerNoTrans = 4,
    /// `X op(A) = B`, A upper, no transpose
    RightUpperNoTrans = 5,
    /// `X op(A) = B`, A lower, transposed
    RightLowerTrans = 6,
    /// `X op(A) = B`, A upper, transposed
    RightUpperTrans = 7,
}

/// A block of the recursion axis: the one at the current offset or the one after it
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Block {
    /// Block at the current offset
    Leading,
    /// Block following the leading one
    Trailing,
}

/// How one shape splits and orders its two half-solves
///
/// The triangle of `op(A)` fixes which half must be solved before the
/// other can be updated, and therefore which block gets the ladder size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeRule {
    /// Block that receives the split size from the ladder
    pub nb_block: Block,
    /// Block solved before the update
    pub solved_first: Block,
}

impl Shape {
    /// All shapes in index order
    pub const ALL: [Shape; 8] = [
        Shape::LeftLowerNoTrans,
        Shape::LeftUpperNoTrans,
        Shape::LeftLowerTrans,
        Shape::LeftUpperTrans,
        Shape::RightLowerNoTrans,
        Shape::RightUpperNoTrans,
        Shape::RightLowerTrans,
        Shape::RightUpperTrans,
    ];

    /// Map a `(side, uplo, trans)` triple to its shape
    pub const fn classify(side: Side, uplo: Uplo, trans: Transpose) -> Self {
        let transposed = trans.is_transposed();
        match (side, uplo, transposed) {
            (Side::Left, Uplo::Lower, false) => Shape::LeftLowerNoTrans,
            (Side::Left, Uplo::Upper, false) => Shape::LeftUpperNoTrans,
            (Side::Left, Uplo::Lower, true) => Shape::LeftLowerTrans,
            (Side::Left, Uplo::Upper, true) => Shape::LeftUpperTrans,
            (Side::Right, Uplo::Lower, false) => Shape::RightLowerNoTrans,
            (Side::Right, Uplo::Upper, false) => Shape::RightUpperNoTrans,
            (Side::Right, Uplo::Lower, true) => Shape::RightLowerTrans,
            (Side::Right, Uplo::Upper, true) => Shape::RightUpperTrans,
        }
    }

    /// Index of the shape, 0 through 7
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Side of the triangular factor
    pub const fn side(self) -> Side {
        if (self as u8) < 4 { Side::Left } else { Side::Right }
    }

    /// Referenced triangle of A
    pub const fn uplo(self) -> Uplo {
        if (self as u8) % 2 == 0 {
            Uplo::Lower
        } else {
            Uplo::Upper
        }
    }

    /// Whether A enters transposed
    pub const fn is_transposed(self) -> bool {
        matches!((self as u8) % 4, 2 | 3)
    }

    /// Split and ordering rule of this shape
    ///
    /// The first half solved is the one `op(A)`'s triangle makes
    /// independent: the leading block when the dependency runs forward
    /// through B, the trailing block when it runs backward. Which block
    /// receives the ladder size is fixed per shape.
    pub const fn rule(self) -> ShapeRule {
        use Block::{Leading, Trailing};
        let (nb_block, solved_first) = match self {
            Shape::LeftLowerNoTrans => (Trailing, Leading),
            Shape::LeftUpperNoTrans => (Leading, Trailing),
            Shape::LeftLowerTrans => (Trailing, Trailing),
            Shape::LeftUpperTrans => (Leading, Leading),
            Shape::RightLowerNoTrans => (Trailing, Trailing),
            Shape::RightUpperNoTrans => (Leading, Leading),
            Shape::RightLowerTrans => (Leading, Leading),
            Shape::RightUpperTrans => (Trailing, Trailing),
        };
        ShapeRule {
            nb_block,
            solved_first,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side() {
            Side::Left => 'l',
            Side::Right => 'r',
        };
        let trans = if self.is_transposed() { 'T' } else { 'N' };
        write!(f, "{}{}{}", side, trans, self.uplo().as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_covers_every_shape_once() {
        let mut seen = [false; 8];
        for side in [Side::Left, Side::Right] {
            for uplo in [Uplo::Lower, Uplo::Upper] {
                for trans in [Transpose::NoTrans, Transpose::Trans] {
                    let shape = Shape::classify(side, uplo, trans);
                    assert!(!seen[shape.index() as usize], "{} classified twice", shape);
                    seen[shape.index() as usize] = true;

                    assert_eq!(shape.side(), side);
                    assert_eq!(shape.uplo(), uplo);
                    assert_eq!(shape.is_transposed(), trans.is_transposed());
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_conj_trans_shares_trans_shape() {
        for side in [Side::Left, Side::Right] {
            for uplo in [Uplo::Lower, Uplo::Upper] {
                assert_eq!(
                    Shape::classify(side, uplo, Transpose::ConjTrans),
                    Shape::classify(side, uplo, Transpose::Trans)
                );
            }
        }
    }

    #[test]
    fn test_all_is_in_index_order() {
        for (i, shape) in Shape::ALL.iter().enumerate() {
            assert_eq!(shape.index() as usize, i);
        }
    }

    #[test]
    fn test_solved_first_follows_op_triangle() {
        // Forward dependency (op(A) lower on the left, upper on the right)
        // solves the leading block first
        for shape in Shape::ALL {
            let op_lower = (shape.uplo() == Uplo::Lower) != shape.is_transposed();
            let forward = match shape.side() {
                Side::Left => op_lower,
                Side::Right => !op_lower,
            };
            let expected = if forward {
                Block::Leading
            } else {
                Block::Trailing
            };
            assert_eq!(shape.rule().solved_first, expected, "{}", shape);
        }
    }

    #[test]
    fn test_display_codes() {
        assert_eq!(Shape::LeftLowerNoTrans.to_string(), "lNL");
        assert_eq!(Shape::RightUpperTrans.to_string(), "rTU");
    }
}
