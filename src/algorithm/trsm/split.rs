//! Split-size selection for the recursive solve

use super::shape::Block;

/// Power-of-two block sizes tried in descending order
pub const SPLIT_LADDER: [usize; 11] = [2048, 1024, 512, 256, 128, 64, 32, 16, 8, 4, 2];

/// Largest ladder size strictly below `max_dim`, or 1
///
/// For `max_dim >= 2` the result is in `[1, max_dim - 1]`, so both halves
/// of a split are non-empty and the recursion always shrinks.
pub fn select_split(max_dim: usize) -> usize {
    SPLIT_LADDER
        .iter()
        .copied()
        .find(|&nb| max_dim > nb)
        .unwrap_or(1)
}

/// Sizes `(leading, trailing)` of a split of `max_dim`
///
/// The ladder size goes to `nb_block` and the remainder to the other block.
pub fn partition(max_dim: usize, nb_block: Block) -> (usize, usize) {
    let nb = select_split(max_dim);
    let rest = max_dim - nb;
    match nb_block {
        Block::Leading => (nb, rest),
        Block::Trailing => (rest, nb),
    }
}
