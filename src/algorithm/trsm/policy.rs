//! Base-case threshold policy of the recursive solve

use crate::ops::Side;
use log::{debug, warn};

/// Environment variable forcing a fixed base-case threshold
pub const STOP_NB_ENV: &str = "VBLAS_TRSM_STOP_NB";

/// When the recursive solve hands a block to the small solver
///
/// The threshold depends on the number of right-hand sides: with many of
/// them the GEMM updates do most of the work, so recursion goes deeper.
///
/// | right-hand sides | threshold |
/// |---|---|
/// | `<= mid_rhs` | `small_limit` |
/// | `<= wide_rhs` | `mid_stop` |
/// | more | `wide_stop` |
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrsmPolicy {
    /// Threshold for few right-hand sides
    pub small_limit: usize,
    /// Upper bound of the "few" band
    pub mid_rhs: usize,
    /// Upper bound of the "moderate" band
    pub wide_rhs: usize,
    /// Threshold for a moderate number of right-hand sides
    pub mid_stop: usize,
    /// Threshold for many right-hand sides
    pub wide_stop: usize,
    /// Overrides the table when set
    pub fixed: Option<usize>,
}

impl Default for TrsmPolicy {
    fn default() -> Self {
        Self {
            small_limit: 32,
            mid_rhs: 64,
            wide_rhs: 512,
            mid_stop: 16,
            wide_stop: 8,
            fixed: None,
        }
    }
}

impl TrsmPolicy {
    /// Policy with one threshold regardless of shape
    pub fn fixed(stop_nb: usize) -> Self {
        Self {
            fixed: Some(stop_nb.max(1)),
            ..Self::default()
        }
    }

    /// Default policy, or a fixed threshold from `VBLAS_TRSM_STOP_NB`
    ///
    /// Values that are not positive integers are ignored with a warning.
    pub fn from_env() -> Self {
        match std::env::var(STOP_NB_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(stop_nb) if stop_nb > 0 => {
                    debug!("{}={} overrides the TRSM base-case policy", STOP_NB_ENV, stop_nb);
                    Self::fixed(stop_nb)
                }
                _ => {
                    warn!(
                        "ignoring {}={:?}: expected a positive integer",
                        STOP_NB_ENV, raw
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Base-case threshold for a batch bounded by `max_m x max_n`
    ///
    /// Keys on the right-hand-side count: `max_n` for the left side,
    /// `max_m` for the right side. Never below 1.
    pub fn stop_nb(&self, side: Side, max_m: usize, max_n: usize) -> usize {
        if let Some(stop_nb) = self.fixed {
            return stop_nb.max(1);
        }
        let rhs = match side {
            Side::Left => max_n,
            Side::Right => max_m,
        };
        let stop_nb = if rhs <= self.mid_rhs {
            self.small_limit
        } else if rhs <= self.wide_rhs {
            self.mid_stop
        } else {
            self.wide_stop
        };
        stop_nb.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let policy = TrsmPolicy::default();
        assert_eq!(policy.stop_nb(Side::Left, 1000, 4), 32);
        assert_eq!(policy.stop_nb(Side::Left, 1000, 64), 32);
        assert_eq!(policy.stop_nb(Side::Left, 1000, 65), 16);
        assert_eq!(policy.stop_nb(Side::Left, 1000, 512), 16);
        assert_eq!(policy.stop_nb(Side::Left, 1000, 513), 8);
        assert_eq!(policy.stop_nb(Side::Right, 4, 1000), 32);
        assert_eq!(policy.stop_nb(Side::Right, 600, 1000), 8);
    }

    #[test]
    fn test_never_below_one() {
        let policy = TrsmPolicy {
            small_limit: 0,
            ..TrsmPolicy::default()
        };
        assert_eq!(policy.stop_nb(Side::Left, 10, 1), 1);
        assert_eq!(TrsmPolicy::fixed(0).stop_nb(Side::Right, 10, 10), 1);
    }

    #[test]
    fn test_fixed_overrides_table() {
        let policy = TrsmPolicy::fixed(4);
        assert_eq!(policy.stop_nb(Side::Left, 100, 1), 4);
        assert_eq!(policy.stop_nb(Side::Left, 100, 10_000), 4);
    }
}
