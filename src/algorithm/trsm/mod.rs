//! Variable-size batched triangular solve (TRSM)
//!
//! - [`shape`] - the eight recursion shapes and their split rules
//! - [`split`] - the power-of-two split ladder
//! - [`policy`] - base-case threshold of the recursion
//! - [`core`](self::core) - the unchecked recursive solver over batch handles
//! - [`checked`] - validating entry points over owned device matrices

pub mod checked;
pub mod core;
pub mod policy;
pub mod shape;
pub mod split;

pub use checked::{trsm, trsm_vbatched};
pub use self::core::{TrsmVbatched, trsm_vbatched_core};
pub use policy::{STOP_NB_ENV, TrsmPolicy};
pub use shape::{Block, Shape, ShapeRule};
pub use split::{SPLIT_LADDER, partition, select_split};
