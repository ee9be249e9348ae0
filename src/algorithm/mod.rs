//! Batched dense linear-algebra algorithms
//!
//! Algorithms here are written once against the kernel interface in
//! [`crate::ops`] and run on any runtime whose client implements it. They
//! never allocate device memory and never synchronize: every step is a
//! launch enqueued on the caller's queue, in the order the math requires.

pub mod trsm;
