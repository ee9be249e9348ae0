//! CPU kernel implementations
//!
//! Each kernel solves one problem of a batch given its index; the launch
//! functions in `kernel.rs` fan those calls out over the batch. All element
//! access goes through raw column-major pointers: blocks of one problem may
//! sit inside the same allocation, so no slices are formed over them.

#![allow(unsafe_op_in_unsafe_fn)] // Kernels are already marked unsafe, inner unsafe is redundant

pub mod gemm;
pub mod laset;
pub mod trsm;

pub use gemm::gemm_problem;
pub use laset::laset_problem;
pub use trsm::trsm_small_problem;

use super::CpuClient;
use crate::dtype::Element;
use crate::ops::Transpose;

/// Run `f` for every problem index of a launch
///
/// With the `rayon` feature, problems are distributed over the rayon pool
/// in chunks of at least `client.rayon_min_len()`. Returns once all
/// problems are done.
pub(crate) fn for_each_problem<F>(client: &CpuClient, batch_count: usize, f: F)
where
    F: Fn(usize) + Send + Sync,
{
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;

        if batch_count > client.rayon_min_len() {
            (0..batch_count)
                .into_par_iter()
                .with_min_len(client.rayon_min_len())
                .for_each(f);
            return;
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = client;

    (0..batch_count).for_each(f);
}

/// Read element `(r, c)` of `op(X)` from column-major storage
#[inline]
pub(crate) unsafe fn load_op<T: Element>(
    x: *const T,
    ld: usize,
    trans: Transpose,
    r: usize,
    c: usize,
) -> T {
    match trans {
        Transpose::NoTrans => *x.add(r + c * ld),
        Transpose::Trans => *x.add(c + r * ld),
        Transpose::ConjTrans => (*x.add(c + r * ld)).conj(),
    }
}

/// `X := beta * X` over a `rows x cols` block; zero `beta` overwrites without reading
#[inline]
pub(crate) unsafe fn scale_block<T: Element>(
    x: *mut T,
    rows: usize,
    cols: usize,
    ld: usize,
    beta: T,
) {
    if beta == T::one() {
        return;
    }
    for j in 0..cols {
        let col = x.add(j * ld);
        for r in 0..rows {
            let p = col.add(r);
            *p = if beta.is_zero() { T::zero() } else { beta * *p };
        }
    }
}
