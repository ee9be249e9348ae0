//! Validating entry points over owned device matrices

use super::core::{TrsmVbatched, trsm_vbatched_core};
use crate::batch::{BatchPtrs, DeviceMatrix};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::ops::{BatchExtent, BatchedBlasKernels, Diag, LasetVbatched, Side, Transpose, Uplo};
use crate::runtime::{Device, Runtime, RuntimeClient};
use log::debug;

const ROUTINE: &str = "trsm_vbatched";

// BLAS argument positions of the batched routine
const POS_M: i32 = 5;
const POS_N: i32 = 6;
const POS_A: i32 = 8;
const POS_LDDA: i32 = 9;
const POS_B: i32 = 10;
const POS_LDDB: i32 = 11;
const POS_BATCH: i32 = 12;

/// Variable-size batched triangular solve with argument checking
///
/// Solves `op(A_i) X_i = alpha B_i` (left) or `X_i op(A_i) = alpha B_i`
/// (right) for every problem, overwriting the leading `m[i] x n[i]` block
/// of `b[i]`. Only the leading `k_i x k_i` block of `a[i]` is read, with
/// `k_i = m[i]` on the left and `n[i]` on the right.
///
/// Arguments are validated before anything is enqueued; a rejected call
/// leaves every matrix untouched and reports the failing argument with its
/// BLAS position. An empty batch is a no-op, and `alpha == 0` sets every
/// B block to zero without reading A.
///
/// # Example
///
/// ```ignore
/// let client = CpuRuntime::default_client(&CpuRuntime::default_device());
/// trsm_vbatched(
///     &client, Side::Left, Uplo::Lower, Transpose::NoTrans, Diag::NonUnit,
///     &[3, 5], &[2, 2], 1.0, &a, &mut b,
/// )?;
/// ```
#[allow(clippy::too_many_arguments)]
pub fn trsm_vbatched<R, T>(
    client: &R::Client,
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: &[usize],
    n: &[usize],
    alpha: T,
    a: &[DeviceMatrix<R, T>],
    b: &mut [DeviceMatrix<R, T>],
) -> Result<()>
where
    R: Runtime,
    R::Client: BatchedBlasKernels<R>,
    T: Element,
{
    let batch_count = b.len();
    validate(client, side, m, n, a, b)?;

    let max_m = m.iter().copied().max().unwrap_or(0);
    let max_n = n.iter().copied().max().unwrap_or(0);
    if batch_count == 0 || max_m == 0 || max_n == 0 {
        return Ok(());
    }

    let a_ptrs: Vec<u64> = a.iter().map(DeviceMatrix::ptr).collect();
    let a_ld: Vec<usize> = a.iter().map(DeviceMatrix::ld).collect();
    let b_ptrs: Vec<u64> = b.iter().map(DeviceMatrix::ptr).collect();
    let b_ld: Vec<usize> = b.iter().map(DeviceMatrix::ld).collect();
    let a_batch = BatchPtrs::<R, T>::new(&a_ptrs, &a_ld);
    let b_batch = BatchPtrs::<R, T>::new(&b_ptrs, &b_ld);

    debug!(
        "{}{} {}{}{}{} batch={} max_m={} max_n={}",
        T::DTYPE.blas_prefix(),
        ROUTINE,
        side,
        uplo,
        trans,
        diag,
        batch_count,
        max_m,
        max_n
    );

    if alpha.is_zero() {
        let fill = LasetVbatched {
            m,
            n,
            offdiag: T::zero(),
            diag: T::zero(),
            a: b_batch.handle(),
            extent_m: BatchExtent::new(max_m),
            extent_n: BatchExtent::new(max_n),
            batch_count,
        };
        // SAFETY: every B block was checked to fit its allocation, and `b` is
        // borrowed mutably for the duration of the launch
        unsafe { client.laset_vbatched(&fill) };
        return Ok(());
    }

    let params = TrsmVbatched {
        side,
        uplo,
        trans,
        diag,
        m,
        n,
        alpha,
        a: a_batch.handle(),
        b: b_batch.handle(),
        extent_m: BatchExtent::new(max_m),
        extent_n: BatchExtent::new(max_n),
        batch_count,
    };
    // SAFETY: dimensions, leading dimensions and devices were validated
    // above; A and B are distinct allocations and `b` is exclusively borrowed
    unsafe { trsm_vbatched_core(client, &params) };
    Ok(())
}

/// Triangular solve of a single matrix: a batch of one
///
/// B is `b.rows() x b.cols()`; see [`trsm_vbatched`] for the semantics.
#[allow(clippy::too_many_arguments)]
pub fn trsm<R, T>(
    client: &R::Client,
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    alpha: T,
    a: &DeviceMatrix<R, T>,
    b: &mut DeviceMatrix<R, T>,
) -> Result<()>
where
    R: Runtime,
    R::Client: BatchedBlasKernels<R>,
    T: Element,
{
    let m = [b.rows()];
    let n = [b.cols()];
    trsm_vbatched(
        client,
        side,
        uplo,
        trans,
        diag,
        &m,
        &n,
        alpha,
        std::slice::from_ref(a),
        std::slice::from_mut(b),
    )
}

fn validate<R: Runtime, T: Element>(
    client: &R::Client,
    side: Side,
    m: &[usize],
    n: &[usize],
    a: &[DeviceMatrix<R, T>],
    b: &[DeviceMatrix<R, T>],
) -> Result<()> {
    let batch_count = b.len();
    if a.len() != batch_count {
        return Err(Error::blas_argument(
            ROUTINE,
            "batchCount",
            POS_BATCH,
            format!("{} A matrices for {} B matrices", a.len(), batch_count),
        ));
    }
    if m.len() != batch_count {
        return Err(Error::blas_argument(
            ROUTINE,
            "m",
            POS_M,
            format!("{} entries for a batch of {}", m.len(), batch_count),
        ));
    }
    if n.len() != batch_count {
        return Err(Error::blas_argument(
            ROUTINE,
            "n",
            POS_N,
            format!("{} entries for a batch of {}", n.len(), batch_count),
        ));
    }

    let device = client.device();
    for i in 0..batch_count {
        let k = match side {
            Side::Left => m[i],
            Side::Right => n[i],
        };
        let (ai, bi) = (&a[i], &b[i]);

        if ai.ld() < k.max(1) {
            return Err(Error::blas_argument(
                ROUTINE,
                "ldda",
                POS_LDDA,
                format!("ldda[{}] = {} < max(1, {})", i, ai.ld(), k),
            ));
        }
        if ai.rows() < k || ai.cols() < k {
            return Err(Error::blas_argument(
                ROUTINE,
                "dA_array",
                POS_A,
                format!(
                    "A[{}] is {}x{}, needs at least {}x{}",
                    i,
                    ai.rows(),
                    ai.cols(),
                    k,
                    k
                ),
            ));
        }
        if bi.ld() < m[i].max(1) {
            return Err(Error::blas_argument(
                ROUTINE,
                "lddb",
                POS_LDDB,
                format!("lddb[{}] = {} < max(1, {})", i, bi.ld(), m[i]),
            ));
        }
        if bi.rows() < m[i] || bi.cols() < n[i] {
            return Err(Error::blas_argument(
                ROUTINE,
                "dB_array",
                POS_B,
                format!(
                    "B[{}] is {}x{}, needs at least {}x{}",
                    i,
                    bi.rows(),
                    bi.cols(),
                    m[i],
                    n[i]
                ),
            ));
        }
        if !ai.device().is_same(device) {
            return Err(Error::DeviceMismatch { arg: "dA_array" });
        }
        if !bi.device().is_same(device) {
            return Err(Error::DeviceMismatch { arg: "dB_array" });
        }
    }
    Ok(())
}
