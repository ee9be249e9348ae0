//! Batched kernel implementation for the CPU runtime

use super::CpuRuntime;
use super::client::CpuClient;
use super::kernels::{self, for_each_problem};
use crate::dtype::Element;
use crate::ops::{BatchedBlasKernels, GemmVbatched, LasetVbatched, Side, TrsmSmallVbatched};
use crate::runtime::{LaunchKind, LaunchRecord};
use log::debug;

#[allow(unsafe_op_in_unsafe_fn)] // Kernels are already marked unsafe
impl BatchedBlasKernels<CpuRuntime> for CpuClient {
    fn trsm_stop_nb(&self, side: Side, max_m: usize, max_n: usize) -> usize {
        self.trsm_policy().stop_nb(side, max_m, max_n)
    }

    unsafe fn gemm_vbatched<T: Element>(&self, params: &GemmVbatched<'_, CpuRuntime, T>) {
        debug!(
            "{}gemm_vbatched {}{} batch={} c=({}, {}) m={:?} n={:?} k={:?}",
            T::DTYPE.blas_prefix(),
            params.trans_a,
            params.trans_b,
            params.batch_count,
            params.c.row(),
            params.c.col(),
            params.extent_m,
            params.extent_n,
            params.extent_k,
        );
        self.record(|| LaunchRecord {
            kind: LaunchKind::GemmVbatched,
            side: None,
            batch_count: params.batch_count,
            out_row: params.c.row(),
            out_col: params.c.col(),
            rows: params.extent_m,
            cols: params.extent_n,
            inner: Some(params.extent_k),
        });
        for_each_problem(self, params.batch_count, |i| unsafe {
            kernels::gemm_problem(params, i)
        });
    }

    unsafe fn trsm_small_vbatched<T: Element>(
        &self,
        params: &TrsmSmallVbatched<'_, CpuRuntime, T>,
    ) {
        debug!(
            "{}trsm_small_vbatched {}{}{}{} batch={} b=({}, {}) m={:?} n={:?}",
            T::DTYPE.blas_prefix(),
            params.side,
            params.uplo,
            params.trans,
            params.diag,
            params.batch_count,
            params.b.row(),
            params.b.col(),
            params.extent_m,
            params.extent_n,
        );
        self.record(|| LaunchRecord {
            kind: LaunchKind::TrsmSmallVbatched,
            side: Some(params.side),
            batch_count: params.batch_count,
            out_row: params.b.row(),
            out_col: params.b.col(),
            rows: params.extent_m,
            cols: params.extent_n,
            inner: None,
        });
        for_each_problem(self, params.batch_count, |i| unsafe {
            kernels::trsm_small_problem(params, i)
        });
    }

    unsafe fn laset_vbatched<T: Element>(&self, params: &LasetVbatched<'_, CpuRuntime, T>) {
        debug!(
            "{}laset_vbatched batch={} a=({}, {}) m={:?} n={:?}",
            T::DTYPE.blas_prefix(),
            params.batch_count,
            params.a.row(),
            params.a.col(),
            params.extent_m,
            params.extent_n,
        );
        self.record(|| LaunchRecord {
            kind: LaunchKind::LasetVbatched,
            side: None,
            batch_count: params.batch_count,
            out_row: params.a.row(),
            out_col: params.a.col(),
            rows: params.extent_m,
            cols: params.extent_n,
            inner: None,
        });
        for_each_problem(self, params.batch_count, |i| unsafe {
            kernels::laset_problem(params, i)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchPtrs, DeviceMatrix};
    use crate::dtype::Complex128;
    use crate::ops::{BatchExtent, Diag, Transpose, Uplo};
    use crate::runtime::{Runtime, RuntimeClient};

    fn client() -> CpuClient {
        CpuRuntime::default_client(&CpuRuntime::default_device())
    }

    #[test]
    fn test_gemm_accumulates_into_block() {
        let client = client();
        // A = [[1, 2], [3, 4]], B = I, C = ones; C := -1 * A * B + 2 * C
        let a =
            DeviceMatrix::<CpuRuntime, f64>::from_col_major(&client, 2, 2, &[1.0, 3.0, 2.0, 4.0])
                .unwrap();
        let b =
            DeviceMatrix::<CpuRuntime, f64>::from_col_major(&client, 2, 2, &[1.0, 0.0, 0.0, 1.0])
                .unwrap();
        let c = DeviceMatrix::<CpuRuntime, f64>::from_col_major(&client, 2, 2, &[1.0; 4]).unwrap();

        let (pa, pb, pc) = ([a.ptr()], [b.ptr()], [c.ptr()]);
        let ld = [2usize];
        let dims = [2usize];
        let params = GemmVbatched {
            trans_a: Transpose::NoTrans,
            trans_b: Transpose::NoTrans,
            m: &dims,
            n: &dims,
            k: &dims,
            alpha: -1.0,
            a: BatchPtrs::new(&pa, &ld).handle(),
            b: BatchPtrs::new(&pb, &ld).handle(),
            beta: 2.0,
            c: BatchPtrs::new(&pc, &ld).handle(),
            extent_m: BatchExtent::new(2),
            extent_n: BatchExtent::new(2),
            extent_k: BatchExtent::new(2),
            batch_count: 1,
        };
        unsafe { client.gemm_vbatched(&params) };
        client.synchronize();

        assert_eq!(c.to_host().unwrap(), vec![1.0, -1.0, 0.0, -2.0]);
    }

    #[test]
    fn test_small_trsm_conj_trans_right() {
        let client = client();
        // A upper 2x2, X * A^H = B with X = [[1, i]]
        let i = Complex128::I;
        let one = Complex128::ONE;
        let a_host = [
            Complex128::new(2.0, 0.0),
            Complex128::ZERO,
            Complex128::new(1.0, 1.0),
            Complex128::new(0.0, 3.0),
        ];
        // A^H = [[2, 0], [1 - i, -3i]]; X * A^H = [2 + i(1 - i), i * (-3i)] = [3 + i, 3]
        let b_host = [Complex128::new(3.0, 1.0), Complex128::new(3.0, 0.0)];
        let a = DeviceMatrix::<CpuRuntime, Complex128>::from_col_major(&client, 2, 2, &a_host)
            .unwrap();
        let b = DeviceMatrix::<CpuRuntime, Complex128>::from_col_major(&client, 1, 2, &b_host)
            .unwrap();

        let (pa, pb) = ([a.ptr()], [b.ptr()]);
        let (lda, ldb) = ([2usize], [1usize]);
        let (m, n) = ([1usize], [2usize]);
        let params = TrsmSmallVbatched {
            side: Side::Right,
            uplo: Uplo::Upper,
            trans: Transpose::ConjTrans,
            diag: Diag::NonUnit,
            m: &m,
            n: &n,
            alpha: one,
            a: BatchPtrs::new(&pa, &lda).handle(),
            b: BatchPtrs::new(&pb, &ldb).handle(),
            extent_m: BatchExtent::new(1),
            extent_n: BatchExtent::new(2),
            batch_count: 1,
        };
        unsafe { client.trsm_small_vbatched(&params) };

        let x = b.to_host().unwrap();
        assert!((x[0] - one).magnitude() < 1e-12);
        assert!((x[1] - i).magnitude() < 1e-12);
    }

    #[test]
    fn test_launches_are_captured() {
        let client = client();
        let b = DeviceMatrix::<CpuRuntime, f32>::from_col_major(&client, 3, 1, &[1.0; 3]).unwrap();
        let pb = [b.ptr()];
        let ld = [3usize];
        let (m, n) = ([3usize], [1usize]);
        let params = LasetVbatched {
            m: &m,
            n: &n,
            offdiag: 0.0,
            diag: 0.0,
            a: BatchPtrs::new(&pb, &ld).handle(),
            extent_m: BatchExtent::new(3),
            extent_n: BatchExtent::new(1),
            batch_count: 1,
        };

        client.begin_capture();
        unsafe { client.laset_vbatched(&params) };
        let log = client.end_capture();

        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, LaunchKind::LasetVbatched);
        assert_eq!(b.to_host().unwrap(), vec![0.0; 3]);
    }
}
