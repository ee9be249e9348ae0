//! Common test utilities
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vblas::algorithm::trsm::TrsmPolicy;
use vblas::batch::DeviceMatrix;
use vblas::dtype::{Complex64, Complex128, Element};
use vblas::ops::{Diag, Side, Transpose, Uplo};
use vblas::runtime::Runtime;
use vblas::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

/// Value written into B's padding rows; must survive every solve
pub const PAD_SENTINEL: f64 = 7.0;

/// Create a CPU client and device for testing
///
/// The TRSM policy is pinned to the defaults so that an exported
/// `VBLAS_TRSM_STOP_NB` does not change launch counts.
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device).with_trsm_policy(TrsmPolicy::default());
    (client, device)
}

/// Deterministic RNG for a test
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_allclose(a, b, rtol, atol, msg);
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f64, atol: f64, msg: &str) {
    assert_allclose(a, b, rtol, atol, msg);
}

/// Assert two slices of any element type are close, comparing magnitudes
pub fn assert_allclose<T: Element>(a: &[T], b: &[T], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).magnitude();
        let tol = atol + rtol * y.magnitude();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Scalars the tests can draw at random
pub trait TestScalar: Element {
    /// Entry with every component uniform in [-1, 1)
    fn sample(rng: &mut StdRng) -> Self;

    /// Non-zero pivot with magnitude uniform in [0.5, 2.0)
    fn sample_pivot(rng: &mut StdRng) -> Self;
}

macro_rules! impl_real_test_scalar {
    ($t:ty) => {
        impl TestScalar for $t {
            fn sample(rng: &mut StdRng) -> Self {
                rng.random_range(-1.0..1.0)
            }

            fn sample_pivot(rng: &mut StdRng) -> Self {
                let r: $t = rng.random_range(0.5..2.0);
                if rng.random_bool(0.5) { r } else { -r }
            }
        }
    };
}

impl_real_test_scalar!(f32);
impl_real_test_scalar!(f64);

macro_rules! impl_complex_test_scalar {
    ($t:ty, $f:ty) => {
        impl TestScalar for $t {
            fn sample(rng: &mut StdRng) -> Self {
                <$t>::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
            }

            fn sample_pivot(rng: &mut StdRng) -> Self {
                let r: $f = rng.random_range(0.5..2.0);
                let theta: $f = rng.random_range(0.0..std::f64::consts::TAU as $f);
                <$t>::new(r * theta.cos(), r * theta.sin())
            }
        }
    };
}

impl_complex_test_scalar!(Complex64, f32);
impl_complex_test_scalar!(Complex128, f64);

/// Column-major host matrix with explicit leading dimension
#[derive(Clone, Debug)]
pub struct HostMatrix<T> {
    pub rows: usize,
    pub cols: usize,
    pub ld: usize,
    pub data: Vec<T>,
}

impl<T: Element> HostMatrix<T> {
    /// Matrix with every storage slot set to `fill`
    pub fn filled(rows: usize, cols: usize, ld: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            ld,
            data: vec![fill; ld * cols],
        }
    }

    pub fn get(&self, r: usize, c: usize) -> T {
        self.data[r + c * self.ld]
    }

    pub fn set(&mut self, r: usize, c: usize, v: T) {
        self.data[r + c * self.ld] = v;
    }

    /// Leading `rows x cols` block, packed column-major
    pub fn block(&self, rows: usize, cols: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(rows * cols);
        for c in 0..cols {
            for r in 0..rows {
                out.push(self.get(r, c));
            }
        }
        out
    }

    pub fn upload(&self, client: &CpuClient) -> DeviceMatrix<CpuRuntime, T> {
        DeviceMatrix::from_host(client, self.rows, self.cols, self.ld, &self.data)
            .expect("upload should succeed")
    }

    pub fn download(device: &DeviceMatrix<CpuRuntime, T>) -> Self {
        Self {
            rows: device.rows(),
            cols: device.cols(),
            ld: device.ld(),
            data: device.to_host().expect("download should succeed"),
        }
    }
}

/// Random well-conditioned `k x k` triangular factor
///
/// Pivots have magnitude in [0.5, 2.0) and off-diagonal entries are
/// bounded by 1/k. Everything the solver must not read (the opposite
/// triangle, a unit diagonal and the padding rows) is NaN.
pub fn random_triangular<T: TestScalar>(
    rng: &mut StdRng,
    k: usize,
    ld: usize,
    uplo: Uplo,
    diag: Diag,
) -> HostMatrix<T> {
    let nan = T::from_f64(f64::NAN);
    let mut a = HostMatrix::filled(k, k, ld.max(1), nan);
    let scale = T::from_f64(1.0 / k.max(1) as f64);
    for c in 0..k {
        for r in 0..k {
            let referenced = match uplo {
                Uplo::Lower => r > c,
                Uplo::Upper => r < c,
            };
            if referenced {
                a.set(r, c, T::sample(rng) * scale);
            } else if r == c && diag == Diag::NonUnit {
                a.set(r, c, T::sample_pivot(rng));
            }
        }
    }
    a
}

/// Random `rows x cols` right-hand side with sentinel padding
pub fn random_rhs<T: TestScalar>(
    rng: &mut StdRng,
    rows: usize,
    cols: usize,
    ld: usize,
) -> HostMatrix<T> {
    let mut b = HostMatrix::filled(rows, cols, ld.max(1), T::from_f64(PAD_SENTINEL));
    for c in 0..cols {
        for r in 0..rows {
            b.set(r, c, T::sample(rng));
        }
    }
    b
}

/// Element `(r, c)` of `op(A)` for a triangular `A`, honouring `uplo` and `diag`
pub fn op_triangular<T: Element>(
    a: &HostMatrix<T>,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    r: usize,
    c: usize,
) -> T {
    let (sr, sc) = match trans {
        Transpose::NoTrans => (r, c),
        _ => (c, r),
    };
    if sr == sc && diag == Diag::Unit {
        return T::one();
    }
    let referenced = match uplo {
        Uplo::Lower => sr >= sc,
        Uplo::Upper => sr <= sc,
    };
    if !referenced {
        return T::zero();
    }
    let v = a.get(sr, sc);
    if trans == Transpose::ConjTrans {
        v.conj()
    } else {
        v
    }
}

/// `op(A) * X` (left) or `X * op(A)` (right) for the leading `m x n` block of X
#[allow(clippy::too_many_arguments)]
pub fn apply_triangular<T: Element>(
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    a: &HostMatrix<T>,
    x: &HostMatrix<T>,
    m: usize,
    n: usize,
) -> Vec<T> {
    let mut out = vec![T::zero(); m * n];
    for c in 0..n {
        for r in 0..m {
            let mut acc = T::zero();
            match side {
                Side::Left => {
                    for l in 0..m {
                        acc = acc + op_triangular(a, uplo, trans, diag, r, l) * x.get(l, c);
                    }
                }
                Side::Right => {
                    for l in 0..n {
                        acc = acc + x.get(r, l) * op_triangular(a, uplo, trans, diag, l, c);
                    }
                }
            }
            out[r + c * m] = acc;
        }
    }
    out
}

/// Scale every element of a slice
pub fn scaled<T: Element>(values: &[T], alpha: T) -> Vec<T> {
    values.iter().map(|&v| alpha * v).collect()
}

/// All 8 `(side, uplo, trans)` shape combinations
pub fn all_shapes() -> Vec<(Side, Uplo, Transpose)> {
    let mut shapes = Vec::with_capacity(8);
    for side in [Side::Left, Side::Right] {
        for uplo in [Uplo::Lower, Uplo::Upper] {
            for trans in [Transpose::NoTrans, Transpose::Trans] {
                shapes.push((side, uplo, trans));
            }
        }
    }
    shapes
}

/// A host-side batch of triangular systems ready to solve and verify
pub struct TrsmBatch<T> {
    pub side: Side,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub diag: Diag,
    pub m: Vec<usize>,
    pub n: Vec<usize>,
    pub a: Vec<HostMatrix<T>>,
    pub b: Vec<HostMatrix<T>>,
}

impl<T: TestScalar> TrsmBatch<T> {
    /// Random batch; A gets one padding row, B two
    #[allow(clippy::too_many_arguments)]
    pub fn random(
        rng: &mut StdRng,
        side: Side,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        m: &[usize],
        n: &[usize],
    ) -> Self {
        let mut a = Vec::with_capacity(m.len());
        let mut b = Vec::with_capacity(m.len());
        for (&mi, &ni) in m.iter().zip(n) {
            let k = match side {
                Side::Left => mi,
                Side::Right => ni,
            };
            a.push(random_triangular(rng, k, k + 1, uplo, diag));
            b.push(random_rhs(rng, mi, ni, mi + 2));
        }
        Self {
            side,
            uplo,
            trans,
            diag,
            m: m.to_vec(),
            n: n.to_vec(),
            a,
            b,
        }
    }

    /// Solve on `client`, returning the downloaded B matrices
    pub fn solve(&self, client: &CpuClient, alpha: T) -> Vec<HostMatrix<T>> {
        let a: Vec<_> = self.a.iter().map(|h| h.upload(client)).collect();
        let mut b: Vec<_> = self.b.iter().map(|h| h.upload(client)).collect();
        vblas::algorithm::trsm::trsm_vbatched(
            client, self.side, self.uplo, self.trans, self.diag, &self.m, &self.n, alpha, &a,
            &mut b,
        )
        .expect("trsm_vbatched should accept a valid batch");
        b.iter().map(HostMatrix::download).collect()
    }

    /// Check `op(A) X = alpha B` for every problem and that padding is untouched
    pub fn assert_solution(&self, x: &[HostMatrix<T>], alpha: T, rtol: f64, atol: f64, msg: &str) {
        assert_eq!(x.len(), self.m.len(), "{}: batch size mismatch", msg);
        for (i, xi) in x.iter().enumerate() {
            self.assert_problem(i, xi, alpha, rtol, atol, msg);
        }
    }

    /// Check problem `i` of the batch against its downloaded solution
    pub fn assert_problem(
        &self,
        i: usize,
        xi: &HostMatrix<T>,
        alpha: T,
        rtol: f64,
        atol: f64,
        msg: &str,
    ) {
        let (m, n) = (self.m[i], self.n[i]);
        let lhs = apply_triangular(
            self.side,
            self.uplo,
            self.trans,
            self.diag,
            &self.a[i],
            xi,
            m,
            n,
        );
        let rhs = scaled(&self.b[i].block(m, n), alpha);
        assert_allclose(&lhs, &rhs, rtol, atol, &format!("{} problem {}", msg, i));

        for c in 0..xi.cols {
            for r in m..xi.ld {
                assert_eq!(
                    xi.get(r, c),
                    self.b[i].get(r, c),
                    "{} problem {}: storage ({}, {}) outside the solved block changed",
                    msg,
                    i,
                    r,
                    c
                );
            }
        }
    }
}
