//! Variable-Size Batched Triangular Solve
//!
//! This example solves three lower-triangular systems of different sizes
//! with one call, then shows how the recursion decomposed the work by
//! capturing the launches on the queue.
//!
//! Run with:
//! ```sh
//! cargo run --example trsm_vbatched_basic
//! ```

use vblas::prelude::*;

/// `I + 0.1 * subdiagonal`, column-major with leading dimension `k`
fn bidiagonal(k: usize) -> Vec<f64> {
    let mut a = vec![0.0; k * k];
    for i in 0..k {
        a[i + i * k] = 1.0;
        if i + 1 < k {
            a[(i + 1) + i * k] = 0.1;
        }
    }
    a
}

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Obtain a queue
    // -----------------------------------------------------------------------
    // Every launch goes to an explicit client. Launches on one client run
    // in submission order.
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    // -----------------------------------------------------------------------
    // 2. Upload a batch of differently sized systems
    // -----------------------------------------------------------------------
    let sizes = [3usize, 40, 70];
    let nrhs = 2;
    let mut a = Vec::new();
    let mut b = Vec::new();
    for &k in &sizes {
        let ones = vec![1.0; k * nrhs];
        a.push(DeviceMatrix::<CpuRuntime, f64>::from_col_major(
            &client,
            k,
            k,
            &bidiagonal(k),
        )?);
        b.push(DeviceMatrix::<CpuRuntime, f64>::from_col_major(
            &client, k, nrhs, &ones,
        )?);
    }

    // -----------------------------------------------------------------------
    // 3. Solve L X = 2 B for every problem, capturing the launches
    // -----------------------------------------------------------------------
    let m: Vec<usize> = sizes.to_vec();
    let n = vec![nrhs; sizes.len()];

    client.begin_capture();
    trsm_vbatched(
        &client,
        Side::Left,
        Uplo::Lower,
        Transpose::NoTrans,
        Diag::NonUnit,
        &m,
        &n,
        2.0,
        &a,
        &mut b,
    )?;
    client.synchronize();
    let launches = client.end_capture();

    for (k, x) in sizes.iter().zip(&b) {
        let host = x.to_host()?;
        println!("k = {:>2}: x[0..3] = {:?}", k, &host[..3.min(*k)]);
    }

    // -----------------------------------------------------------------------
    // 4. Inspect the decomposition
    // -----------------------------------------------------------------------
    println!("{} launches:", launches.len());
    for launch in &launches {
        println!(
            "  {:?} at ({}, {}) rows<={} cols<={}",
            launch.kind,
            launch.out_row,
            launch.out_col,
            launch.rows.cap(),
            launch.cols.cap()
        );
    }

    Ok(())
}
