//! Batch round trip: a `[2, 1, 16384]` signal tensor through the MDCT and back.
//!
//! Run with `cargo run --example batch_roundtrip --features verbose-logging`
//! to see planner diagnostics.
use kmdct::batch::{imdct_convert, mdct_convert};
use kmdct::{cmdct, icmdct, Stacking, Tensor3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), kmdct::MdctError> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let batch = 2;
    let samples = 16384;
    let mut rng = StdRng::seed_from_u64(0);
    let rows: Vec<Vec<f32>> = (0..batch)
        .map(|_| (0..samples).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();
    let signals = Tensor3::from_rows(1, &rows)?;

    let coeffs = mdct_convert(&signals, Stacking::Odd)?;
    println!("MDCT output shape: {:?}", coeffs.shape());

    let restored = imdct_convert(&coeffs, Stacking::Odd)?;
    println!("IMDCT output shape: {:?}", restored.shape());

    // a single real block keeps its aliasing; the complex pair is exact
    let x: Vec<f64> = rows[0].iter().map(|&v| v as f64).collect();
    let back = icmdct(&cmdct(&x, Stacking::Odd)?, Stacking::Odd)?;
    let err = back
        .iter()
        .zip(x.iter())
        .map(|(a, b)| (a.re - b).abs())
        .fold(0.0, f64::max);
    println!("complex round trip max error: {err:e}");
    Ok(())
}
