use kmdct::{cmdct, icmdct, imdct, mdct, Complex64, MdctError, MdctPlan, Stacking};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_block(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// `x` plus the time-domain aliasing a single unwindowed block keeps.
fn aliased(x: &[f64], stacking: Stacking) -> Vec<f64> {
    let n = x.len() / 2;
    let sign = match stacking {
        Stacking::Odd => -1.0,
        Stacking::Even => 1.0,
    };
    (0..2 * n)
        .map(|i| {
            if i < n {
                x[i] + sign * x[n - 1 - i]
            } else {
                x[i] + x[3 * n - 1 - i]
            }
        })
        .collect()
}

/// Output lengths follow the stacking table for both directions
#[test]
fn length_contract() {
    for &len in &[8usize, 12, 16, 40, 1024] {
        let x = random_block(len, len as u64);
        let odd = mdct(&x, Stacking::Odd).unwrap();
        let even = mdct(&x, Stacking::Even).unwrap();
        assert_eq!(odd.len(), len / 2);
        assert_eq!(even.len(), len / 2 + 1);
        assert_eq!(cmdct(&x, Stacking::Odd).unwrap().len(), len / 2);
        assert_eq!(cmdct(&x, Stacking::Even).unwrap().len(), len / 2 + 1);
        assert_eq!(imdct(&odd, Stacking::Odd).unwrap().len(), len);
        assert_eq!(imdct(&even, Stacking::Even).unwrap().len(), len);
        assert_eq!(icmdct(&odd, Stacking::Odd).unwrap().len(), len);
    }
}

/// The complex pair reconstructs real blocks exactly in both stackings
#[test]
fn complex_roundtrip() {
    for &len in &[8usize, 12, 16, 24, 40, 256] {
        for stacking in [Stacking::Odd, Stacking::Even] {
            let x = random_block(len, 11 + len as u64);
            let back = icmdct(&cmdct(&x, stacking).unwrap(), stacking).unwrap();
            let re: Vec<f64> = back.iter().map(|c| c.re).collect();
            assert!(max_abs_diff(&re, &x) < 1e-12, "len={} {:?}", len, stacking);
            assert!(back.iter().all(|c| c.im.abs() < 1e-12));
        }
    }
}

/// 16384 samples in, 8192 coefficients out, exact reconstruction from the complex pair
#[test]
fn long_block_scenario() {
    let x = random_block(16384, 2024);
    let coeffs = mdct(&x, Stacking::Odd).unwrap();
    assert_eq!(coeffs.len(), 8192);

    let back = icmdct(&cmdct(&x, Stacking::Odd).unwrap(), Stacking::Odd).unwrap();
    let re: Vec<f64> = back.iter().map(|c| c.re).collect();
    assert!(max_abs_diff(&re, &x) < 1e-9);

    let y = imdct(&coeffs, Stacking::Odd).unwrap();
    assert_eq!(y.len(), 16384);
    assert!(max_abs_diff(&y, &aliased(&x, Stacking::Odd)) < 1e-9);
}

/// A single real block comes back with its aliasing term
#[test]
fn real_roundtrip_keeps_aliasing() {
    for &len in &[8usize, 12, 16, 64] {
        for stacking in [Stacking::Odd, Stacking::Even] {
            let x = random_block(len, 3 * len as u64);
            let y = imdct(&mdct(&x, stacking).unwrap(), stacking).unwrap();
            assert!(max_abs_diff(&y, &aliased(&x, stacking)) < 1e-12);
        }
    }
}

/// The inverse is a right inverse up to a factor of two
#[test]
fn forward_of_inverse_doubles() {
    let coeffs = random_block(16, 5);
    let x = imdct(&coeffs, Stacking::Odd).unwrap();
    let again = mdct(&x, Stacking::Odd).unwrap();
    let doubled: Vec<f64> = coeffs.iter().map(|c| 2.0 * c).collect();
    assert!(max_abs_diff(&again, &doubled) < 1e-12);

    // the last even-stacked bin of a real block is always zero
    let mut coeffs = random_block(17, 6);
    let x = imdct(&coeffs, Stacking::Even).unwrap();
    let again = mdct(&x, Stacking::Even).unwrap();
    coeffs[16] = 0.0;
    let doubled: Vec<f64> = coeffs.iter().map(|c| 2.0 * c).collect();
    assert!(max_abs_diff(&again, &doubled) < 1e-12);
}

/// Overlap-adding half of each odd-stacked block cancels the aliasing
#[test]
fn overlap_add_cancels_aliasing() {
    let n = 32;
    let signal = random_block(8 * n, 99);
    let plan = MdctPlan::new(2 * n, Stacking::Odd).unwrap();
    let mut out = vec![0.0; signal.len()];
    for start in (0..=signal.len() - 2 * n).step_by(n) {
        let block = &signal[start..start + 2 * n];
        let y = plan.inverse(&plan.forward(block).unwrap()).unwrap();
        for (o, v) in out[start..start + 2 * n].iter_mut().zip(y) {
            *o += 0.5 * v;
        }
    }
    let interior = n..signal.len() - n;
    assert!(max_abs_diff(&out[interior.clone()], &signal[interior]) < 1e-12);
}

/// Hand-checkable block of length eight
#[test]
fn small_block() {
    let x = [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0];
    let coeffs = mdct(&x, Stacking::Odd).unwrap();
    assert_eq!(coeffs.len(), 4);
    let back = icmdct(&cmdct(&x, Stacking::Odd).unwrap(), Stacking::Odd).unwrap();
    for (a, b) in back.iter().zip(x.iter()) {
        assert!((a.re - b).abs() < 1e-12);
    }
}

/// Even stacking rejects an even coefficient count regardless of content
#[test]
fn even_inverse_requires_odd_count() {
    let coeffs = random_block(8, 1);
    assert_eq!(
        imdct(&coeffs, Stacking::Even),
        Err(MdctError::EvenCoefficientCount(8))
    );
    let complex: Vec<Complex64> = coeffs.iter().map(|&c| Complex64::new(c, -c)).collect();
    assert_eq!(
        icmdct(&complex, Stacking::Even).unwrap_err(),
        MdctError::EvenCoefficientCount(8)
    );
    // a block whose half length is odd has no even-stacked inverse
    let x = random_block(6, 2);
    let even = mdct(&x, Stacking::Even).unwrap();
    assert_eq!(even.len(), 4);
    assert!(imdct(&even, Stacking::Even).is_err());
}

/// Forward input must be non-empty and of even length
#[test]
fn forward_input_validation() {
    assert_eq!(
        mdct(&[1.0f64; 7], Stacking::Odd),
        Err(MdctError::OddBlockLength(7))
    );
    assert_eq!(cmdct::<f64>(&[], Stacking::Even), Err(MdctError::EmptyInput));
}

/// Single precision and complex inputs are widened, not narrowed
#[test]
fn accepts_f32_and_complex_input() {
    let x64 = random_block(16, 8);
    let x32: Vec<f32> = x64.iter().map(|&v| v as f32).collect();
    let widened: Vec<f64> = x32.iter().map(|&v| v as f64).collect();
    assert_eq!(
        mdct(&x32, Stacking::Odd).unwrap(),
        mdct(&widened, Stacking::Odd).unwrap()
    );
    let lifted: Vec<Complex64> = widened.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    assert_eq!(
        cmdct(&lifted, Stacking::Odd).unwrap(),
        cmdct(&widened, Stacking::Odd).unwrap()
    );
}

/// Transforms never modify the caller's buffers
#[test]
fn inputs_untouched() {
    let x = random_block(32, 4);
    let copy = x.clone();
    let coeffs = cmdct(&x, Stacking::Odd).unwrap();
    assert_eq!(x, copy);
    let coeffs_copy = coeffs.clone();
    icmdct(&coeffs, Stacking::Odd).unwrap();
    assert_eq!(coeffs, coeffs_copy);
}
