use kmdct::{cmdct, icmdct, imdct, mdct, Stacking};
use proptest::prelude::*;

fn stacking() -> impl Strategy<Value = Stacking> {
    prop_oneof![Just(Stacking::Odd), Just(Stacking::Even)]
}

proptest! {
    #[test]
    fn complex_roundtrip(
        quarter in 1usize..33,
        stacking in stacking(),
        ref signal in proptest::collection::vec(-1000.0f64..1000.0, 128),
    ) {
        let x = &signal[..4 * quarter];
        let back = icmdct(&cmdct(x, stacking).unwrap(), stacking).unwrap();
        for (a, b) in back.iter().zip(x.iter()) {
            prop_assert!((a.re - b).abs() < 1e-8, "{} vs {}", a.re, b);
        }
    }

    #[test]
    fn real_pair_is_idempotent_up_to_scale(
        quarter in 1usize..17,
        stacking in stacking(),
        ref signal in proptest::collection::vec(-1.0f64..1.0, 64),
    ) {
        // imdct∘mdct is twice a projection: applying it again doubles the result
        let x = &signal[..4 * quarter];
        let once = imdct(&mdct(x, stacking).unwrap(), stacking).unwrap();
        let twice = imdct(&mdct(&once, stacking).unwrap(), stacking).unwrap();
        for (a, b) in twice.iter().zip(once.iter()) {
            prop_assert!((a - 2.0 * b).abs() < 1e-10);
        }
    }

    #[test]
    fn even_inverse_rejects_even_counts(half in 0usize..64) {
        let coeffs = vec![0.5f64; 2 * half];
        prop_assert!(imdct(&coeffs, Stacking::Even).is_err());
    }
}
