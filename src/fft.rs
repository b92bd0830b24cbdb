//! Fast Fourier Transform (FFT) primitive used by the block transforms.
//!
//! Power-of-two lengths run through a Stockham auto-sort radix-2 kernel.
//! Every other length goes through Bluestein's chirp-z algorithm, which
//! reduces it to a power-of-two convolution. A [`FftPlanner`] caches twiddle
//! tables and Bluestein kernels for reuse.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;

pub use crate::num::{Complex, Complex32, Complex64, Float};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    EmptyInput,
    MismatchedLengths,
    /// The length cannot be represented exactly in the float type.
    LengthOverflow,
}

impl core::fmt::Display for FftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FftError::EmptyInput => f.write_str("FFT input is empty"),
            FftError::MismatchedLengths => f.write_str("FFT buffers have mismatched lengths"),
            FftError::LengthOverflow => {
                f.write_str("FFT length is not exactly representable in the float type")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

type BluesteinPair<T> = (Arc<[Complex<T>]>, Arc<[Complex<T>]>);

pub struct FftPlanner<T: Float> {
    /// Twiddle tables keyed by transform size `n`. Each holds `n/2` entries
    /// `exp(-2πi k / n)`.
    cache: HashMap<usize, Arc<[Complex<T>]>>,
    /// Bluestein chirp `exp(-πi k² / n)` and the FFT of its padded conjugate,
    /// keyed by the transform length `n`.
    bluestein_cache: HashMap<usize, BluesteinPair<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            bluestein_cache: HashMap::new(),
            scratch: Vec::new(),
        }
    }

    /// Retrieve the twiddle table for a power-of-two size `n`.
    ///
    /// Entries are evaluated directly rather than by recurrence so the error
    /// does not grow with `n`.
    pub fn get_twiddles(&mut self, n: usize) -> Arc<[Complex<T>]> {
        let table = self.cache.entry(n).or_insert_with(|| {
            #[cfg(feature = "verbose-logging")]
            log::trace!("building twiddle table for n={}", n);
            let step = -2.0 * core::f64::consts::PI / n as f64;
            let table: Vec<Complex<T>> = (0..n / 2)
                .map(|k| Complex::expi(T::from_f64(step * k as f64)))
                .collect();
            Arc::from(table)
        });
        Arc::clone(table)
    }

    /// Retrieve the Bluestein chirp and kernel spectrum for length `n`.
    pub fn get_bluestein(&mut self, n: usize) -> Result<BluesteinPair<T>, FftError> {
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if let Some(pair) = self.bluestein_cache.get(&n) {
            return Ok((Arc::clone(&pair.0), Arc::clone(&pair.1)));
        }
        #[cfg(feature = "verbose-logging")]
        log::trace!("building bluestein kernel for n={}", n);
        let m = (2 * n - 1).next_power_of_two();
        let two_n = 2 * n;
        let step = core::f64::consts::PI / n as f64;
        let mut chirp: Vec<Complex<T>> = Vec::with_capacity(n);
        // k² mod 2n keeps the phase argument small for long transforms
        let mut sq = 0usize;
        for k in 0..n {
            chirp.push(Complex::expi(T::from_f64(-step * sq as f64)));
            sq = (sq + 2 * k + 1) % two_n;
        }
        let mut kernel = alloc::vec![Complex::zero(); m];
        kernel[0] = chirp[0].conj();
        for k in 1..n {
            let c = chirp[k].conj();
            kernel[k] = c;
            kernel[m - k] = c;
        }
        let twiddles = self.get_twiddles(m);
        let mut scratch = core::mem::take(&mut self.scratch);
        stockham(&mut kernel, &twiddles, &mut scratch);
        self.scratch = scratch;
        let pair: BluesteinPair<T> = (Arc::from(chirp), Arc::from(kernel));
        self.bluestein_cache
            .insert(n, (Arc::clone(&pair.0), Arc::clone(&pair.1)));
        Ok(pair)
    }
}

/// Stockham auto-sort radix-2 FFT. `input.len()` must be a power of two.
fn stockham<T: Float>(
    input: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    scratch: &mut Vec<Complex<T>>,
) {
    let n = input.len();
    if n < 2 {
        return;
    }
    if scratch.len() < n {
        scratch.resize(n, Complex::zero());
    }
    let mut src: &mut [Complex<T>] = input;
    let mut dst: &mut [Complex<T>] = &mut scratch[..n];
    let mut in_scratch = false;

    // n1 = number of groups, n2 = size of each half-group in this pass.
    let mut n1 = 1usize;
    let mut n2 = n;
    while n1 < n {
        n2 >>= 1;
        for k in 0..n1 {
            // exp(-2πi * k / (2*n1)) == table[k * n2]
            let w = twiddles[k * n2];
            let base0 = 2 * k * n2;
            let base1 = base0 + n2;
            for j in 0..n2 {
                let u = src[base0 + j];
                let v = src[base1 + j] * w;
                dst[k * n2 + j] = u + v;
                dst[(k + n1) * n2 + j] = u - v;
            }
        }
        core::mem::swap(&mut src, &mut dst);
        in_scratch = !in_scratch;
        n1 <<= 1;
    }

    if in_scratch {
        dst.copy_from_slice(src);
    }
}

pub trait FftImpl<T: Float> {
    /// Unnormalised forward transform, in place.
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;

    /// Inverse transform, in place, normalised by `1/n`.
    fn ifft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        let scale = T::one() / T::from_usize(n).ok_or(FftError::LengthOverflow)?;
        for c in input.iter_mut() {
            *c = c.conj();
        }
        self.fft(input)?;
        for c in input.iter_mut() {
            *c = c.conj().scale(scale);
        }
        Ok(())
    }

    fn fft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if input.len() != output.len() {
            return Err(FftError::MismatchedLengths);
        }
        output.copy_from_slice(input);
        self.fft(output)
    }

    fn ifft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if input.len() != output.len() {
            return Err(FftError::MismatchedLengths);
        }
        output.copy_from_slice(input);
        self.ifft(output)
    }

    fn fft_vec(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = input.to_vec();
        self.fft(&mut out)?;
        Ok(out)
    }

    fn ifft_vec(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = input.to_vec();
        self.ifft(&mut out)?;
        Ok(out)
    }
}

/// Portable scalar FFT backed by a private [`FftPlanner`].
///
/// The planner sits behind a `RefCell`, so an instance is `Send` but not
/// `Sync`: give each thread its own.
pub struct ScalarFftImpl<T: Float> {
    planner: RefCell<FftPlanner<T>>,
}

impl<T: Float> Default for ScalarFftImpl<T> {
    fn default() -> Self {
        Self {
            planner: RefCell::new(FftPlanner::new()),
        }
    }
}

impl<T: Float> ScalarFftImpl<T> {
    pub fn with_planner(planner: FftPlanner<T>) -> Self {
        Self {
            planner: RefCell::new(planner),
        }
    }

    fn fft_pow2(&self, input: &mut [Complex<T>]) {
        let mut planner = self.planner.borrow_mut();
        let twiddles = planner.get_twiddles(input.len());
        let mut scratch = core::mem::take(&mut planner.scratch);
        stockham(input, &twiddles, &mut scratch);
        planner.scratch = scratch;
    }

    fn fft_bluestein(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        let (chirp, kernel) = self.planner.borrow_mut().get_bluestein(n)?;
        let m = kernel.len();
        let mut a: Vec<Complex<T>> = Vec::with_capacity(m);
        a.extend(input.iter().zip(chirp.iter()).map(|(&x, &w)| x * w));
        a.resize(m, Complex::zero());
        self.fft_pow2(&mut a);
        for (ai, &bi) in a.iter_mut().zip(kernel.iter()) {
            *ai = (*ai * bi).conj();
        }
        self.fft_pow2(&mut a);
        let scale = T::one() / T::from_usize(m).ok_or(FftError::LengthOverflow)?;
        for ((out, &ai), &w) in input.iter_mut().zip(a.iter()).zip(chirp.iter()) {
            *out = ai.conj().scale(scale) * w;
        }
        Ok(())
    }
}

impl<T: Float> FftImpl<T> for ScalarFftImpl<T> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if n == 1 {
            return Ok(());
        }
        if n.is_power_of_two() {
            self.fft_pow2(input);
            Ok(())
        } else {
            self.fft_bluestein(input)
        }
    }
}

/// One-shot forward FFT with a fresh planner.
pub fn fft<T: Float>(input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
    ScalarFftImpl::<T>::default().fft_vec(input)
}

/// One-shot inverse FFT with a fresh planner, normalised by `1/n`.
pub fn ifft<T: Float>(input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
    ScalarFftImpl::<T>::default().ifft_vec(input)
}
