//! Modified Discrete Cosine Transform (MDCT) and its complex generalisation
//! (CMDCT, also known as the MCLT), with their inverses.
//!
//! A block of `L = 2N` samples maps to `N` coefficients with
//! [`Stacking::Odd`] or to `N + 1` coefficients with [`Stacking::Even`].
//! Each call works on a single block; no window is applied and no
//! overlap-add is performed.
//!
//! The complex pair is exact for real input: `icmdct(cmdct(x))` gives back
//! `x`. The real pair is critically sampled, so `imdct(mdct(x))` returns `x`
//! plus the time-domain aliasing term that overlap-add across neighbouring
//! blocks removes.

use alloc::vec::Vec;
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::fft::{FftError, FftImpl, ScalarFftImpl};
use crate::num::{Complex64, Sample};

/// Alignment of the coefficient grid relative to the block boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stacking {
    /// `N` coefficients at half-integer frequencies. The usual audio MDCT.
    #[default]
    Odd,
    /// `N + 1` coefficients at integer frequencies; the first and last bins
    /// carry half bandwidth and are weighted by `√0.5`.
    Even,
}

impl Stacking {
    /// Number of coefficients produced for a block of `block_len` samples.
    pub fn coefficient_len(self, block_len: usize) -> usize {
        match self {
            Stacking::Odd => block_len / 2,
            Stacking::Even => block_len / 2 + 1,
        }
    }

    /// Number of samples reconstructed from `coefficient_len` coefficients.
    pub fn block_len(self, coefficient_len: usize) -> usize {
        match self {
            Stacking::Odd => 2 * coefficient_len,
            Stacking::Even => 2 * coefficient_len.saturating_sub(1),
        }
    }
}

impl From<bool> for Stacking {
    /// `true` selects [`Stacking::Odd`].
    fn from(odd: bool) -> Self {
        if odd {
            Stacking::Odd
        } else {
            Stacking::Even
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdctError {
    EmptyInput,
    /// Forward input must hold an even number of samples.
    OddBlockLength(usize),
    /// Even stacking needs an odd number of coefficients to place both
    /// half-weighted edge bins.
    EvenCoefficientCount(usize),
    /// A buffer did not have the length a plan or batch shape requires.
    ShapeMismatch { expected: usize, found: usize },
    Fft(FftError),
}

impl core::fmt::Display for MdctError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MdctError::EmptyInput => f.write_str("transform input is empty"),
            MdctError::OddBlockLength(len) => {
                write!(f, "forward transform requires an even block length, got {len}")
            }
            MdctError::EvenCoefficientCount(len) => write!(
                f,
                "even inverse requires an odd number of coefficients, got {len}"
            ),
            MdctError::ShapeMismatch { expected, found } => {
                write!(f, "expected {expected} values, found {found}")
            }
            MdctError::Fft(e) => write!(f, "fft failed: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MdctError {}

impl From<FftError> for MdctError {
    fn from(e: FftError) -> Self {
        MdctError::Fft(e)
    }
}

/// Precomputed twiddle tables for one `(block length, stacking)` pair.
///
/// A plan owns its FFT planner, so it is `Send` but not `Sync`.
pub struct MdctPlan {
    half: usize,
    stacking: Stacking,
    /// Forward pre-twiddle `exp(-iπk/2N)`; empty for even stacking.
    fwd_pre: Vec<Complex64>,
    /// Forward post-twiddle, `√(1/N)` folded in.
    fwd_post: Vec<Complex64>,
    /// Inverse pre-twiddle `exp(iπ·n0·k/N)`.
    inv_pre: Vec<Complex64>,
    /// Inverse post-twiddle with `√N` folded in; empty for even stacking.
    inv_post: Vec<Complex64>,
    fft: ScalarFftImpl<f64>,
}

impl MdctPlan {
    /// Plan the transform of blocks holding `block_len` samples.
    pub fn new(block_len: usize, stacking: Stacking) -> Result<Self, MdctError> {
        if block_len == 0 {
            return Err(MdctError::EmptyInput);
        }
        if block_len % 2 != 0 {
            return Err(MdctError::OddBlockLength(block_len));
        }
        #[cfg(feature = "verbose-logging")]
        log::debug!("planning {:?} mdct for block_len={}", stacking, block_len);

        let n = block_len / 2;
        let nf = n as f64;
        let n0 = (nf + 1.0) / 2.0;
        let pi = core::f64::consts::PI;
        let outlen = stacking.coefficient_len(block_len);

        let (fwd_pre, offset) = match stacking {
            Stacking::Odd => (
                (0..block_len)
                    .map(|k| Complex64::expi(-pi * k as f64 / (2.0 * nf)))
                    .collect(),
                0.5,
            ),
            Stacking::Even => (Vec::new(), 0.0),
        };
        let fwd_scale = libm::sqrt(1.0 / nf);
        let fwd_post = (0..outlen)
            .map(|j| Complex64::expi(-pi * n0 * (j as f64 + offset) / nf).scale(fwd_scale))
            .collect();

        let inv_pre = (0..block_len)
            .map(|k| Complex64::expi(pi * n0 * k as f64 / nf))
            .collect();
        let inv_post = match stacking {
            Stacking::Odd => {
                let s = libm::sqrt(nf);
                (0..block_len)
                    .map(|k| Complex64::expi(pi * (k as f64 + n0) / (2.0 * nf)).scale(s))
                    .collect()
            }
            Stacking::Even => Vec::new(),
        };

        Ok(Self {
            half: n,
            stacking,
            fwd_pre,
            fwd_post,
            inv_pre,
            inv_post,
            fft: ScalarFftImpl::default(),
        })
    }

    /// Plan the inverse of `coefficient_len` coefficients.
    pub fn for_coefficients(coefficient_len: usize, stacking: Stacking) -> Result<Self, MdctError> {
        check_coefficient_len(coefficient_len, stacking)?;
        Self::new(stacking.block_len(coefficient_len), stacking)
    }

    pub fn stacking(&self) -> Stacking {
        self.stacking
    }

    pub fn block_len(&self) -> usize {
        2 * self.half
    }

    pub fn coefficient_len(&self) -> usize {
        self.stacking.coefficient_len(self.block_len())
    }

    /// Complex forward transform (CMDCT) of one block.
    pub fn forward_complex<S: Sample>(&self, input: &[S]) -> Result<Vec<Complex64>, MdctError> {
        expect_len(self.block_len(), input.len())?;
        // private working copy; the caller's block is never touched
        let mut buf: Vec<Complex64> = input.iter().map(|s| s.to_complex64()).collect();
        if self.stacking == Stacking::Odd {
            for (x, &w) in buf.iter_mut().zip(self.fwd_pre.iter()) {
                *x = *x * w;
            }
        }
        self.fft.fft(&mut buf)?;
        buf.truncate(self.coefficient_len());
        if self.stacking == Stacking::Even {
            let edge = libm::sqrt(0.5);
            let last = self.half;
            buf[0] = buf[0].scale(edge);
            buf[last] = buf[last].scale(edge);
        }
        for (x, &w) in buf.iter_mut().zip(self.fwd_post.iter()) {
            *x = *x * w;
        }
        Ok(buf)
    }

    /// Real forward transform (MDCT): `√2 · Re(cmdct)`.
    pub fn forward<S: Sample>(&self, input: &[S]) -> Result<Vec<f64>, MdctError> {
        let s = core::f64::consts::SQRT_2;
        Ok(self
            .forward_complex(input)?
            .into_iter()
            .map(|c| c.re * s)
            .collect())
    }

    /// Complex inverse transform (inverse CMDCT) of one coefficient block.
    pub fn inverse_complex<S: Sample>(&self, coeffs: &[S]) -> Result<Vec<Complex64>, MdctError> {
        expect_len(self.coefficient_len(), coeffs.len())?;
        check_coefficient_len(coeffs.len(), self.stacking)?;
        let n = self.half;
        let mut x: Vec<Complex64> = coeffs.iter().map(|s| s.to_complex64()).collect();
        let mut y: Vec<Complex64> = Vec::with_capacity(2 * n);
        match self.stacking {
            Stacking::Odd => {
                y.extend_from_slice(&x);
                y.extend(x.iter().rev().map(|c| -c.conj()));
            }
            Stacking::Even => {
                let edge = core::f64::consts::SQRT_2;
                x[0] = x[0].scale(edge);
                x[n] = x[n].scale(edge);
                y.extend_from_slice(&x);
                y.extend(x[1..n].iter().rev().map(|c| -c.conj()));
            }
        }
        for (v, &w) in y.iter_mut().zip(self.inv_pre.iter()) {
            *v = *v * w;
        }
        self.fft.ifft(&mut y)?;
        match self.stacking {
            Stacking::Odd => {
                for (v, &w) in y.iter_mut().zip(self.inv_post.iter()) {
                    *v = *v * w;
                }
            }
            Stacking::Even => {
                let s = libm::sqrt(n as f64);
                for v in y.iter_mut() {
                    *v = v.scale(s);
                }
            }
        }
        Ok(y)
    }

    /// Real inverse transform (IMDCT): `√2 · Re(icmdct)`.
    pub fn inverse<S: Sample>(&self, coeffs: &[S]) -> Result<Vec<f64>, MdctError> {
        let s = core::f64::consts::SQRT_2;
        Ok(self
            .inverse_complex(coeffs)?
            .into_iter()
            .map(|c| c.re * s)
            .collect())
    }
}

/// Cache of [`MdctPlan`]s keyed by block length and stacking.
#[derive(Default)]
pub struct MdctPlanner {
    cache: HashMap<(usize, Stacking), MdctPlan>,
}

impl MdctPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan (or fetch) the transform for blocks of `block_len` samples.
    pub fn plan(&mut self, block_len: usize, stacking: Stacking) -> Result<&MdctPlan, MdctError> {
        match self.cache.entry((block_len, stacking)) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => Ok(e.insert(MdctPlan::new(block_len, stacking)?)),
        }
    }

    /// Plan (or fetch) the inverse transform of `coefficient_len` coefficients.
    pub fn plan_inverse(
        &mut self,
        coefficient_len: usize,
        stacking: Stacking,
    ) -> Result<&MdctPlan, MdctError> {
        check_coefficient_len(coefficient_len, stacking)?;
        self.plan(stacking.block_len(coefficient_len), stacking)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn expect_len(expected: usize, found: usize) -> Result<(), MdctError> {
    if expected != found {
        return Err(MdctError::ShapeMismatch { expected, found });
    }
    Ok(())
}

fn check_coefficient_len(len: usize, stacking: Stacking) -> Result<(), MdctError> {
    if stacking == Stacking::Even && len % 2 == 0 {
        return Err(MdctError::EvenCoefficientCount(len));
    }
    // odd stacking with no coefficients, or even stacking with a single one,
    // reconstructs an empty block
    if stacking.block_len(len) == 0 {
        return Err(MdctError::EmptyInput);
    }
    Ok(())
}

/// Complex MDCT (MCLT) of a real or complex block of even length.
///
/// Returns `L/2` coefficients for [`Stacking::Odd`] and `L/2 + 1` for
/// [`Stacking::Even`].
pub fn cmdct<S: Sample>(input: &[S], stacking: Stacking) -> Result<Vec<Complex64>, MdctError> {
    MdctPlan::new(input.len(), stacking)?.forward_complex(input)
}

/// Real MDCT: `√2 · Re(cmdct(input))`.
///
/// # Examples
/// ```
/// use kmdct::mdct::{mdct, Stacking};
/// let x = [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0];
/// assert_eq!(mdct(&x, Stacking::Odd).unwrap().len(), 4);
/// assert_eq!(mdct(&x, Stacking::Even).unwrap().len(), 5);
/// ```
pub fn mdct<S: Sample>(input: &[S], stacking: Stacking) -> Result<Vec<f64>, MdctError> {
    MdctPlan::new(input.len(), stacking)?.forward(input)
}

/// Inverse complex MDCT. Returns `2M` samples for [`Stacking::Odd`] and
/// `2(M - 1)` for [`Stacking::Even`].
///
/// Fails with [`MdctError::EvenCoefficientCount`] when even stacking is
/// requested with an even number of coefficients.
pub fn icmdct<S: Sample>(coeffs: &[S], stacking: Stacking) -> Result<Vec<Complex64>, MdctError> {
    MdctPlan::for_coefficients(coeffs.len(), stacking)?.inverse_complex(coeffs)
}

/// Real inverse MDCT: `√2 · Re(icmdct(coeffs))`.
pub fn imdct<S: Sample>(coeffs: &[S], stacking: Stacking) -> Result<Vec<f64>, MdctError> {
    MdctPlan::for_coefficients(coeffs.len(), stacking)?.inverse(coeffs)
}
