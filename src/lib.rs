//! # kmdct - MDCT and complex MDCT (MCLT) block transforms for Rust
//!
//! FFT-based forward and inverse Modified Discrete Cosine Transforms, in
//! real and complex form, for one block of samples at a time.
//!
//! ## Features
//!
//! - **Four pure transforms**: [`mdct()`], [`cmdct()`], [`imdct()`], [`icmdct()`]
//! - **Odd and even stacking** selected by [`Stacking`]
//! - **Any even block length**: radix-2 Stockham FFT for powers of two,
//!   Bluestein's algorithm for everything else
//! - **Reusable plans**: [`MdctPlan`] and [`MdctPlanner`] cache twiddle tables
//! - **Batch adapter** for `[batch, channels, len]` tensors, optionally
//!   parallel with Rayon
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` impls
//! - `parallel`: Rayon-backed batch converters
//! - `verbose-logging`: planner diagnostics through the `log` facade
//!
//! ## Numeric contract
//!
//! All arithmetic is double precision. `f32` inputs are widened on entry;
//! the batch converters narrow back to `f32` on exit.
//!
//! ## Example
//!
//! ```
//! use kmdct::{cmdct, icmdct, mdct, Stacking};
//!
//! let x: Vec<f64> = (0..16).map(|i| (i as f64 * 0.3).sin()).collect();
//! assert_eq!(mdct(&x, Stacking::Odd).unwrap().len(), 8);
//!
//! let back = icmdct(&cmdct(&x, Stacking::Odd).unwrap(), Stacking::Odd).unwrap();
//! for (a, b) in back.iter().zip(x.iter()) {
//!     assert!((a.re - b).abs() < 1e-12);
//! }
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Fast Fourier Transform primitive
///
/// Planner-cached scalar FFT used by the block transforms.
pub mod fft;

/// Float and complex number primitives
pub mod num;

/// MDCT, IMDCT, CMDCT and inverse CMDCT
///
/// The transform core, with reusable plans.
pub mod mdct;

/// Batch adapter
///
/// Applies the core once per row of a `[batch, channels, len]` tensor.
pub mod batch;

pub use batch::Tensor3;
pub use fft::{FftError, FftPlanner};
pub use mdct::{cmdct, icmdct, imdct, mdct, MdctError, MdctPlan, MdctPlanner, Stacking};
pub use num::{Complex, Complex32, Complex64, Float, Sample};
