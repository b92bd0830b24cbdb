//! Batch adapter: run the block transforms over many independent signals.
//!
//! Signals are stored in a [`Tensor3`] of shape `[batch, channels, len]`.
//! Every row is transformed on its own with one shared plan; no data crosses
//! rows. The `f32` converters widen each row to `f64` before the transform
//! and narrow the result afterwards.

extern crate alloc;
use alloc::vec::Vec;

use crate::mdct::{MdctError, MdctPlan, Stacking};

/// Row-major 3-axis buffer `[batch, channels, len]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor3<T> {
    shape: [usize; 3],
    data: Vec<T>,
}

impl<T: Copy + Default> Tensor3<T> {
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: alloc::vec![T::default(); shape[0] * shape[1] * shape[2]],
        }
    }
}

impl<T: Copy> Tensor3<T> {
    /// Wrap a flat buffer; fails when `data.len()` does not match `shape`.
    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Result<Self, MdctError> {
        let expected = shape[0] * shape[1] * shape[2];
        if data.len() != expected {
            return Err(MdctError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Stack equally long rows into `[rows.len() / channels, channels, len]`.
    pub fn from_rows(channels: usize, rows: &[Vec<T>]) -> Result<Self, MdctError> {
        let len = rows.first().map_or(0, |r| r.len());
        if channels == 0 || rows.len() % channels != 0 {
            return Err(MdctError::ShapeMismatch {
                expected: channels,
                found: rows.len(),
            });
        }
        let mut data = Vec::with_capacity(rows.len() * len);
        for row in rows {
            if row.len() != len {
                return Err(MdctError::ShapeMismatch {
                    expected: len,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            shape: [rows.len() / channels, channels, len],
            data,
        })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Innermost vector at `[b, c, ..]`. Panics when out of range.
    pub fn row(&self, b: usize, c: usize) -> &[T] {
        assert!(b < self.shape[0] && c < self.shape[1], "row index out of range");
        let len = self.shape[2];
        let start = (b * self.shape[1] + c) * len;
        &self.data[start..start + len]
    }

    /// All innermost vectors in `[b, c]` order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() rejects 0, and a zero-length row yields nothing to iterate
        let len = self.shape[2].max(1);
        self.data.chunks(len)
    }
}

fn widen(row: &[f32]) -> Vec<f64> {
    row.iter().map(|&v| v as f64).collect()
}

fn narrow(row: Vec<f64>) -> impl Iterator<Item = f32> {
    row.into_iter().map(|v| v as f32)
}

/// MDCT of every row of `signals`, `[B, C, L]` into `[B, C, L/2]` (odd) or
/// `[B, C, L/2 + 1]` (even).
pub fn mdct_convert(signals: &Tensor3<f32>, stacking: Stacking) -> Result<Tensor3<f32>, MdctError> {
    let [b, c, len] = signals.shape();
    let plan = MdctPlan::new(len, stacking)?;
    let out_len = plan.coefficient_len();
    let mut data = Vec::with_capacity(b * c * out_len);
    for row in signals.rows() {
        data.extend(narrow(plan.forward(widen(row).as_slice())?));
    }
    Tensor3::from_vec([b, c, out_len], data)
}

/// Inverse MDCT of every row of `coeffs`, `[B, C, M]` into `[B, C, 2M]` (odd)
/// or `[B, C, 2(M - 1)]` (even).
pub fn imdct_convert(coeffs: &Tensor3<f32>, stacking: Stacking) -> Result<Tensor3<f32>, MdctError> {
    let [b, c, len] = coeffs.shape();
    let plan = MdctPlan::for_coefficients(len, stacking)?;
    let out_len = plan.block_len();
    let mut data = Vec::with_capacity(b * c * out_len);
    for row in coeffs.rows() {
        data.extend(narrow(plan.inverse(widen(row).as_slice())?));
    }
    Tensor3::from_vec([b, c, out_len], data)
}

/// Double-precision MDCT of a list of equally long signals.
pub fn mdct_batch(signals: &[Vec<f64>], stacking: Stacking) -> Result<Vec<Vec<f64>>, MdctError> {
    let Some(first) = signals.first() else {
        return Ok(Vec::new());
    };
    let plan = MdctPlan::new(first.len(), stacking)?;
    signals.iter().map(|s| plan.forward(s.as_slice())).collect()
}

/// Double-precision inverse MDCT of a list of equally long coefficient blocks.
pub fn imdct_batch(coeffs: &[Vec<f64>], stacking: Stacking) -> Result<Vec<Vec<f64>>, MdctError> {
    let Some(first) = coeffs.first() else {
        return Ok(Vec::new());
    };
    let plan = MdctPlan::for_coefficients(first.len(), stacking)?;
    coeffs.iter().map(|x| plan.inverse(x.as_slice())).collect()
}

#[cfg(feature = "parallel")]
/// [`mdct_convert`] spread over Rayon's thread pool, one plan per worker.
///
/// Requires the `parallel` feature, which enables the [`rayon`](https://crates.io/crates/rayon) dependency.
pub fn mdct_convert_parallel(
    signals: &Tensor3<f32>,
    stacking: Stacking,
) -> Result<Tensor3<f32>, MdctError> {
    use rayon::prelude::*;
    let [b, c, len] = signals.shape();
    // validate once up front so workers never see a bad length
    let out_len = MdctPlan::new(len, stacking)?.coefficient_len();
    let rows: Vec<&[f32]> = signals.rows().collect();
    let results: Result<Vec<Vec<f64>>, MdctError> = rows
        .par_iter()
        .map_init(
            || MdctPlan::new(len, stacking),
            |plan, row| match plan {
                Ok(plan) => plan.forward(widen(row).as_slice()),
                Err(e) => Err(*e),
            },
        )
        .collect();
    let data = results?.into_iter().flat_map(narrow).collect();
    Tensor3::from_vec([b, c, out_len], data)
}

#[cfg(feature = "parallel")]
/// [`imdct_convert`] spread over Rayon's thread pool, one plan per worker.
///
/// Requires the `parallel` feature, which enables the [`rayon`](https://crates.io/crates/rayon) dependency.
pub fn imdct_convert_parallel(
    coeffs: &Tensor3<f32>,
    stacking: Stacking,
) -> Result<Tensor3<f32>, MdctError> {
    use rayon::prelude::*;
    let [b, c, len] = coeffs.shape();
    let out_len = MdctPlan::for_coefficients(len, stacking)?.block_len();
    let rows: Vec<&[f32]> = coeffs.rows().collect();
    let results: Result<Vec<Vec<f64>>, MdctError> = rows
        .par_iter()
        .map_init(
            || MdctPlan::for_coefficients(len, stacking),
            |plan, row| match plan {
                Ok(plan) => plan.inverse(widen(row).as_slice()),
                Err(e) => Err(*e),
            },
        )
        .collect();
    let data = results?.into_iter().flat_map(narrow).collect();
    Tensor3::from_vec([b, c, out_len], data)
}
