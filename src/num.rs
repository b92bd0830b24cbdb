//! Scalar and complex number primitives shared by the FFT and MDCT layers.
//!
//! Trigonometry goes through [`libm`] so the crate builds without `std`.

// Minimal float trait for the generic FFT (no_std, no num-traits)
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(x: f64) -> Self;
    fn to_f64(self) -> f64;
    /// Convert a `usize` into the floating-point type.
    /// Returns `None` if the value cannot be represented exactly.
    fn from_usize(x: usize) -> Option<Self>;
    fn sqrt(self) -> Self;
    fn sin_cos(self) -> (Self, Self);
    fn pi() -> Self;
}

impl Float for f32 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_usize(x: usize) -> Option<Self> {
        const MAX_EXACT: usize = 1usize << 24;
        if x < MAX_EXACT {
            Some(x as f32)
        } else {
            None
        }
    }
    fn sqrt(self) -> Self {
        libm::sqrtf(self)
    }
    fn sin_cos(self) -> (Self, Self) {
        libm::sincosf(self)
    }
    fn pi() -> Self {
        core::f32::consts::PI
    }
}

impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn from_usize(x: usize) -> Option<Self> {
        const MAX_EXACT: usize = 1usize << 53;
        if x < MAX_EXACT {
            Some(x as f64)
        } else {
            None
        }
    }
    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }
    fn sin_cos(self) -> (Self, Self) {
        libm::sincos(self)
    }
    fn pi() -> Self {
        core::f64::consts::PI
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    /// `exp(i * theta)`
    #[inline(always)]
    pub fn expi(theta: T) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { re: cos, im: sin }
    }
    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
    #[inline(always)]
    pub fn scale(self, k: T) -> Self {
        Self {
            re: self.re * k,
            im: self.im * k,
        }
    }
    /// Squared magnitude.
    #[inline(always)]
    pub fn norm_sqr(self) -> T {
        self.re * self.re + self.im * self.im
    }
}

impl<T: Float> core::ops::Neg for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;

/// Element type accepted by the block transforms.
///
/// Real samples are lifted onto the real axis. Single precision values are
/// widened; the transforms never narrow.
pub trait Sample: Copy {
    fn to_complex64(self) -> Complex64;
}

impl Sample for f64 {
    #[inline(always)]
    fn to_complex64(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }
}

impl Sample for f32 {
    #[inline(always)]
    fn to_complex64(self) -> Complex64 {
        Complex64::new(self as f64, 0.0)
    }
}

impl Sample for Complex64 {
    #[inline(always)]
    fn to_complex64(self) -> Complex64 {
        self
    }
}

impl Sample for Complex32 {
    #[inline(always)]
    fn to_complex64(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_operations() {
        let a = Complex64::new(1.0, -2.0);
        let b = Complex64::new(3.0, 4.0);
        let c = a * b;
        assert!((c.re - (1.0 * 3.0 - (-2.0) * 4.0)).abs() < 1e-12);
        assert!((c.im - (1.0 * 4.0 + (-2.0) * 3.0)).abs() < 1e-12);
        let n = -a;
        assert_eq!(n.re, -1.0);
        assert_eq!(n.im, 2.0);
        assert_eq!(a.conj(), Complex64::new(1.0, 2.0));
        assert_eq!(a.scale(2.0), Complex64::new(2.0, -4.0));
        assert_eq!(b.norm_sqr(), 25.0);
    }

    #[test]
    fn test_expi_quarter_turn() {
        let e = Complex64::expi(<f64 as Float>::pi() / 2.0);
        assert!(e.re.abs() < 1e-15);
        assert!((e.im - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_from_usize_exactness() {
        assert_eq!(<f32 as Float>::from_usize(1 << 24), None);
        assert_eq!(<f32 as Float>::from_usize(16384), Some(16384.0));
        assert_eq!(<f64 as Float>::from_usize(1 << 40), Some((1u64 << 40) as f64));
    }

    #[test]
    fn test_sample_widening() {
        assert_eq!(1.5f32.to_complex64(), Complex64::new(1.5, 0.0));
        assert_eq!(
            Complex32::new(0.25, -0.5).to_complex64(),
            Complex64::new(0.25, -0.5)
        );
        assert_eq!((-2.0f64).to_complex64(), Complex64::new(-2.0, 0.0));
    }
}
