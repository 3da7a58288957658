//! Analysis windows used to taper frames before LPC and smoothing.
//!
//! Every generator is symmetric (`w[k] == w[len - 1 - k]`) and requires at
//! least two samples, since the cosine terms divide by `len - 1`.

use std::f64::consts::PI;

use ndarray::Array1;
use serde::Deserialize;

use crate::error::{require, Result};

const HAMMING_A0: f64 = 0.53836;
const HAMMING_A1: f64 = 0.46164;

const BLACKMAN_HARRIS: [f64; 4] = [0.35875, 0.48829, 0.14128, 0.01168];

const KAISER_BETA: f64 = 0.5;

/// Window shapes available for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    Hamming,
    #[default]
    Hanning,
    BlackmanHarris,
    Gaussian,
    Kaiser,
}

impl WindowKind {
    /// Generate a window of this shape with `len` samples.
    pub fn generate(self, len: usize) -> Result<Array1<f64>> {
        match self {
            WindowKind::Hamming => hamming(len),
            WindowKind::Hanning => hanning(len),
            WindowKind::BlackmanHarris => blackman_harris(len),
            WindowKind::Gaussian => gaussian(len),
            WindowKind::Kaiser => kaiser(len, KAISER_BETA),
        }
    }
}

pub fn hamming(len: usize) -> Result<Array1<f64>> {
    cosine_sum(len, &[HAMMING_A0, HAMMING_A1])
}

pub fn hanning(len: usize) -> Result<Array1<f64>> {
    cosine_sum(len, &[0.5, 0.5])
}

/// 4-term Blackman-Harris window.
pub fn blackman_harris(len: usize) -> Result<Array1<f64>> {
    cosine_sum(len, &BLACKMAN_HARRIS)
}

/// Gaussian window with its edges pulled down to zero.
pub fn gaussian(len: usize) -> Result<Array1<f64>> {
    check_len(len)?;
    let edge = (-12.0_f64).exp();
    let mid = (len as f64 - 1.0) / 2.0;
    let denom = (len + 1) as f64;
    Ok(Array1::from_shape_fn(len, |k| {
        let diff = k as f64 - mid;
        let value = (-48.0 * diff * diff / (denom * denom)).exp();
        (value - edge) / (1.0 - edge)
    }))
}

pub fn kaiser(len: usize, beta: f64) -> Result<Array1<f64>> {
    check_len(len)?;
    let half = (len as f64 - 1.0) / 2.0;
    let norm = bessel_i0(beta);
    Ok(Array1::from_shape_fn(len, |k| {
        let x = (k as f64 - half) / half;
        let arg = (1.0 - x * x).max(0.0).sqrt();
        bessel_i0(beta * arg) / norm
    }))
}

/// Generalised cosine-sum window with alternating signs:
/// `w[k] = a0 - a1 cos(2πk/(L-1)) + a2 cos(4πk/(L-1)) - ...`
fn cosine_sum(len: usize, coefficients: &[f64]) -> Result<Array1<f64>> {
    check_len(len)?;
    let span = (len - 1) as f64;
    Ok(Array1::from_shape_fn(len, |k| {
        let phase = 2.0 * PI * k as f64 / span;
        coefficients
            .iter()
            .enumerate()
            .map(|(order, &a)| {
                let sign = if order % 2 == 0 { 1.0 } else { -1.0 };
                sign * a * (order as f64 * phase).cos()
            })
            .sum()
    }))
}

fn check_len(len: usize) -> Result<()> {
    require!(len >= 2, "window length must be at least 2, got {}", len);
    Ok(())
}

/// Modified Bessel function of order 0 (Abramowitz & Stegun 9.8.1/9.8.2).
fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 3.75 {
        let t = (ax / 3.75).powi(2);
        1.0 + t
            * (3.5156229
                + t * (3.0899424
                    + t * (1.2067492 + t * (0.2659732 + t * (0.0360768 + t * 0.0045813)))))
    } else {
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.39894228
                + t * (0.01328592
                    + t * (0.00225319
                        + t * (-0.00157565
                            + t * (0.00916281
                                + t * (-0.02057706
                                    + t * (0.02635537 + t * (-0.01647633 + t * 0.00392377))))))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_abs_diff_eq;

    const ALL: [WindowKind; 5] = [
        WindowKind::Hamming,
        WindowKind::Hanning,
        WindowKind::BlackmanHarris,
        WindowKind::Gaussian,
        WindowKind::Kaiser,
    ];

    #[test]
    fn windows_are_symmetric_and_non_negative() {
        for kind in ALL {
            for len in [2, 3, 16, 25, 401] {
                let w = kind.generate(len).unwrap();
                assert_eq!(w.len(), len, "{kind:?} length");
                for k in 0..len {
                    assert!(w[k] >= -1e-12, "{kind:?}[{k}] = {}", w[k]);
                    assert_abs_diff_eq!(w[k], w[len - 1 - k], epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn hamming_matches_closed_form() {
        let w = hamming(5).unwrap();
        assert_abs_diff_eq!(w[0], HAMMING_A0 - HAMMING_A1, epsilon = 1e-12);
        assert_abs_diff_eq!(w[2], HAMMING_A0 + HAMMING_A1, epsilon = 1e-12);
    }

    #[test]
    fn hanning_peaks_at_centre() {
        let w = hanning(9).unwrap();
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn blackman_harris_edges_are_nearly_zero() {
        let w = blackman_harris(33).unwrap();
        assert_abs_diff_eq!(w[0], 0.00006, epsilon = 1e-9);
        assert_abs_diff_eq!(w[16], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_single_sample_window() {
        for kind in ALL {
            let err = kind.generate(1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Precondition);
        }
        assert!(hanning(0).is_err());
    }
}
