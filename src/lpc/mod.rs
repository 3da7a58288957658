//! Linear prediction analysis.
//!
//! Coefficients follow the whitening-filter convention
//! `A(z) = 1 + a[1] z^-1 + ... + a[p] z^-p`, so filtering a frame with
//! [`crate::signal::filter::fir`] and `a` yields the prediction error.

mod residual;

pub use residual::{residual, residual_with_method};

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use crate::error::{require, Result};

/// Estimation method for a single LPC frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LpcMethod {
    #[default]
    Autocorrelation,
    Burg,
}

/// LPC polynomial for one analysed segment.
#[derive(Debug, Clone)]
pub struct LpcFrame {
    /// `order + 1` coefficients with `a[0] == 1`.
    pub a: Array1<f64>,
    /// Prediction error power.
    pub gain: f64,
    /// Number of coefficients actually estimated before the recursion
    /// stopped (lower than `order` for degenerate segments).
    pub order_reached: usize,
}

impl LpcFrame {
    fn flat(order: usize) -> Self {
        let mut a = Array1::zeros(order + 1);
        a[0] = 1.0;
        Self {
            a,
            gain: 0.0,
            order_reached: 0,
        }
    }

    pub fn order(&self) -> usize {
        self.a.len() - 1
    }

    /// Estimate a frame of `order` coefficients with the given method.
    pub fn analyze(segment: ArrayView1<'_, f64>, order: usize, method: LpcMethod) -> Result<Self> {
        match method {
            LpcMethod::Autocorrelation => frame_auto(segment, order),
            LpcMethod::Burg => frame_burg(segment, order),
        }
    }
}

/// Autocorrelation-method LPC solved with the Levinson-Durbin recursion.
///
/// A silent segment yields the identity polynomial. When the prediction
/// error stops being positive the recursion halts and the coefficient of the
/// failing stage is discarded.
pub fn frame_auto(segment: ArrayView1<'_, f64>, order: usize) -> Result<LpcFrame> {
    require!(order >= 1, "LPC order must be at least 1");

    let n = segment.len();
    let r: Vec<f64> = (0..=order)
        .map(|lag| {
            if lag >= n {
                0.0
            } else {
                segment
                    .slice(ndarray::s![..n - lag])
                    .dot(&segment.slice(ndarray::s![lag..]))
            }
        })
        .collect();

    Ok(levinson(&r, order))
}

/// Levinson-Durbin recursion over the autocorrelation `r[0..=order]`.
fn levinson(r: &[f64], order: usize) -> LpcFrame {
    let mut frame = LpcFrame::flat(order);
    if r[0] == 0.0 {
        return frame;
    }

    let a = &mut frame.a;
    let mut gain = r[0];
    let mut reached = 0;

    for i in 1..=order {
        let s: f64 = (0..i).map(|j| r[i - j] * a[j]).sum();
        let rc = -s / gain;
        for j in 1..=i / 2 {
            let at = a[j] + rc * a[i - j];
            a[i - j] += rc * a[j];
            a[j] = at;
        }
        a[i] = rc;

        gain += rc * s;
        if gain <= 0.0 {
            a[i] = 0.0;
            break;
        }
        reached = i;
    }

    frame.gain = gain;
    frame.order_reached = reached;
    frame
}

/// Burg-method LPC.
pub fn frame_burg(segment: ArrayView1<'_, f64>, order: usize) -> Result<LpcFrame> {
    require!(order >= 1, "LPC order must be at least 1");

    let n = segment.len();
    let m = order;
    let mut frame = LpcFrame::flat(order);
    if n < 2 {
        return Ok(frame);
    }

    // One-based work buffers keep the forward/backward error updates readable.
    let mut b1 = vec![0.0; n + 1];
    let mut b2 = vec![0.0; n + 1];
    let mut aa = vec![0.0; m + 1];
    let mut coeffs = vec![0.0; m + 1];

    let power: f64 = segment.dot(&segment);
    let mut xms = power / n as f64;
    if xms <= 0.0 {
        return Ok(frame);
    }

    b1[1] = segment[0];
    b2[n - 1] = segment[n - 1];
    for j in 2..=n {
        b1[j] = segment[j - 1];
        b2[j - 1] = segment[j - 1];
    }

    let mut reached = 0;
    for i in 1..=m {
        let mut num = 0.0;
        let mut denom = 0.0;
        for j in 1..=n.saturating_sub(i) {
            num += b1[j] * b2[j];
            denom += b1[j] * b1[j] + b2[j] * b2[j];
        }
        if denom <= 0.0 {
            xms = 0.0;
            break;
        }

        coeffs[i] = 2.0 * num / denom;
        xms *= 1.0 - coeffs[i] * coeffs[i];
        for j in 1..i {
            coeffs[j] = aa[j] - coeffs[i] * aa[i - j];
        }
        reached = i;

        if i < m {
            aa[1..=i].copy_from_slice(&coeffs[1..=i]);
            for j in 1..n.saturating_sub(i) {
                b1[j] -= aa[i] * b2[j];
                b2[j] = b2[j + 1] - aa[i] * b1[j + 1];
            }
        }
    }

    for k in 1..=m {
        frame.a[k] = -coeffs[k];
    }
    frame.gain = xms * n as f64;
    frame.order_reached = reached;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::filter::fir;
    use approx::assert_abs_diff_eq;

    /// Second-order autoregressive process driven by a deterministic
    /// pseudo-random excitation.
    fn ar2(len: usize, a1: f64, a2: f64) -> Array1<f64> {
        let mut state = 0x2545_f491_u64;
        let mut x = Array1::zeros(len);
        for n in 0..len {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let e = (state % 10_000) as f64 / 5_000.0 - 1.0;
            let mut v = e;
            if n >= 1 {
                v -= a1 * x[n - 1];
            }
            if n >= 2 {
                v -= a2 * x[n - 2];
            }
            x[n] = v;
        }
        x
    }

    #[test]
    fn autocorrelation_recovers_ar2_coefficients() {
        let x = ar2(8000, -1.2, 0.6);
        let frame = frame_auto(x.view(), 2).unwrap();
        assert_abs_diff_eq!(frame.a[0], 1.0);
        assert_abs_diff_eq!(frame.a[1], -1.2, epsilon = 0.05);
        assert_abs_diff_eq!(frame.a[2], 0.6, epsilon = 0.05);
        assert_eq!(frame.order_reached, 2);
        assert!(frame.gain > 0.0);
    }

    #[test]
    fn burg_recovers_ar2_coefficients() {
        let x = ar2(8000, -1.2, 0.6);
        let frame = frame_burg(x.view(), 2).unwrap();
        assert_abs_diff_eq!(frame.a[0], 1.0);
        assert_abs_diff_eq!(frame.a[1], -1.2, epsilon = 0.05);
        assert_abs_diff_eq!(frame.a[2], 0.6, epsilon = 0.05);
    }

    #[test]
    fn methods_agree_on_long_segments() {
        let x = ar2(4000, -0.9, 0.2);
        let auto = LpcFrame::analyze(x.view(), 4, LpcMethod::Autocorrelation).unwrap();
        let burg = LpcFrame::analyze(x.view(), 4, LpcMethod::Burg).unwrap();
        assert_eq!(auto.order(), 4);
        for k in 0..=4 {
            assert_abs_diff_eq!(auto.a[k], burg.a[k], epsilon = 0.05);
        }
    }

    #[test]
    fn prediction_error_has_less_energy_than_signal() {
        let x = ar2(2000, -1.5, 0.7);
        let frame = frame_auto(x.view(), 8).unwrap();
        let err = fir(frame.a.view(), x.view());
        assert!(err.dot(&err) < 0.5 * x.dot(&x));
    }

    #[test]
    fn silent_segment_gives_identity_polynomial() {
        let x = Array1::zeros(64);
        for frame in [
            frame_auto(x.view(), 6).unwrap(),
            frame_burg(x.view(), 6).unwrap(),
        ] {
            assert_eq!(frame.a.len(), 7);
            assert_eq!(frame.a[0], 1.0);
            assert!(frame.a.iter().skip(1).all(|&c| c == 0.0));
            assert_eq!(frame.order_reached, 0);
        }
    }

    #[test]
    fn fully_predictable_first_stage_stops_recursion() {
        // |r[1]| == r[0] leaves no prediction error after one stage.
        let frame = levinson(&[1.0, 1.0, 0.5], 2);
        assert_eq!(frame.order_reached, 0);
        assert_eq!(frame.a.to_vec(), vec![1.0, 0.0, 0.0]);
        assert_eq!(frame.gain, 0.0);
        assert!(frame.a.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn zero_order_is_rejected() {
        let x = Array1::from_elem(16, 1.0);
        assert!(frame_auto(x.view(), 0).is_err());
        assert!(frame_burg(x.view(), 0).is_err());
    }
}
