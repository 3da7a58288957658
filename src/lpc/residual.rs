use ndarray::{s, Array1, ArrayView1};
use tracing::debug;

use super::{LpcFrame, LpcMethod};
use crate::error::{ensure_input, require, Result};
use crate::signal::filter::fir;
use crate::signal::{energy, normalize_peak, WindowKind};

/// LPC prediction residual of `signal` using autocorrelation LPC over
/// Hanning-windowed frames.
///
/// See [`residual_with_method`].
pub fn residual(
    signal: ArrayView1<'_, f64>,
    frame_len: usize,
    hop: usize,
    order: usize,
) -> Result<Array1<f64>> {
    residual_with_method(
        signal,
        frame_len,
        hop,
        order,
        LpcMethod::Autocorrelation,
        WindowKind::Hanning,
    )
}

/// LPC prediction residual computed by overlap-add of tapered frames.
///
/// Each frame is whitened by its own LPC polynomial and rescaled to the
/// energy of the windowed input. Samples past the last complete frame stay
/// zero. The result is normalised to a peak magnitude of 1 unless it is
/// identically zero.
pub fn residual_with_method(
    signal: ArrayView1<'_, f64>,
    frame_len: usize,
    hop: usize,
    order: usize,
    method: LpcMethod,
    window: WindowKind,
) -> Result<Array1<f64>> {
    require!(hop >= 1, "residual hop size must be at least 1 sample");
    ensure_input!(
        signal.iter().all(|v| v.is_finite()),
        "signal contains non-finite samples"
    );

    let len = signal.len();
    let win = window.generate(frame_len)?;
    let mut res = Array1::zeros(len);

    let mut frames = 0usize;
    let mut silent = 0usize;
    let mut start = 0;
    while start + frame_len <= len {
        let stop = start + frame_len;
        let segment = &signal.slice(s![start..stop]) * &win;
        let segment_energy = energy(segment.view());
        frames += 1;

        if segment_energy > 0.0 {
            let frame = LpcFrame::analyze(segment.view(), order, method)?;
            let mut inv = fir(frame.a.view(), segment.view());
            let filtered_energy = energy(inv.view());
            if filtered_energy > 0.0 {
                inv *= (segment_energy / filtered_energy).sqrt();
                let mut target = res.slice_mut(s![start..stop]);
                target += &inv;
            } else {
                silent += 1;
            }
        } else {
            silent += 1;
        }

        start += hop;
    }

    debug!(frames, silent, frame_len, hop, order, "computed LPC residual");

    normalize_peak(&mut res);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::max_abs;
    use approx::assert_abs_diff_eq;

    fn pulse_train(len: usize, period: usize) -> Array1<f64> {
        // Impulses through a damped resonator, a crude voiced vowel.
        let (r, theta) = (0.95_f64, 2.0 * std::f64::consts::PI * 700.0 / 16_000.0);
        let (c1, c2) = (2.0 * r * theta.cos(), -r * r);
        let mut x = Array1::zeros(len);
        for n in 0..len {
            let excitation = if n % period == 5 { 1.0 } else { 0.0 };
            let mut v = excitation;
            if n >= 1 {
                v += c1 * x[n - 1];
            }
            if n >= 2 {
                v += c2 * x[n - 2];
            }
            x[n] = v;
        }
        x
    }

    #[test]
    fn residual_is_same_length_and_peak_normalised() {
        let x = pulse_train(4000, 120);
        let res = residual(x.view(), 400, 80, 24).unwrap();
        assert_eq!(res.len(), x.len());
        assert_abs_diff_eq!(max_abs(res.view()), 1.0, epsilon = 1e-12);
        assert!(res.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn trailing_samples_past_last_frame_stay_zero() {
        let x = pulse_train(1000, 100);
        let res = residual(x.view(), 400, 250, 12).unwrap();
        // Frames start at 0, 250 and 500; the last one ends at 900.
        assert!(res.slice(s![900..]).iter().all(|&v| v == 0.0));
        assert!(res.slice(s![..900]).iter().any(|&v| v != 0.0));
    }

    #[test]
    fn residual_peaks_near_excitation() {
        let x = pulse_train(4000, 160);
        let res = residual(x.view(), 400, 80, 16).unwrap();
        let peak = res
            .iter()
            .enumerate()
            .skip(800)
            .take(1600)
            .fold((0, f64::MIN), |best, (i, &v)| if v.abs() > best.1 { (i, v.abs()) } else { best });
        assert!(peak.0 % 160 <= 8, "strongest residual sample at {}", peak.0);
    }

    #[test]
    fn silent_signal_yields_zero_residual() {
        let x = Array1::zeros(1000);
        let res = residual(x.view(), 400, 80, 24).unwrap();
        assert_eq!(res.len(), 1000);
        assert!(res.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn shorter_signal_than_frame_yields_zeros() {
        let x = pulse_train(100, 40);
        let res = residual(x.view(), 400, 80, 24).unwrap();
        assert!(res.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn burg_residual_is_normalised() {
        let x = pulse_train(3000, 110);
        let res = residual_with_method(x.view(), 400, 80, 18, LpcMethod::Burg, WindowKind::Hanning)
            .unwrap();
        assert_abs_diff_eq!(max_abs(res.view()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn alternative_windows_keep_excitation_peak() {
        let x = pulse_train(4000, 160);
        for window in [WindowKind::Hamming, WindowKind::Kaiser, WindowKind::Gaussian] {
            let res =
                residual_with_method(x.view(), 400, 80, 16, LpcMethod::Autocorrelation, window)
                    .unwrap();
            assert_abs_diff_eq!(max_abs(res.view()), 1.0, epsilon = 1e-12);
            assert!(res.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn rejects_bad_arguments() {
        let x = pulse_train(1000, 100);
        assert!(residual(x.view(), 400, 0, 24).is_err());
        assert!(residual(x.view(), 1, 80, 24).is_err());
        let mut bad = x.clone();
        bad[10] = f64::NAN;
        assert!(residual(bad.view(), 400, 80, 24).is_err());
    }
}
