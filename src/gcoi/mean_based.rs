use ndarray::{s, Array1, ArrayView1};
use tracing::debug;

use crate::config::SedreamsConfig;
use crate::error::{require, Result};
use crate::signal::filter::{fir, pre_emphasis};
use crate::signal::{normalize_peak, window};

/// Smoothed "mean-based" signal whose oscillation follows the glottal
/// period.
///
/// The waveform is averaged with a unit-sum Blackman-Harris window spanning
/// `mean_based_span` mean periods, re-aligned to zero delay, high-passed
/// repeatedly to strip drift and normalised to a unit peak. The leading
/// half-window samples are zero; the trailing ones carry only the high-pass
/// decay.
pub fn mean_based_signal(
    signal: ArrayView1<'_, f64>,
    sample_rate: f64,
    mean_period: f64,
    config: &SedreamsConfig,
) -> Result<Array1<f64>> {
    let n = signal.len();
    let span = (config.mean_based_span * mean_period * sample_rate / 2.0).round() as usize;
    // Very high F0 at a low rate still smooths over three samples.
    let half = span.max(1).min(n / 3);
    require!(
        half >= 1,
        "mean-based signal needs at least 3 samples, got {}",
        n
    );

    let mut win = window::blackman_harris(2 * half + 1)?;
    let total = win.sum();
    win.mapv_inplace(|v| v / total);

    let averaged = fir(win.view(), signal);
    let mut mean_based = Array1::zeros(n);
    mean_based
        .slice_mut(s![half..n - half])
        .assign(&averaged.slice(s![2 * half..]));

    for _ in 0..config.highpass_passes {
        pre_emphasis(&mut mean_based, sample_rate, config.highpass_cutoff_hz);
    }
    normalize_peak(&mut mean_based);

    debug!(half_window = half, samples = n, "computed mean-based signal");
    Ok(mean_based)
}
