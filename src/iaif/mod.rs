//! Iterative adaptive inverse filtering (IAIF).
//!
//! Separates a voiced frame into glottal and vocal-tract contributions by
//! alternating LPC fits and inverse filtering, returning the glottal source
//! estimate for the frame.

use ndarray::{s, Array1, ArrayView1};
use tracing::debug;

use crate::config::IaifConfig;
use crate::error::{ensure_input, require, Result};
use crate::lpc::frame_auto;
use crate::signal::filter::{convolve, fir, iir};
use crate::signal::window;

/// Glottal source estimate of `segment`, same length as the input.
///
/// `vocal_tract_order` and `glottis_order` are the LPC orders of the
/// vocal-tract and glottal models, `lip_radiation` the coefficient `d` of the
/// lip-radiation integrator `1 / (1 - d z^-1)`.
pub fn inverse_filter(
    segment: ArrayView1<'_, f64>,
    vocal_tract_order: usize,
    glottis_order: usize,
    lip_radiation: f64,
) -> Result<Array1<f64>> {
    require!(segment.len() >= 2, "IAIF needs at least two samples");
    require!(vocal_tract_order >= 1, "vocal tract order must be at least 1");
    require!(glottis_order >= 1, "glottis order must be at least 1");
    ensure_input!(
        lip_radiation.is_finite(),
        "lip radiation coefficient must be finite"
    );
    ensure_input!(
        segment.iter().all(|v| v.is_finite()),
        "segment contains non-finite samples"
    );

    let ns = segment.len();
    let preframe = 2 * vocal_tract_order + 1;
    let win = window::hamming(ns)?;

    // A ramp into the first sample keeps filter start-up transients out of
    // the analysed part.
    let mut extended = Array1::zeros(ns + preframe);
    extended
        .slice_mut(s![..preframe])
        .assign(&Array1::linspace(-segment[0], segment[0], preframe));
    extended.slice_mut(s![preframe..]).assign(&segment);

    let one = Array1::from_elem(1, 1.0);
    let lip = Array1::from_vec(vec![1.0, -lip_radiation]);
    let lip_cancelled = iir(one.view(), lip.view(), segment);
    let extended = iir(one.view(), lip.view(), extended.view());

    // Inverse-filter the extended signal, keep the analysed tail and fit a
    // new model to its windowed version.
    let refit = |poly: &Array1<f64>, order: usize| -> Result<Array1<f64>> {
        let filtered = fir(poly.view(), extended.view());
        let tail = &filtered.slice(s![preframe..]) * &win;
        Ok(frame_auto(tail.view(), order)?.a)
    };

    // Gross glottal contribution, refined by cascaded first-order fits.
    let windowed = &lip_cancelled * &win;
    let mut stage = frame_auto(windowed.view(), 1)?.a;
    let mut gross_glottis = stage.clone();
    for _ in 1..glottis_order {
        stage = refit(&stage, 1)?;
        gross_glottis = convolve(gross_glottis.view(), stage.view());
    }

    let gross_tract = refit(&gross_glottis, vocal_tract_order)?;
    let fine_glottis = refit(&gross_tract, glottis_order)?;
    let fine_tract = refit(&fine_glottis, vocal_tract_order)?;

    let source = fir(fine_tract.view(), extended.view());
    debug!(
        samples = ns,
        vocal_tract_order, glottis_order, "inverse filtered frame"
    );
    Ok(source.slice(s![preframe..]).to_owned())
}

/// [`inverse_filter`] with orders and lip radiation taken from `config`.
pub fn inverse_filter_with(
    segment: ArrayView1<'_, f64>,
    sample_rate: f64,
    config: &IaifConfig,
) -> Result<Array1<f64>> {
    ensure_input!(
        sample_rate.is_finite() && sample_rate > 0.0,
        "sample rate must be positive, got {}",
        sample_rate
    );
    let (vocal_tract, glottis) = config.orders(sample_rate);
    inverse_filter(segment, vocal_tract, glottis, config.lip_radiation)
}
