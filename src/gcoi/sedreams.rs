//! Pitch-informed GCI/GOI detection from the LPC residual and the
//! mean-based signal.

use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

use super::mean_based::mean_based_signal;
use crate::config::SedreamsConfig;
use crate::error::{ensure_input, Result};
use crate::lpc::residual_with_method;
use crate::signal::{find_peaks, Extremum};
use crate::types::GlottalPair;

#[derive(Debug, Clone, Default)]
pub struct SedreamsDetector {
    config: SedreamsConfig,
}

impl SedreamsDetector {
    pub fn new(config: SedreamsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SedreamsConfig {
        &self.config
    }

    /// Detect glottal cycles in `signal` given its mean F0 in Hz.
    ///
    /// Closures are the strongest residual samples shortly after each
    /// minimum of the mean-based signal, openings the strongest shortly
    /// after each maximum. A cycle is reported only when an opening falls
    /// strictly between its two closures.
    pub fn detect(
        &self,
        signal: ArrayView1<'_, f64>,
        sample_rate: f64,
        mean_f0: f64,
    ) -> Result<Vec<GlottalPair>> {
        ensure_input!(
            sample_rate.is_finite() && sample_rate > 0.0,
            "sample rate must be positive, got {}",
            sample_rate
        );
        ensure_input!(
            mean_f0.is_finite() && mean_f0 > 0.0,
            "mean F0 must be positive, got {}",
            mean_f0
        );

        let n = signal.len();
        if n < 3 {
            return Ok(Vec::new());
        }
        let config = &self.config;
        let mean_period = 1.0 / mean_f0;

        let mut res = residual_with_method(
            signal,
            (config.residual_frame_ms / 1000.0 * sample_rate).round() as usize,
            (config.residual_hop_ms / 1000.0 * sample_rate).round() as usize,
            config.lpc_order,
            config.lpc_method,
            config.residual_window,
        )?;
        res.mapv_inplace(|v| if v.is_normal() { v } else { 0.0 });

        let mean_based = mean_based_signal(signal, sample_rate, mean_period, config)?;
        let maxima = find_peaks(mean_based.view(), Extremum::Maximum);
        let minima = find_peaks(mean_based.view(), Extremum::Minimum);

        let gci_span = (config.gci_search_span * sample_rate * mean_period).round() as usize;
        let goi_span = (config.goi_search_span * sample_rate * mean_period).round() as usize;

        let mut gci: Vec<usize> = minima
            .iter()
            .map(|&start| strongest_above(&res, start, gci_span, config.gci_threshold))
            .collect();
        gci.sort_unstable();
        gci.dedup();

        let goi: Vec<usize> = maxima
            .iter()
            .map(|&start| strongest_above(&res, start, goi_span, config.goi_threshold))
            .collect();

        let pairs = pair_instants(&gci, &goi);
        let candidates = gci.len().saturating_sub(1);
        if pairs.len() < candidates {
            warn!(
                dropped = candidates - pairs.len(),
                candidates,
                "cycles without an opening instant were dropped"
            );
        }
        debug!(
            closures = gci.len(),
            openings = goi.len(),
            pairs = pairs.len(),
            "sedreams detection finished"
        );
        Ok(pairs)
    }
}

/// Index of the largest residual sample above `threshold` within
/// `[start, start + span]`, or `start` when none qualifies. Ties keep the
/// earliest index.
fn strongest_above(res: &Array1<f64>, start: usize, span: usize, threshold: f64) -> usize {
    let end = (start + span).min(res.len() - 1);
    let mut best = start;
    let mut best_value = f64::MIN;
    for i in start..=end {
        let value = res[i];
        if value > threshold && value > best_value {
            best = i;
            best_value = value;
        }
    }
    best
}

/// Chain ascending closures into cycles, attaching the first opening that
/// falls strictly inside each cycle.
fn pair_instants(gci: &[usize], goi: &[usize]) -> Vec<GlottalPair> {
    gci.windows(2)
        .filter_map(|cycle| {
            let (start, end) = (cycle[0], cycle[1]);
            goi.iter()
                .copied()
                .find(|&opening| start < opening && opening < end)
                .map(|opening| GlottalPair::new(start, opening, end))
        })
        .collect()
}
