//! Pitch-agnostic GCI detection from a dyadic multi-scale product.

use ndarray::{s, Array1, ArrayView1};
use tracing::debug;

use crate::error::{ensure_input, require, Result};
use crate::signal::{find_peaks, Extremum};
use crate::types::GlottalPair;

/// Deepest supported decomposition.
pub const MAX_LEVELS: u32 = 24;

/// Input is truncated to a multiple of this many samples (or of the widest
/// dyadic bin when that is larger).
const BLOCK: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct MultiProductDetector {
    levels: u32,
}

impl Default for MultiProductDetector {
    fn default() -> Self {
        Self { levels: 4 }
    }
}

impl MultiProductDetector {
    pub fn new(levels: u32) -> Result<Self> {
        require!(
            (1..=MAX_LEVELS).contains(&levels),
            "decomposition level must be between 1 and {}, got {}",
            MAX_LEVELS,
            levels
        );
        Ok(Self { levels })
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Detect glottal cycles in `signal`.
    ///
    /// Closures are the local minima of the product of the Haar
    /// approximations at scales `2, 4, ..., 2^(levels-1)`. Each opening is
    /// the product's maximum over the last fifth of its cycle, offset from
    /// the cycle's closure, so `gci <= goi <= nextgci` always holds.
    pub fn detect(&self, signal: ArrayView1<'_, f64>, sample_rate: f64) -> Result<Vec<GlottalPair>> {
        ensure_input!(
            sample_rate.is_finite() && sample_rate > 0.0,
            "sample rate must be positive, got {}",
            sample_rate
        );
        ensure_input!(
            signal.iter().all(|v| v.is_finite()),
            "signal contains non-finite samples"
        );

        let product = multi_scale_product(signal, self.levels);
        let negated = product.mapv(|v| -v);
        let gci = find_peaks(negated.view(), Extremum::Maximum);

        let pairs: Vec<GlottalPair> = gci
            .windows(2)
            .map(|cycle| {
                let (start, end) = (cycle[0], cycle[1]);
                let from = (0.8 * start as f64 + 0.2 * end as f64) as usize;
                let offset = argmax(product.slice(s![from..=end]));
                GlottalPair::new(start, start + offset, end)
            })
            .collect();

        debug!(
            levels = self.levels,
            samples = product.len(),
            closures = gci.len(),
            pairs = pairs.len(),
            "multi-product detection finished"
        );
        Ok(pairs)
    }
}

/// Running product of the Haar approximation coefficients of every
/// decomposition stage, each held constant over the samples its bin covers.
///
/// The signal is first truncated to a whole number of blocks; with
/// `levels == 1` no stage runs and the product stays at one.
pub fn multi_scale_product(signal: ArrayView1<'_, f64>, levels: u32) -> Array1<f64> {
    let levels = levels.min(MAX_LEVELS);
    let widest = 1usize << levels.saturating_sub(1);
    let block = BLOCK.max(widest);
    let len = (signal.len() / block) * block;

    let mut approx = signal.slice(s![..len]).to_owned();
    let mut product = Array1::<f64>::ones(len);

    for stage in 1..levels {
        let div = 1usize << stage;
        let width = len / div;
        let next = Array1::from_shape_fn(width, |j| {
            let detail = approx[2 * j + 1] - approx[2 * j];
            approx[2 * j] + detail / 2.0
        });
        for (j, &coeff) in next.iter().enumerate() {
            product
                .slice_mut(s![div * j..div * (j + 1)])
                .mapv_inplace(|p| p * coeff);
        }
        approx = next;
    }
    product
}

/// Index of the first maximum.
fn argmax(x: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, &v) in x.iter().enumerate() {
        if v > x[best] {
            best = i;
        }
    }
    best
}
