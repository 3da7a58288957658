//! Glottal closure and opening instant (GCI/GOI) estimation.

mod mean_based;
mod multi_product;
mod sedreams;

pub use mean_based::mean_based_signal;
pub use multi_product::{multi_scale_product, MultiProductDetector, MAX_LEVELS};
pub use sedreams::SedreamsDetector;

use ndarray::ArrayView1;

use crate::error::{ensure_input, AnalysisError, Result};
use crate::types::GlottalPair;

/// Detect glottal cycles with the default mean-based-signal heuristics.
pub fn estimate_sedreams(
    signal: ArrayView1<'_, f64>,
    sample_rate: f64,
    mean_f0: f64,
) -> Result<Vec<GlottalPair>> {
    SedreamsDetector::default().detect(signal, sample_rate, mean_f0)
}

/// Detect glottal cycles from the multi-scale product at `levels`.
pub fn estimate_multi_product(
    signal: ArrayView1<'_, f64>,
    sample_rate: f64,
    levels: u32,
) -> Result<Vec<GlottalPair>> {
    MultiProductDetector::new(levels)?.detect(signal, sample_rate)
}

/// Mean open quotient `(nextgci - goi) / (nextgci - gci)` over `pairs`.
///
/// An empty list or a zero-length cycle is an input error rather than NaN.
pub fn estimate_open_quotient(pairs: &[GlottalPair]) -> Result<f64> {
    ensure_input!(
        !pairs.is_empty(),
        "open quotient needs at least one glottal cycle"
    );
    let mut total = 0.0;
    for pair in pairs {
        total += pair.open_fraction().ok_or_else(|| {
            AnalysisError::invalid_input(format!(
                "glottal cycle at sample {} has zero length",
                pair.gci
            ))
        })?;
    }
    Ok(total / pairs.len() as f64)
}
