//! Core types shared by the glottal-instant detectors

use serde::Serialize;

use crate::error::{ensure_input, Result};

/// Raw audio data representation (mono, f64 samples)
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f64>,
    /// Sample rate in Hz (e.g., 16000)
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// One glottal cycle: closure, opening and the closure that ends the cycle.
///
/// All fields are sample indices into the analysed signal. Detectors emit
/// pairs ordered by `gci`; `gci < goi < nextgci` is the expected layout but
/// is not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlottalPair {
    pub gci: usize,
    pub goi: usize,
    pub nextgci: usize,
}

impl GlottalPair {
    pub fn new(gci: usize, goi: usize, nextgci: usize) -> Self {
        Self { gci, goi, nextgci }
    }

    /// Length of the glottal cycle in samples.
    pub fn period(&self) -> usize {
        self.nextgci.saturating_sub(self.gci)
    }

    /// Fraction of the cycle during which the glottis is open.
    pub fn open_fraction(&self) -> Option<f64> {
        let period = self.period();
        if period == 0 {
            return None;
        }
        let open = self.nextgci as f64 - self.goi as f64;
        Some(open / period as f64)
    }
}

/// Mean fundamental frequency implied by consecutive closures.
pub fn mean_f0(pairs: &[GlottalPair], sample_rate: f64) -> Result<f64> {
    ensure_input!(
        sample_rate > 0.0 && sample_rate.is_finite(),
        "sample rate must be positive, got {}",
        sample_rate
    );
    ensure_input!(!pairs.is_empty(), "cannot derive F0 from an empty pair list");

    let mut total = 0.0;
    for pair in pairs {
        let period = pair.period();
        ensure_input!(period > 0, "pair at gci {} has a zero-length period", pair.gci);
        total += sample_rate / period as f64;
    }
    Ok(total / pairs.len() as f64)
}
