//! Signal-processing building blocks shared by the LPC, inverse-filtering
//! and glottal-instant modules.

pub mod filter;
pub mod peaks;
pub mod window;

pub use peaks::{find_peaks, find_zero_crossings, Extremum};
pub use window::WindowKind;

use ndarray::{Array1, ArrayView1};

/// Largest absolute sample value, `0.0` for an empty signal.
pub fn max_abs(x: ArrayView1<'_, f64>) -> f64 {
    x.fold(0.0_f64, |acc, &v| acc.max(v.abs()))
}

/// Scale `x` so its largest absolute value is 1. All-zero signals are left
/// untouched.
pub fn normalize_peak(x: &mut Array1<f64>) {
    let peak = max_abs(x.view());
    if peak > 0.0 && peak.is_finite() {
        x.mapv_inplace(|v| v / peak);
    }
}

/// Sum of squared samples.
pub fn energy(x: ArrayView1<'_, f64>) -> f64 {
    x.dot(&x)
}
