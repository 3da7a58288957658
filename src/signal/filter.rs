use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1};

/// Apply an all-zero filter `b` to `x`, keeping the output length equal to
/// the input length (the filter starts from rest).
pub fn fir(b: ArrayView1<'_, f64>, x: ArrayView1<'_, f64>) -> Array1<f64> {
    let n = x.len();
    Array1::from_shape_fn(n, |i| {
        b.iter()
            .take(i + 1)
            .enumerate()
            .map(|(k, &coeff)| coeff * x[i - k])
            .sum()
    })
}

/// Direct-form filter with numerator `b` and denominator `a`, normalised by
/// `a[0]`.
pub fn iir(b: ArrayView1<'_, f64>, a: ArrayView1<'_, f64>, x: ArrayView1<'_, f64>) -> Array1<f64> {
    let n = x.len();
    let a0 = a.first().copied().unwrap_or(1.0);
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut acc: f64 = b
            .iter()
            .take(i + 1)
            .enumerate()
            .map(|(k, &coeff)| coeff * x[i - k])
            .sum();
        for (k, &coeff) in a.iter().enumerate().take(i + 1).skip(1) {
            acc -= coeff * y[i - k] / a0;
        }
        y[i] = acc;
    }
    y
}

/// Full linear convolution, length `a.len() + b.len() - 1`. Used to compose
/// polynomial filters.
pub fn convolve(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Array1<f64> {
    if a.is_empty() || b.is_empty() {
        return Array1::zeros(0);
    }
    let mut out = Array1::zeros(a.len() + b.len() - 1);
    for (i, &av) in a.iter().enumerate() {
        for (j, &bv) in b.iter().enumerate() {
            out[i + j] += av * bv;
        }
    }
    out
}

/// First-order high-pass pre-emphasis in place. Frequencies at or above the
/// Nyquist limit leave the signal untouched.
pub fn pre_emphasis(x: &mut Array1<f64>, sample_rate: f64, frequency: f64) {
    if x.is_empty() || frequency >= 0.5 * sample_rate {
        return;
    }
    let factor = 1.0 / (2.0 * PI * frequency / sample_rate + 1.0);

    let mut previous_in = x[0];
    let mut previous_out = x[0];
    for i in 1..x.len() {
        let current = x[i];
        let out = factor * (previous_out + current - previous_in);
        x[i] = out;
        previous_in = current;
        previous_out = out;
    }
}
