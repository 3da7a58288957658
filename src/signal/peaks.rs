use ndarray::{Array1, ArrayView1};

/// Polarity of the extrema searched by [`find_peaks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Maximum,
    Minimum,
}

impl Extremum {
    fn sign(self) -> f64 {
        match self {
            Extremum::Maximum => 1.0,
            Extremum::Minimum => -1.0,
        }
    }
}

/// Locate local extrema of `signal`.
///
/// An index `n` is emitted when the first difference changes sign (or is
/// flat) between `n` and `n + 1` and the second difference at `n + 1`, scaled
/// by the polarity, is negative. The last sample never qualifies. Output is
/// strictly ascending.
pub fn find_peaks(signal: ArrayView1<'_, f64>, extremum: Extremum) -> Vec<usize> {
    let n = signal.len();
    if n < 3 {
        return Vec::new();
    }

    let mut df1 = Array1::zeros(n);
    for i in 1..n {
        df1[i] = signal[i] - signal[i - 1];
    }
    df1[0] = df1[1];

    let sign = extremum.sign();
    let mut df2 = Array1::zeros(n);
    for i in 1..n {
        df2[i] = df1[i] - df1[i - 1];
    }
    df2[1] = df2[2];
    df2[0] = df2[2];
    df2.mapv_inplace(|v| v * sign);

    (0..n - 1)
        .filter(|&i| df1[i] * df1[i + 1] <= 0.0 && df2[i + 1] < 0.0)
        .collect()
}

/// Indices `t` where the signal crosses zero between `t` and `t + 1`, split
/// into positive-going (or touching zero) and negative-going crossings.
pub fn find_zero_crossings(signal: ArrayView1<'_, f64>) -> (Vec<usize>, Vec<usize>) {
    let mut rising = Vec::new();
    let mut falling = Vec::new();
    for (t, pair) in signal.windows(2).into_iter().enumerate() {
        let (current, next) = (pair[0], pair[1]);
        if current * next <= 0.0 {
            if next >= 0.0 {
                rising.push(t);
            } else {
                falling.push(t);
            }
        }
    }
    (rising, falling)
}
