use anyhow::Result;
use glottalyzer::config::IaifConfig;
use glottalyzer::iaif::inverse_filter_with;
use glottalyzer::inverse_filter;
use ndarray::{s, Array1, ArrayView1};

const PERIOD: usize = 80;

fn impulse_train(len: usize) -> Array1<f64> {
    Array1::from_shape_fn(len, |i| if i % PERIOD == PERIOD / 2 { 1.0 } else { 0.0 })
}

/// Lag in `lags` with the largest normalized autocorrelation.
fn dominant_lag(x: ArrayView1<'_, f64>, lags: std::ops::RangeInclusive<usize>) -> usize {
    let mut best = (*lags.start(), f64::MIN);
    for lag in lags {
        let a = x.slice(s![..x.len() - lag]);
        let b = x.slice(s![lag..]);
        let norm = (a.dot(&a) * b.dot(&b)).sqrt();
        if norm == 0.0 {
            continue;
        }
        let r = a.dot(&b) / norm;
        if r > best.1 {
            best = (lag, r);
        }
    }
    best.0
}

#[test]
fn glottal_source_keeps_the_excitation_period() -> Result<()> {
    let x = impulse_train(1600);
    let g = inverse_filter(x.view(), 12, 4, 0.99)?;
    assert_eq!(g.len(), x.len());
    assert!(g.iter().all(|v| v.is_finite()));

    let lag = dominant_lag(g.slice(s![800..]), 40..=120);
    assert!(lag.abs_diff(PERIOD) <= 1, "dominant lag {lag}");
    Ok(())
}

#[test]
fn configured_orders_follow_sample_rate() -> Result<()> {
    let x = impulse_train(1600);
    let config = IaifConfig::default();
    assert_eq!(config.orders(8_000.0), (12, 4));

    let g = inverse_filter_with(x.view(), 8_000.0, &config)?;
    let direct = inverse_filter(x.view(), 12, 4, config.lip_radiation)?;
    assert_eq!(g, direct);
    Ok(())
}

#[test]
fn rejects_degenerate_segments() {
    let x = impulse_train(1);
    assert!(inverse_filter(x.view(), 12, 4, 0.99).is_err());

    let mut y = impulse_train(400);
    y[3] = f64::NAN;
    assert!(inverse_filter(y.view(), 12, 4, 0.99).is_err());
}
