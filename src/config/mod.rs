use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

use crate::lpc::LpcMethod;
use crate::signal::WindowKind;

/// Tunables for every detector, loadable from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sedreams: SedreamsConfig,
    pub multi_product: MultiProductConfig,
    pub iaif: IaifConfig,
}

impl AnalysisConfig {
    /// Load from a JSON file or an inline JSON string, falling back to the
    /// defaults when neither is given.
    pub fn load(path: Option<&Path>, json: Option<&str>) -> Result<Self> {
        let config = match (path, json) {
            (Some(_), Some(_)) => bail!("provide either a config file or inline JSON, not both"),
            (Some(p), None) => {
                let data = fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file {:?}", p))?;
                parse_config(&data)?
            }
            (None, Some(raw)) => parse_config(raw)?,
            (None, None) => Self::default(),
        };
        config.validate().context("Config validation failed")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.sedreams.validate()?;
        self.multi_product.validate()?;
        self.iaif.validate()?;
        Ok(())
    }
}

fn parse_config(raw: &str) -> Result<AnalysisConfig> {
    serde_json::from_str(raw).context("Failed to parse config JSON")
}

/// Heuristic constants of the mean-based-signal detector.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SedreamsConfig {
    /// LPC residual frame length in milliseconds.
    pub residual_frame_ms: f64,
    /// LPC residual hop in milliseconds.
    pub residual_hop_ms: f64,
    /// Taper applied to each residual frame.
    pub residual_window: WindowKind,
    pub lpc_order: usize,
    pub lpc_method: LpcMethod,
    /// Mean-based window length in mean periods.
    pub mean_based_span: f64,
    pub highpass_passes: usize,
    pub highpass_cutoff_hz: f64,
    /// GCI search window after each mean-based minimum, in mean periods.
    pub gci_search_span: f64,
    pub gci_threshold: f64,
    /// GOI search window after each mean-based maximum, in mean periods.
    pub goi_search_span: f64,
    pub goi_threshold: f64,
    /// F0 substituted when the caller's estimate is implausible.
    pub default_f0: f64,
    /// Exclusive lower bound of a plausible F0 estimate.
    pub min_f0: f64,
    /// Inclusive upper bound of a plausible F0 estimate.
    pub max_f0: f64,
}

impl Default for SedreamsConfig {
    fn default() -> Self {
        Self {
            residual_frame_ms: 25.0,
            residual_hop_ms: 5.0,
            residual_window: WindowKind::Hanning,
            lpc_order: 24,
            lpc_method: LpcMethod::Autocorrelation,
            mean_based_span: 1.75,
            highpass_passes: 20,
            highpass_cutoff_hz: 50.0,
            gci_search_span: 0.25,
            gci_threshold: 0.4,
            goi_search_span: 0.15,
            goi_threshold: 0.2,
            default_f0: 180.0,
            min_f0: 50.0,
            max_f0: 2500.0,
        }
    }
}

impl SedreamsConfig {
    /// The caller's F0 estimate when it lies in `(min_f0, max_f0]`,
    /// otherwise `default_f0`.
    pub fn plausible_f0(&self, estimate: Option<f64>) -> f64 {
        match estimate {
            Some(f0) if f0 > self.min_f0 && f0 <= self.max_f0 => f0,
            _ => self.default_f0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.residual_frame_ms > 0.0,
            "residual_frame_ms must be positive"
        );
        ensure!(self.residual_hop_ms > 0.0, "residual_hop_ms must be positive");
        ensure!(self.lpc_order > 0, "lpc_order must be greater than zero");
        ensure!(self.mean_based_span > 0.0, "mean_based_span must be positive");
        ensure!(
            self.highpass_cutoff_hz > 0.0,
            "highpass_cutoff_hz must be positive"
        );
        ensure!(
            self.gci_search_span >= 0.0 && self.goi_search_span >= 0.0,
            "search spans must be non-negative"
        );
        ensure!(
            self.min_f0 >= 0.0 && self.max_f0 > self.min_f0,
            "F0 range ({}, {}] is empty",
            self.min_f0,
            self.max_f0
        );
        ensure!(
            self.default_f0 > self.min_f0 && self.default_f0 <= self.max_f0,
            "default_f0 {} must lie inside the plausible F0 range",
            self.default_f0
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MultiProductConfig {
    /// Decomposition level; `levels - 1` dyadic stages contribute to the
    /// product.
    pub levels: u32,
}

impl Default for MultiProductConfig {
    fn default() -> Self {
        Self { levels: 4 }
    }
}

impl MultiProductConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=crate::gcoi::MAX_LEVELS).contains(&self.levels),
            "levels must be between 1 and {}, got {}",
            crate::gcoi::MAX_LEVELS,
            self.levels
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IaifConfig {
    /// Lip radiation coefficient `d` of `1 / (1 - d z^-1)`.
    pub lip_radiation: f64,
    pub vocal_tract_order: Option<usize>,
    pub glottis_order: Option<usize>,
}

impl Default for IaifConfig {
    fn default() -> Self {
        Self {
            lip_radiation: 0.99,
            vocal_tract_order: None,
            glottis_order: None,
        }
    }
}

impl IaifConfig {
    /// Vocal tract and glottis orders for `sample_rate`, derived from the rate
    /// unless set explicitly.
    pub fn orders(&self, sample_rate: f64) -> (usize, usize) {
        let vocal_tract = self
            .vocal_tract_order
            .unwrap_or_else(|| 2 * (sample_rate / 2000.0).round() as usize + 4);
        let glottis = self
            .glottis_order
            .unwrap_or_else(|| (2 * (sample_rate / 4000.0).round() as usize).max(1));
        (vocal_tract, glottis)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.lip_radiation.is_finite() && self.lip_radiation.abs() < 1.0,
            "lip_radiation must lie in (-1, 1), got {}",
            self.lip_radiation
        );
        ensure!(
            self.vocal_tract_order != Some(0) && self.glottis_order != Some(0),
            "IAIF orders must be greater than zero"
        );
        Ok(())
    }
}
