use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use glottalyzer::audio::{decoder, encoder};
use glottalyzer::config::AnalysisConfig;
use glottalyzer::gcoi::{estimate_open_quotient, MultiProductDetector, SedreamsDetector};
use glottalyzer::iaif::inverse_filter_with;
use glottalyzer::types::{self, AudioData, GlottalPair};
use ndarray::ArrayView1;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Glottalyzer - glottal closure and opening instant estimation
///
/// Locates glottal closure (GCI) and opening (GOI) instants in a voiced WAV
/// recording and prints them, with the open quotient, as JSON.
#[derive(Parser, Debug)]
#[command(name = "glottalyzer")]
#[command(version = "0.1.0")]
#[command(about = "Glottal closure and opening instant estimation", long_about = None)]
struct Args {
    /// Input WAV file path
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Detection method
    #[arg(long, value_enum, default_value_t = Method::Sedreams)]
    method: Method,

    /// Mean F0 in Hz for the sedreams method (falls back to the configured default)
    #[arg(long, value_name = "HZ")]
    mean_f0: Option<f64>,

    /// Decomposition depth for the multi-product method
    #[arg(long, value_name = "N")]
    levels: Option<u32>,

    /// Analysis configuration (inline JSON string)
    #[arg(long, value_name = "JSON", conflicts_with = "config_file")]
    config_json: Option<String>,

    /// Path to JSON analysis configuration
    #[arg(long, value_name = "PATH", conflicts_with = "config_json")]
    config_file: Option<PathBuf>,

    /// Write the IAIF glottal source estimate to this WAV file
    #[arg(long, value_name = "PATH")]
    source_out: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Method {
    Sedreams,
    MultiProduct,
}

impl Args {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        if !self.input_file.exists() {
            anyhow::bail!("Input file does not exist: {:?}", self.input_file);
        }
        if !self.input_file.is_file() {
            anyhow::bail!("Input path is not a file: {:?}", self.input_file);
        }
        if let Some(f0) = self.mean_f0 {
            ensure!(
                f0.is_finite() && f0 > 0.0,
                "Mean F0 must be positive, got: {}",
                f0
            );
        }
        if self.levels.is_some() && self.method != Method::MultiProduct {
            anyhow::bail!("--levels only applies to --method multi-product");
        }
        if self.mean_f0.is_some() && self.method != Method::Sedreams {
            anyhow::bail!("--mean-f0 only applies to --method sedreams");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Report {
    sample_rate: u32,
    samples: usize,
    method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    assumed_f0: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    levels: Option<u32>,
    pairs: Vec<GlottalPair>,
    open_quotient: Option<f64>,
    mean_f0: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glottalyzer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.validate()
        .context("Failed to validate command-line arguments")?;

    let config = AnalysisConfig::load(args.config_file.as_deref(), args.config_json.as_deref())
        .context("Failed to load analysis configuration")?;

    let audio = decoder::decode_wav(&args.input_file).context("Failed to decode input audio")?;
    info!(
        samples = audio.samples.len(),
        sample_rate = audio.sample_rate,
        duration_secs = audio.duration_secs(),
        "loaded input audio"
    );

    let report = analyze(&args, &config, &audio)?;

    if let Some(path) = &args.source_out {
        write_glottal_source(&audio, &config, path)?;
    }

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn analyze(args: &Args, config: &AnalysisConfig, audio: &AudioData) -> Result<Report> {
    let signal = ArrayView1::from(&audio.samples[..]);
    let fs = f64::from(audio.sample_rate);

    let (pairs, assumed_f0, levels) = match args.method {
        Method::Sedreams => {
            let f0 = config.sedreams.plausible_f0(args.mean_f0);
            let pairs = SedreamsDetector::new(config.sedreams.clone())
                .detect(signal, fs, f0)
                .context("Sedreams detection failed")?;
            (pairs, Some(f0), None)
        }
        Method::MultiProduct => {
            let levels = args.levels.unwrap_or(config.multi_product.levels);
            let pairs = MultiProductDetector::new(levels)
                .and_then(|detector| detector.detect(signal, fs))
                .context("Multi-product detection failed")?;
            (pairs, None, Some(levels))
        }
    };
    info!(method = ?args.method, pairs = pairs.len(), "detected glottal cycles");

    let (open_quotient, mean_f0) = if pairs.is_empty() {
        (None, None)
    } else {
        (
            Some(estimate_open_quotient(&pairs).context("Failed to estimate open quotient")?),
            Some(types::mean_f0(&pairs, fs).context("Failed to estimate mean F0")?),
        )
    };

    Ok(Report {
        sample_rate: audio.sample_rate,
        samples: audio.samples.len(),
        method: args.method,
        assumed_f0,
        levels,
        pairs,
        open_quotient,
        mean_f0,
    })
}

fn write_glottal_source(audio: &AudioData, config: &AnalysisConfig, path: &Path) -> Result<()> {
    let signal = ArrayView1::from(&audio.samples[..]);
    let mut source = inverse_filter_with(signal, f64::from(audio.sample_rate), &config.iaif)
        .context("Inverse filtering failed")?;
    glottalyzer::signal::normalize_peak(&mut source);

    let output = AudioData {
        samples: source.to_vec(),
        sample_rate: audio.sample_rate,
    };
    encoder::encode_wav(&output, path)
        .with_context(|| format!("Failed to write glottal source to {:?}", path))?;
    info!(path = ?path, "wrote glottal source estimate");
    Ok(())
}
