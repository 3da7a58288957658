//! Glottal closure and opening instant estimation.
//!
//! The crate combines LPC inverse filtering, a mean-based smoothing of the
//! waveform and a dyadic multi-scale product to locate glottal closure (GCI)
//! and opening (GOI) instants, and reduces them to an open quotient.

pub mod audio;
pub mod config;
pub mod error;
pub mod gcoi;
pub mod iaif;
pub mod lpc;
pub mod signal;
pub mod types;

pub use error::{AnalysisError, ErrorKind, Result};
pub use gcoi::{estimate_multi_product, estimate_open_quotient, estimate_sedreams};
pub use iaif::inverse_filter;
pub use lpc::residual as lpc_residual;
pub use types::GlottalPair;
