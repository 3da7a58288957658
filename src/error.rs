use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Convenient alias for results returned by the analysis modules.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Broad category of an analysis failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input data cannot produce a finite result (empty pair list,
    /// non-positive frequency, non-finite samples).
    InvalidInput,
    /// A caller contract on sizes or orders was violated.
    Precondition,
}

/// Error raised by the signal-analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisError {
    kind: ErrorKind,
    message: Arc<str>,
}

impl AnalysisError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Arc::from(message.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::InvalidInput => write!(f, "invalid input: {}", self.message),
            ErrorKind::Precondition => write!(f, "precondition violated: {}", self.message),
        }
    }
}

impl Error for AnalysisError {}

/// Fail with [`ErrorKind::Precondition`] unless `condition` holds.
macro_rules! require {
    ($condition:expr, $($arg:tt)+) => {
        if !$condition {
            return Err($crate::error::AnalysisError::precondition(format!($($arg)+)));
        }
    };
}

/// Fail with [`ErrorKind::InvalidInput`] unless `condition` holds.
macro_rules! ensure_input {
    ($condition:expr, $($arg:tt)+) => {
        if !$condition {
            return Err($crate::error::AnalysisError::invalid_input(format!($($arg)+)));
        }
    };
}

pub(crate) use {ensure_input, require};
