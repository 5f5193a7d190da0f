//! Domain error types.

/// Failure evaluating a single price series (momentum score or regime).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// A price that cannot be log-transformed or compared: non-positive or non-finite.
    #[error("invalid price {value} at index {index}")]
    InvalidPrice { index: usize, value: f64 },

    #[error("insufficient data: have {have} samples, need {need}")]
    InsufficientData { have: usize, need: usize },
}

/// Top-level error type for qualmom.
#[derive(Debug, thiserror::Error)]
pub enum QualmomError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid input: {reason}")]
    Domain { reason: String },

    #[error("{code}: {source}")]
    Series {
        code: String,
        #[source]
        source: SeriesError,
    },

    #[error("{failed} of {total} candidates could not be scored")]
    PartialSelection { failed: usize, total: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QualmomError {
    pub fn series(code: &str, source: SeriesError) -> Self {
        QualmomError::Series {
            code: code.to_string(),
            source,
        }
    }
}

impl From<&QualmomError> for std::process::ExitCode {
    fn from(err: &QualmomError) -> Self {
        let code: u8 = match err {
            QualmomError::Io(_) => 1,
            QualmomError::ConfigParse { .. }
            | QualmomError::ConfigMissing { .. }
            | QualmomError::ConfigInvalid { .. } => 2,
            QualmomError::Data { .. } | QualmomError::NoData { .. } => 3,
            QualmomError::Domain { .. } | QualmomError::Series { .. } => 4,
            QualmomError::PartialSelection { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
