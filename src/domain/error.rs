//! Domain error types.

/// Top-level error type for crossgate.
#[derive(Debug, thiserror::Error)]
pub enum CrossgateError {
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

    #[error("data retrieval error: {reason}")]
    DataRetrieval { reason: String },

    #[error("cannot reach {endpoint}: {reason}")]
    Connectivity { endpoint: String, reason: String },

    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("insufficient data for {series}: have {bars} bars, need {minimum}")]
    InsufficientData {
        series: String,
        bars: usize,
        minimum: usize,
    },

    #[error("insufficient history: have {closes} daily closes, need {minimum}")]
    InsufficientHistory { closes: usize, minimum: usize },

    #[error("{side} order for {symbol} rejected: {reason}")]
    OrderRejected {
        symbol: String,
        side: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrossgateError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        CrossgateError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        CrossgateError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&CrossgateError> for std::process::ExitCode {
    fn from(err: &CrossgateError) -> Self {
        let code: u8 = match err {
            CrossgateError::Io(_) => 1,
            CrossgateError::ConfigParse { .. }
            | CrossgateError::ConfigMissing { .. }
            | CrossgateError::ConfigInvalid { .. } => 2,
            CrossgateError::DataRetrieval { .. }
            | CrossgateError::Connectivity { .. }
            | CrossgateError::Authentication { .. } => 3,
            CrossgateError::Report { .. } => 4,
            CrossgateError::InsufficientData { .. } | CrossgateError::InsufficientHistory { .. } => {
                5
            }
            CrossgateError::OrderRejected { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
