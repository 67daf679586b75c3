//! Domain error types.

/// Top-level error type for tradetips.
#[derive(Debug, thiserror::Error)]
pub enum TradetipsError {
    #[error("data source error: {reason}")]
    Data { reason: String },

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

    #[error("unsupported strategy: {name}")]
    UnsupportedStrategy { name: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradetipsError> for std::process::ExitCode {
    fn from(err: &TradetipsError) -> Self {
        let code: u8 = match err {
            TradetipsError::Io(_) | TradetipsError::Report { .. } => 1,
            TradetipsError::ConfigParse { .. }
            | TradetipsError::ConfigMissing { .. }
            | TradetipsError::ConfigInvalid { .. } => 2,
            TradetipsError::Data { .. } => 3,
            TradetipsError::UnsupportedStrategy { .. } => 4,
            TradetipsError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
