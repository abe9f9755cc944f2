//! Domain error types.

/// Top-level error type for vectrader.
#[derive(Debug, thiserror::Error)]
pub enum VectraderError {
    #[error("data load error: {reason}")]
    DataLoad { reason: String },

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

    #[error("unknown strategy id: {0}")]
    UnknownStrategy(String),

    #[error("signal matrix and price matrix share no instrument columns")]
    NoCommonInstruments,

    #[error("matrix is malformed: {reason}")]
    MalformedFrame { reason: String },

    #[error(transparent)]
    Universe(#[from] crate::domain::universe::UniverseError),

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&VectraderError> for std::process::ExitCode {
    fn from(err: &VectraderError) -> Self {
        let code: u8 = match err {
            VectraderError::Io(_) => 1,
            VectraderError::ConfigParse { .. }
            | VectraderError::ConfigMissing { .. }
            | VectraderError::ConfigInvalid { .. }
            | VectraderError::UnknownStrategy(_) => 2,
            VectraderError::DataLoad { .. } => 3,
            VectraderError::Universe(_) => 4,
            VectraderError::NoCommonInstruments | VectraderError::MalformedFrame { .. } => 5,
            VectraderError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
