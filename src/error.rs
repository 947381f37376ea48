use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Snapshot-gathering errors.
///
/// Any one of these aborts the whole comparison run; the classification
/// pass never sees a partial snapshot set.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot gathering exceeded the {budget:?} time budget")]
    TimedOut { budget: Duration },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_name_the_field() {
        let err = ConfigError::MissingField { field: "data_dir" };
        assert_eq!(err.to_string(), "missing required field: data_dir");

        let err = ConfigError::InvalidValue {
            field: "scoring.breakpoints",
            reason: "ratios must increase".to_string(),
        };
        assert!(err.to_string().contains("scoring.breakpoints"));
    }

    #[test]
    fn snapshot_errors_convert_into_top_level() {
        let err: Error = SnapshotError::TimedOut {
            budget: Duration::from_secs(5),
        }
        .into();
        assert!(matches!(err, Error::Snapshot(_)));
    }
}
