use thiserror::Error;

pub type DashResult<T> = std::result::Result<T, DashboardError>;

/// Domain errors. Everything above the library boundary wraps these in anyhow.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to read dataset '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid movie record #{index} ('{title}'): {reason}")]
    InvalidRecord {
        index: usize,
        title: String,
        reason: String,
    },
    #[error("Unknown {kind} key '{key}'")]
    UnknownKey { kind: &'static str, key: String },
    #[error("Invalid range: lower bound {min} exceeds upper bound {max}")]
    InvalidRange { min: String, max: String },
    #[error("Invalid selection expression: {0}")]
    Parse(String),
}

impl DashboardError {
    pub fn unknown(kind: &'static str, key: impl Into<String>) -> Self {
        DashboardError::UnknownKey {
            kind,
            key: key.into(),
        }
    }
}
