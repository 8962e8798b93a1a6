//! Error types for the iPhoenix investigation core.
//!
//! Input-level and catalog-level failures are `PhoenixError`s and propagate
//! to the caller. Per-platform network trouble is a `ProbeError`: it is
//! recorded on the platform's result and never aborts a run.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// The main error type for iPhoenix operations.
#[derive(Debug, thiserror::Error)]
pub enum PhoenixError {
    /// Bad username or other caller input, raised before any network activity
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The image bytes could not be decoded as a raster image
    #[error("Cannot decode image{}: {message}", path_suffix(.path))]
    Decode {
        path: Option<PathBuf>,
        message: String,
    },

    /// Malformed platform table
    #[error("Platform catalog error: {0}")]
    Catalog(String),

    /// Two fingerprints with different hash widths were compared
    #[error("Incompatible fingerprints: hash width {left} vs {right}")]
    IncompatibleFingerprint { left: usize, right: usize },

    /// The same platform reported twice in one run
    #[error("Platform '{0}' reported more than once")]
    DuplicatePlatform(String),

    /// I/O error (file read/write, permissions, etc.)
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog file parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Tokio task join error
    #[error("Async task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result type alias using PhoenixError
pub type PhoenixResult<T> = Result<T, PhoenixError>;

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}

impl PhoenixError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog(message.into())
    }

    pub fn decode(message: impl ToString, path: Option<PathBuf>) -> Self {
        Self::Decode {
            path,
            message: message.to_string(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error stems from bad input or a bad catalog, as opposed
    /// to an environment failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Decode { .. } | Self::Catalog(_) | Self::Toml(_)
        )
    }
}

/// Convert from raw I/O errors (without path context)
impl From<std::io::Error> for PhoenixError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

/// Why a single platform probe failed to produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("server error status {0}")]
    ServerStatus(u16),

    #[error("rate limited by host (status {0})")]
    RateLimited(u16),

    #[error("failed reading response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("investigation deadline of {0:?} elapsed")]
    DeadlineExceeded(Duration),

    #[error("no result delivered")]
    Missing,
}

impl ProbeError {
    /// Transient failures are retried; everything else is final.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_)
                | Self::Connect(_)
                | Self::Body(_)
                | Self::ServerStatus(_)
                | Self::RateLimited(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display_includes_path() {
        let err = PhoenixError::decode("bad magic", Some(PathBuf::from("/tmp/a.png")));
        let msg = err.to_string();
        assert!(msg.contains("/tmp/a.png"));
        assert!(msg.contains("bad magic"));
    }

    #[test]
    fn test_decode_error_without_path() {
        let err = PhoenixError::decode("truncated", None);
        assert_eq!(err.to_string(), "Cannot decode image: truncated");
    }

    #[test]
    fn test_input_errors_are_classified() {
        assert!(PhoenixError::validation("empty").is_input_error());
        assert!(PhoenixError::catalog("dup").is_input_error());
        assert!(!PhoenixError::DuplicatePlatform("x".into()).is_input_error());
        let io: PhoenixError = std::io::Error::new(std::io::ErrorKind::Other, "x").into();
        assert!(!io.is_input_error());
    }

    #[test]
    fn test_transient_probe_errors() {
        assert!(ProbeError::Timeout(Duration::from_secs(8)).is_transient());
        assert!(ProbeError::ServerStatus(503).is_transient());
        assert!(ProbeError::RateLimited(429).is_transient());
        assert!(!ProbeError::Request("builder".into()).is_transient());
        assert!(!ProbeError::DeadlineExceeded(Duration::from_secs(60)).is_transient());
    }
}
