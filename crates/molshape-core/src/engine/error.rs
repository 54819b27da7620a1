use super::config::ConfigError;
use thiserror::Error;

/// Failures that stop a pipeline run before any line is processed.
///
/// Per-line problems never surface here; they are recorded on the
/// individual results instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to build worker pool with {workers} threads: {reason}")]
    ThreadPool { workers: usize, reason: String },
}
