use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog or store operation failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] flickstash_service::ServiceError),

    /// Provider client error
    #[error("Provider error: {0}")]
    Provider(#[from] flickstash_xtream::FetchError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
