use crate::reader::ReaderError;

/// Errors raised by the analysis layer
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No analysis registered under this name
    #[error("Unknown analysis '{name}'")]
    UnknownAnalysis {
        /// Requested name
        name: String,
    },

    /// Name is already taken in the registry
    #[error("Analysis '{name}' is already registered")]
    DuplicateAnalysis {
        /// Registered name
        name: String,
    },

    /// Global registry was already initialized when `install` was called
    #[error("Analysis registry is already initialized")]
    RegistryInitialized,

    /// Reading the stream failed
    #[error(transparent)]
    Reader(#[from] ReaderError),

    /// I/O error while saving or printing a result
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Result could not be serialized
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Saved result could not be moved into place
    #[error("Failed to persist result: {0}")]
    PersistError(#[from] tempfile::PersistError),
}
