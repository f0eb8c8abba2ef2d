use crate::layout::LayoutError;

/// Errors raised by accessors while consuming blocks
#[derive(Debug, thiserror::Error)]
pub enum AccessorError {
    /// A block arrived before the reader handed over the record layout
    #[error("Layout not initialized: {accessor} received a block before the record layout was set")]
    LayoutNotInitialized {
        /// Accessor that was called too early
        accessor: &'static str,
    },

    /// A field could not be decoded from a record
    #[error("Decode error: {0}")]
    Decode(#[from] LayoutError),

    /// A registered analysis failed during fan-out
    #[error("Analysis '{name}' failed: {source}")]
    Member {
        /// Name of the failing analysis
        name: String,
        /// What went wrong inside it
        source: Box<AccessorError>,
    },

    /// Failure reported by a custom accessor
    #[error("{0}")]
    Failed(String),
}

impl AccessorError {
    /// Innermost error, looking through analysis wrappers
    pub fn root_cause(&self) -> &AccessorError {
        match self {
            AccessorError::Member { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// True if the accessor was driven out of order rather than fed bad data
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self.root_cause(),
            AccessorError::LayoutNotInitialized { .. }
        )
    }
}
