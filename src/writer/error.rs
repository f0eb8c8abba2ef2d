use crate::layout::LayoutError;
use crate::quantity::QuantityType;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Layout could not be built or used
    #[error("Layout error: {0}")]
    LayoutError(#[from] LayoutError),

    /// Value type does not match the quantity's declared type
    #[error("Quantity '{quantity}' expects {expected} values")]
    TypeMismatch {
        /// Quantity name
        quantity: &'static str,
        /// Declared type
        expected: QuantityType,
    },

    /// Invalid data provided to the writer
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
