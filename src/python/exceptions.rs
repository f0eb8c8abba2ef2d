//! Python exception types for smash-stream
//!
//! Maps Rust error types to appropriate Python exceptions.

use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyIOError};
use pyo3::prelude::*;

use crate::analysis::AnalysisError;
use crate::reader::ReaderError;

create_exception!(
    smash_stream,
    SmashStreamError,
    PyException,
    "Base exception for all smash_stream errors."
);
create_exception!(
    smash_stream,
    UnknownNameError,
    SmashStreamError,
    "Unknown analysis or quantity name."
);
create_exception!(
    smash_stream,
    FormatError,
    SmashStreamError,
    "Invalid, truncated or corrupted particle stream."
);
create_exception!(
    smash_stream,
    UsageError,
    SmashStreamError,
    "API misuse, such as reading a stream twice."
);

/// Convert ReaderError to Python exception
impl From<ReaderError> for PyErr {
    fn from(err: ReaderError) -> Self {
        match &err {
            ReaderError::IoError(_) => PyIOError::new_err(err.to_string()),
            ReaderError::UnknownQuantity(_) => UnknownNameError::new_err(err.to_string()),
            ReaderError::StreamConsumed => UsageError::new_err(err.to_string()),
            ReaderError::Accessor { source, .. } if source.is_usage_error() => {
                UsageError::new_err(err.to_string())
            }
            ReaderError::Accessor { .. } => SmashStreamError::new_err(err.to_string()),
            _ if err.is_format_error() => FormatError::new_err(err.to_string()),
            _ => SmashStreamError::new_err(err.to_string()),
        }
    }
}

/// Convert AnalysisError to Python exception
impl From<AnalysisError> for PyErr {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Reader(inner) => inner.into(),
            AnalysisError::UnknownAnalysis { .. } => UnknownNameError::new_err(err.to_string()),
            AnalysisError::DuplicateAnalysis { .. } | AnalysisError::RegistryInitialized => {
                UsageError::new_err(err.to_string())
            }
            AnalysisError::IoError(_) | AnalysisError::PersistError(_) => {
                PyIOError::new_err(err.to_string())
            }
            AnalysisError::JsonError(_) => SmashStreamError::new_err(err.to_string()),
        }
    }
}
