use std::fmt;

use crate::accessor::AccessorError;
use crate::layout::LayoutError;
use crate::quantity::UnknownQuantity;

/// Part of the stream being decoded when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// File header
    Header,
    /// Block tag and fixed block fields
    BlockHeader,
    /// Particle records of a particle block
    ParticleRecords,
    /// End-of-event block
    EndBlock,
    /// Interaction block
    InteractionBlock,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Header => "file header",
            Stage::BlockHeader => "block header",
            Stage::ParticleRecords => "particle records",
            Stage::EndBlock => "end-of-event block",
            Stage::InteractionBlock => "interaction block",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during reading
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Requested quantity name is not in the catalog
    #[error(transparent)]
    UnknownQuantity(#[from] UnknownQuantity),

    /// Header is not a supported stream header
    #[error("Malformed stream header at byte {offset}: {reason}")]
    BadHeader {
        /// Byte offset of the offending field
        offset: u64,
        /// What is wrong with it
        reason: String,
    },

    /// Header declares an unusable record layout
    #[error("Invalid record layout: {0}")]
    InvalidLayout(#[from] LayoutError),

    /// Stream ended inside a structure
    #[error("Truncated stream: unexpected end of file in {stage} at byte {offset}")]
    Truncated {
        /// What was being decoded
        stage: Stage,
        /// Byte offset where the structure started
        offset: u64,
    },

    /// Unknown block tag
    #[error("Malformed stream: unexpected block tag 0x{tag:02x} at byte {offset}")]
    UnexpectedBlock {
        /// Tag byte found
        tag: u8,
        /// Byte offset of the tag
        offset: u64,
    },

    /// `read()` was called on a reader that already consumed its stream
    #[error("Stream already consumed: read() may only be called once per reader")]
    StreamConsumed,

    /// The accessor rejected a block
    #[error("Accessor failed on block at byte {offset}: {source}")]
    Accessor {
        /// Byte offset of the block
        offset: u64,
        /// Accessor error
        source: AccessorError,
    },
}

impl ReaderError {
    /// True for errors caused by the stream contents rather than the caller
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ReaderError::BadHeader { .. }
                | ReaderError::InvalidLayout(_)
                | ReaderError::Truncated { .. }
                | ReaderError::UnexpectedBlock { .. }
        )
    }
}

/// Attach decode context to I/O results
pub(super) trait ReadContext<T> {
    /// Map end-of-file to [`ReaderError::Truncated`], anything else to [`ReaderError::IoError`]
    fn at(self, stage: Stage, offset: u64) -> Result<T, ReaderError>;
}

impl<T> ReadContext<T> for std::io::Result<T> {
    fn at(self, stage: Stage, offset: u64) -> Result<T, ReaderError> {
        self.map_err(|err| match err.kind() {
            std::io::ErrorKind::UnexpectedEof => ReaderError::Truncated { stage, offset },
            _ => ReaderError::IoError(err),
        })
    }
}
