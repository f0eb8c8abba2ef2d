//! Binary stream format
//!
//! Everything is little-endian.
//!
//! ```text
//! header:
//!   magic            4 bytes  "SMSH"
//!   format_version   u16      FORMAT_VERSION
//!   format_variant   u16      0 default, 1 extended, 2 custom
//!   generator        u32 length + UTF-8 bytes
//!   record_stride    u32      bytes per particle record
//!   layout           (tag u32, offset u32)*, then tag 0xFFFF_FFFF
//!
//! blocks, repeated until end of file:
//!   'p'  event_number i32, ensemble_number i32, npart u32,
//!        npart * record_stride bytes of particle records
//!   'f'  event_number i32, ensemble_number i32, impact_parameter f64,
//!        empty_event u8
//!   'i'  n_in u32, n_out u32, (n_in + n_out) * record_stride bytes,
//!        density f64, total_cross_section f64,
//!        partial_cross_section f64, process_type u32
//! ```
//!
//! End of file is only legal where a block tag is expected.

use std::fmt;

use serde::Serialize;

use crate::layout::RecordLayout;

/// File magic
pub const MAGIC: &[u8; 4] = b"SMSH";

/// Supported format version
pub const FORMAT_VERSION: u16 = 1;

/// Tag terminating the layout table
pub const LAYOUT_END: u32 = u32::MAX;

/// Longest generator string accepted in a header
pub const MAX_GENERATOR_LEN: usize = 4096;

/// Most layout entries accepted in a header
pub const MAX_LAYOUT_ENTRIES: usize = 1024;

/// Block tag of a particle block
pub const PARTICLE_BLOCK: u8 = b'p';

/// Block tag of an end-of-event block
pub const END_BLOCK: u8 = b'f';

/// Block tag of an interaction block
pub const INTERACTION_BLOCK: u8 = b'i';

/// Output variant the producer wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatVariant {
    /// Standard particle output
    Default,
    /// Output with extra history quantities
    Extended,
    /// User-selected quantity list
    Custom,
    /// Variant id this crate does not know
    Unknown(u16),
}

impl FormatVariant {
    /// Decode the header field
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => FormatVariant::Default,
            1 => FormatVariant::Extended,
            2 => FormatVariant::Custom,
            other => FormatVariant::Unknown(other),
        }
    }

    /// Header field value
    pub fn as_u16(self) -> u16 {
        match self {
            FormatVariant::Default => 0,
            FormatVariant::Extended => 1,
            FormatVariant::Custom => 2,
            FormatVariant::Unknown(other) => other,
        }
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVariant::Default => f.write_str("default"),
            FormatVariant::Extended => f.write_str("extended"),
            FormatVariant::Custom => f.write_str("custom"),
            FormatVariant::Unknown(v) => write!(f, "unknown ({})", v),
        }
    }
}

/// Parsed stream header
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    /// Format version
    pub format_version: u16,
    /// Output variant
    pub variant: FormatVariant,
    /// Version string of the producing program
    pub generator: String,
    /// Full layout declared by the file
    pub layout: RecordLayout,
    /// Layout tags not in the quantity catalog (skipped)
    pub unknown_tags: Vec<u32>,
}
