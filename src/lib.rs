//! # smash-stream - Streaming Decoder for Binary Particle Output
//!
//! `smash-stream` reads the binary event streams written by particle-transport
//! simulations of heavy-ion collisions: a sequence of events, each a block
//! of fixed-size particle records followed by an end-of-event marker. The
//! file is decoded in a single forward pass and every block is pushed to
//! pluggable consumers ("accessors") without materializing the stream in
//! memory.
//!
//! ## Key Features
//!
//! - **Generic Decoding**: Quantities are decoded by name through a catalog
//!   and a per-file [`RecordLayout`](layout::RecordLayout), not through a
//!   fixed struct, so files with different quantity subsets decode with the
//!   same reader configuration.
//!
//! - **Single-Pass Streaming**: One reusable decode buffer; blocks are lent to
//!   accessors for the duration of a callback.
//!
//! - **Pluggable Consumers**: Columnar and per-particle collectors, custom
//!   accessors, and named analyses fanned out through one
//!   [`DispatchingAccessor`](accessor::DispatchingAccessor).
//!
//! - **Bounds-Checked Records**: Layouts are validated against the record
//!   stride and every field read is a checked slice access.
//!
//! ## Quick Start - Collecting Columns
//!
//! ```rust,no_run
//! use smash_stream::accessor::CollectorAccessor;
//! use smash_stream::reader::BinaryReader;
//!
//! let mut collector = CollectorAccessor::new();
//! BinaryReader::new("particles.bin", &["px", "py", "pdg_id"], &mut collector)?.read()?;
//!
//! let sizes = collector.get_event_sizes();
//! let px = collector.get_double_array("px").unwrap_or_default();
//! println!("{} events, {} particles", sizes.len(), px.len());
//! # Ok::<(), smash_stream::reader::ReaderError>(())
//! ```
//!
//! ## Quick Start - Running an Analysis
//!
//! ```rust,no_run
//! use std::path::Path;
//! use smash_stream::analysis::run_analysis;
//!
//! let summary = run_analysis(
//!     "particles.bin",
//!     "pt_spectrum",
//!     &["px", "py"],
//!     Some(Path::new("pt_spectrum.json")),
//!     true,
//! )?;
//! print!("{}", summary);
//! # Ok::<(), smash_stream::analysis::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`quantity`]: name → quantity tag/type catalog
//! - [`layout`]: validated quantity → offset table for one stream
//! - [`format`]: wire format constants and the parsed header
//! - [`block`]: particle and end-of-event blocks handed to accessors
//! - [`reader`]: the single-pass [`BinaryReader`](reader::BinaryReader)
//! - [`accessor`]: the [`Accessor`](accessor::Accessor) trait and built-in consumers
//! - [`analysis`]: named analyses, their registry, and `run_analysis`
//! - [`writer`]: stream writer for fixtures and demo data

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod accessor;
pub mod analysis;
pub mod block;
pub mod format;
pub mod layout;
pub mod quantity;
pub mod reader;
pub mod writer;

// Python bindings module (only compiled with the "python" feature)
#[cfg(feature = "python")]
mod python;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::accessor::{
        Accessor, AccessorError, CollectorAccessor, DictCollectorAccessor, DispatchingAccessor,
        LayoutSlot, NullAccessor, ParticleDict,
    };
    pub use crate::analysis::{
        run_analysis, run_analysis_with, Analysis, AnalysisError, AnalysisRegistry,
    };
    pub use crate::block::{EndBlock, ParticleBlock, ParticleRecord, QuantityValue};
    pub use crate::format::{FileHeader, FormatVariant};
    pub use crate::layout::{LayoutEntry, LayoutError, RecordLayout};
    pub use crate::quantity::{Quantity, QuantityInfo, QuantityType};
    pub use crate::reader::{BinaryReader, ReadStats, ReaderError};
    pub use crate::writer::{Particle, StreamWriter, WriterError, WriterStats};
}
