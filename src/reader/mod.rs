//! # Binary Stream Reader
//!
//! [`BinaryReader`] performs one forward pass over a particle stream and
//! pushes every decoded block to an [`Accessor`]. The stream is never held
//! in memory: particle records are read into a single reusable buffer and
//! handed out as a borrowed [`ParticleBlock`] for the duration of one
//! callback.
//!
//! ## Example
//!
//! ```rust,no_run
//! use smash_stream::accessor::CollectorAccessor;
//! use smash_stream::reader::BinaryReader;
//!
//! let mut collector = CollectorAccessor::new();
//! let mut reader = BinaryReader::new("particles.bin", &["px", "pdg_id"], &mut collector)?;
//! let stats = reader.read()?;
//! drop(reader);
//!
//! println!("{} particles in {} events", stats.particles, stats.end_blocks);
//! println!("px: {:?}", collector.get_double_array("px"));
//! # Ok::<(), smash_stream::reader::ReaderError>(())
//! ```

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use log::{info, trace};
use serde::Serialize;

use crate::accessor::Accessor;
use crate::block::{EndBlock, ParticleBlock};
use crate::format::{FileHeader, END_BLOCK, INTERACTION_BLOCK, PARTICLE_BLOCK};
use crate::quantity::{self, Quantity};

mod error;
mod header;
mod source;

#[cfg(test)]
mod tests;

pub use error::{ReaderError, Stage};

use error::ReadContext;
use source::{CountingReader, ReaderSource};

/// Counters gathered during one read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    /// Particle blocks delivered to the accessor
    pub particle_blocks: u64,
    /// End-of-event blocks delivered to the accessor
    pub end_blocks: u64,
    /// Interaction blocks skipped
    pub interaction_blocks: u64,
    /// Particles decoded across all particle blocks
    pub particles: u64,
    /// Bytes consumed from the stream
    pub bytes_read: u64,
}

/// Single-pass reader for binary particle streams
///
/// Generic over the accessor it notifies; pass `&mut accessor` to keep
/// ownership, or move the accessor in and get it back with
/// [`into_accessor`](Self::into_accessor).
pub struct BinaryReader<A> {
    source: Option<ReaderSource>,
    description: String,
    quantities: Vec<Quantity>,
    accessor: A,
    header: Option<FileHeader>,
    buffer: Vec<u8>,
}

impl<A: Accessor> BinaryReader<A> {
    /// Reader for the file at `path`
    ///
    /// Quantity names are checked against the catalog here; the file is not
    /// touched until [`read`](Self::read).
    pub fn new<P, S>(path: P, quantities: &[S], accessor: A) -> Result<Self, ReaderError>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        Self::with_source(
            ReaderSource::FilePath(path.as_ref().to_path_buf()),
            quantities,
            accessor,
        )
    }

    /// Reader over an arbitrary byte stream
    pub fn from_reader<R, S>(stream: R, quantities: &[S], accessor: A) -> Result<Self, ReaderError>
    where
        R: Read + 'static,
        S: AsRef<str>,
    {
        Self::with_source(ReaderSource::Stream(Box::new(stream)), quantities, accessor)
    }

    fn with_source<S: AsRef<str>>(
        source: ReaderSource,
        quantities: &[S],
        accessor: A,
    ) -> Result<Self, ReaderError> {
        let quantities = quantity::resolve_all(quantities)?;
        Ok(Self {
            description: source.describe(),
            source: Some(source),
            quantities,
            accessor,
            header: None,
            buffer: Vec::new(),
        })
    }

    /// Decode the whole stream, notifying the accessor block by block
    ///
    /// May only be called once; a second call fails with
    /// [`ReaderError::StreamConsumed`].
    pub fn read(&mut self) -> Result<ReadStats, ReaderError> {
        let source = self.source.take().ok_or(ReaderError::StreamConsumed)?;
        info!("Reading particle stream {}", self.description);

        let mut input = CountingReader::new(source.open()?);
        let header = header::read_header(&mut input)?;
        let layout = Arc::new(header.layout.select(&self.quantities));
        self.accessor.set_layout(Arc::clone(&layout));
        let stride = layout.stride();
        self.header = Some(header);

        let mut stats = ReadStats::default();
        loop {
            let offset = input.position();
            let tag = match input.read_tag().at(Stage::BlockHeader, offset)? {
                Some(tag) => tag,
                None => break,
            };

            match tag {
                PARTICLE_BLOCK => {
                    let event_number =
                        input.read_i32::<LittleEndian>().at(Stage::BlockHeader, offset)?;
                    let ensamble_number =
                        input.read_i32::<LittleEndian>().at(Stage::BlockHeader, offset)?;
                    let npart =
                        input.read_u32::<LittleEndian>().at(Stage::BlockHeader, offset)? as usize;
                    trace!(
                        "Particle block: event {}, ensemble {}, {} particles",
                        event_number,
                        ensamble_number,
                        npart
                    );

                    let records_offset = input.position();
                    self.fill_buffer(
                        &mut input,
                        npart,
                        stride,
                        Stage::ParticleRecords,
                        records_offset,
                    )?;

                    let block = ParticleBlock::new(
                        event_number,
                        ensamble_number,
                        npart,
                        stride,
                        &self.buffer,
                    )?;
                    self.accessor
                        .on_particle_block(&block)
                        .map_err(|source| ReaderError::Accessor { offset, source })?;
                    stats.particle_blocks += 1;
                    stats.particles += npart as u64;
                }
                END_BLOCK => {
                    let event_number =
                        input.read_i32::<LittleEndian>().at(Stage::EndBlock, offset)?;
                    let ensamble_number =
                        input.read_i32::<LittleEndian>().at(Stage::EndBlock, offset)?;
                    let impact_parameter =
                        input.read_f64::<LittleEndian>().at(Stage::EndBlock, offset)?;
                    let empty_event = input.read_u8().at(Stage::EndBlock, offset)? != 0;
                    trace!(
                        "End block: event {}, ensemble {}, b = {} fm",
                        event_number,
                        ensamble_number,
                        impact_parameter
                    );

                    let block = EndBlock {
                        event_number,
                        ensamble_number,
                        impact_parameter,
                        empty_event,
                    };
                    self.accessor
                        .on_end_block(&block)
                        .map_err(|source| ReaderError::Accessor { offset, source })?;
                    stats.end_blocks += 1;
                }
                INTERACTION_BLOCK => {
                    let n_in = input
                        .read_u32::<LittleEndian>()
                        .at(Stage::InteractionBlock, offset)?;
                    let n_out = input
                        .read_u32::<LittleEndian>()
                        .at(Stage::InteractionBlock, offset)?;
                    let npart = n_in as usize + n_out as usize;
                    self.fill_buffer(&mut input, npart, stride, Stage::InteractionBlock, offset)?;
                    // density, total and partial cross section, process type
                    let mut trailer = [0u8; 28];
                    input.read_exact(&mut trailer).at(Stage::InteractionBlock, offset)?;
                    trace!("Skipped interaction block: {} in, {} out", n_in, n_out);
                    stats.interaction_blocks += 1;
                }
                other => {
                    return Err(ReaderError::UnexpectedBlock { tag: other, offset });
                }
            }
        }

        stats.bytes_read = input.position();
        info!(
            "Finished {}: {} events, {} particle blocks, {} particles, {} bytes",
            self.description,
            stats.end_blocks,
            stats.particle_blocks,
            stats.particles,
            stats.bytes_read
        );
        Ok(stats)
    }

    /// Read exactly `npart` records into the reusable buffer
    ///
    /// The buffer grows with the data actually read, so a corrupt particle
    /// count cannot trigger a huge up-front allocation.
    fn fill_buffer<R: Read>(
        &mut self,
        input: &mut CountingReader<R>,
        npart: usize,
        stride: usize,
        stage: Stage,
        offset: u64,
    ) -> Result<(), ReaderError> {
        let expected = npart
            .checked_mul(stride)
            .ok_or(ReaderError::Truncated { stage, offset })?;
        self.buffer.clear();
        input
            .by_ref()
            .take(expected as u64)
            .read_to_end(&mut self.buffer)
            .at(stage, offset)?;
        if self.buffer.len() != expected {
            return Err(ReaderError::Truncated { stage, offset });
        }
        Ok(())
    }

    /// Header of the stream, available once `read()` has parsed it
    pub fn header(&self) -> Option<&FileHeader> {
        self.header.as_ref()
    }

    /// Quantities requested by the caller, in request order
    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// True once `read()` has been called
    pub fn is_consumed(&self) -> bool {
        self.source.is_none()
    }

    /// The accessor being notified
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Mutable access to the accessor
    pub fn accessor_mut(&mut self) -> &mut A {
        &mut self.accessor
    }

    /// Consume the reader and return its accessor
    pub fn into_accessor(self) -> A {
        self.accessor
    }
}
