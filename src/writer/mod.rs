//! # Stream Writer
//!
//! Produces binary particle streams in the layout described in
//! [`format`](crate::format). Used to generate demo data and test fixtures;
//! the reader is the production path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use smash_stream::layout::RecordLayout;
//! use smash_stream::quantity::Quantity;
//! use smash_stream::writer::{Particle, StreamWriter};
//!
//! let layout = RecordLayout::packed(&[Quantity::Px, Quantity::PdgId])?;
//! let mut writer = StreamWriter::create("particles.bin", layout)?;
//!
//! let pion = Particle::new().with(Quantity::Px, 0.3).with(Quantity::PdgId, 211);
//! writer.write_particle_block(0, 0, &[pion])?;
//! writer.write_end_block(0, 0, 3.2, false)?;
//!
//! let stats = writer.finish()?;
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;

use crate::block::QuantityValue;
use crate::format::{
    FormatVariant, END_BLOCK, FORMAT_VERSION, INTERACTION_BLOCK, LAYOUT_END, MAGIC,
    MAX_GENERATOR_LEN, PARTICLE_BLOCK,
};
use crate::layout::RecordLayout;
use crate::quantity::QuantityType;

mod error;
mod stats;
mod types;

#[cfg(test)]
mod tests;

pub use error::WriterError;
pub use stats::WriterStats;
pub use types::Particle;

/// Generator string written when none is given
pub fn default_generator() -> String {
    format!("smash-stream-{}", env!("CARGO_PKG_VERSION"))
}

/// Cross sections and process id of an interaction block
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InteractionInfo {
    /// Local density at the interaction point
    pub density: f64,
    /// Total cross section (mb)
    pub total_cross_section: f64,
    /// Partial cross section of the chosen process (mb)
    pub partial_cross_section: f64,
    /// Process type id
    pub process_type: u32,
}

/// Streaming writer for binary particle streams
pub struct StreamWriter<W: Write> {
    inner: W,
    layout: RecordLayout,
    record: Vec<u8>,
    stats: WriterStats,
}

impl StreamWriter<BufWriter<File>> {
    /// Create a file and write the header
    pub fn create<P: AsRef<Path>>(path: P, layout: RecordLayout) -> Result<Self, WriterError> {
        let file = File::create(path.as_ref())?;
        debug!("Writing particle stream to {}", path.as_ref().display());
        Self::new(BufWriter::new(file), layout)
    }
}

impl<W: Write> StreamWriter<W> {
    /// Write a default-variant header to `inner`
    pub fn new(inner: W, layout: RecordLayout) -> Result<Self, WriterError> {
        Self::with_header(inner, layout, FormatVariant::Default, &default_generator())
    }

    /// Write a header with an explicit variant and generator string
    pub fn with_header(
        inner: W,
        layout: RecordLayout,
        variant: FormatVariant,
        generator: &str,
    ) -> Result<Self, WriterError> {
        if generator.len() > MAX_GENERATOR_LEN {
            return Err(WriterError::InvalidData(format!(
                "generator string of {} bytes exceeds {}",
                generator.len(),
                MAX_GENERATOR_LEN
            )));
        }

        let mut writer = Self {
            inner,
            record: vec![0u8; layout.stride()],
            layout,
            stats: WriterStats::default(),
        };

        writer.inner.write_all(MAGIC)?;
        writer.inner.write_u16::<LittleEndian>(FORMAT_VERSION)?;
        writer.inner.write_u16::<LittleEndian>(variant.as_u16())?;
        writer.inner.write_u32::<LittleEndian>(generator.len() as u32)?;
        writer.inner.write_all(generator.as_bytes())?;
        writer.inner.write_u32::<LittleEndian>(writer.layout.stride() as u32)?;
        for entry in writer.layout.entries() {
            writer.inner.write_u32::<LittleEndian>(entry.quantity.tag())?;
            writer.inner.write_u32::<LittleEndian>(entry.offset as u32)?;
        }
        writer.inner.write_u32::<LittleEndian>(LAYOUT_END)?;

        writer.stats.bytes_written =
            (4 + 2 + 2 + 4 + generator.len() + 4 + 8 * writer.layout.len() + 4) as u64;
        Ok(writer)
    }

    /// Layout records are encoded with
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    fn encode_record(&mut self, particle: &Particle) -> Result<(), WriterError> {
        self.record.fill(0);
        for (quantity, value) in particle.values() {
            let entry = match self.layout.entry_for(*quantity) {
                Some(entry) => *entry,
                None => continue,
            };
            let field = &mut self.record[entry.range()];
            match (entry.ty, value) {
                (QuantityType::Double, QuantityValue::Double(v)) => {
                    field.copy_from_slice(&v.to_le_bytes())
                }
                (QuantityType::Int32, QuantityValue::Int(v)) => {
                    field.copy_from_slice(&v.to_le_bytes())
                }
                (expected, _) => {
                    return Err(WriterError::TypeMismatch {
                        quantity: quantity.name(),
                        expected,
                    })
                }
            }
        }
        Ok(())
    }

    fn write_records(&mut self, particles: &[Particle]) -> Result<(), WriterError> {
        for particle in particles {
            self.encode_record(particle)?;
            self.inner.write_all(&self.record)?;
        }
        self.stats.bytes_written += (particles.len() * self.record.len()) as u64;
        Ok(())
    }

    /// Write one particle block
    pub fn write_particle_block(
        &mut self,
        event_number: i32,
        ensamble_number: i32,
        particles: &[Particle],
    ) -> Result<(), WriterError> {
        let npart = u32::try_from(particles.len())
            .map_err(|_| WriterError::InvalidData("too many particles in one block".to_string()))?;
        self.inner.write_u8(PARTICLE_BLOCK)?;
        self.inner.write_i32::<LittleEndian>(event_number)?;
        self.inner.write_i32::<LittleEndian>(ensamble_number)?;
        self.inner.write_u32::<LittleEndian>(npart)?;
        self.stats.bytes_written += 13;
        self.write_records(particles)?;
        self.stats.particle_blocks += 1;
        self.stats.particles += particles.len() as u64;
        Ok(())
    }

    /// Write an end-of-event block
    pub fn write_end_block(
        &mut self,
        event_number: i32,
        ensamble_number: i32,
        impact_parameter: f64,
        empty_event: bool,
    ) -> Result<(), WriterError> {
        self.inner.write_u8(END_BLOCK)?;
        self.inner.write_i32::<LittleEndian>(event_number)?;
        self.inner.write_i32::<LittleEndian>(ensamble_number)?;
        self.inner.write_f64::<LittleEndian>(impact_parameter)?;
        self.inner.write_u8(u8::from(empty_event))?;
        self.stats.bytes_written += 18;
        self.stats.end_blocks += 1;
        Ok(())
    }

    /// Write an interaction block
    pub fn write_interaction_block(
        &mut self,
        incoming: &[Particle],
        outgoing: &[Particle],
        info: InteractionInfo,
    ) -> Result<(), WriterError> {
        self.inner.write_u8(INTERACTION_BLOCK)?;
        self.inner.write_u32::<LittleEndian>(incoming.len() as u32)?;
        self.inner.write_u32::<LittleEndian>(outgoing.len() as u32)?;
        self.stats.bytes_written += 9;
        self.write_records(incoming)?;
        self.write_records(outgoing)?;
        self.inner.write_f64::<LittleEndian>(info.density)?;
        self.inner.write_f64::<LittleEndian>(info.total_cross_section)?;
        self.inner.write_f64::<LittleEndian>(info.partial_cross_section)?;
        self.inner.write_u32::<LittleEndian>(info.process_type)?;
        self.stats.bytes_written += 28;
        self.stats.interaction_blocks += 1;
        Ok(())
    }

    /// Statistics so far
    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    /// Flush and return the final statistics
    pub fn finish(mut self) -> Result<WriterStats, WriterError> {
        self.inner.flush()?;
        debug!("{}", self.stats);
        Ok(self.stats)
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W, WriterError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
