//! Decoded stream blocks
//!
//! [`ParticleBlock`] borrows the reader's decode buffer and only lives for
//! the duration of one accessor callback. Accessors that need values after
//! the callback returns copy them out; the borrow checker enforces this.

use serde::Serialize;

use crate::layout::{LayoutEntry, LayoutError};
use crate::quantity::QuantityType;

/// A single decoded value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuantityValue {
    /// Floating point quantity
    Double(f64),
    /// Integer quantity
    Int(i32),
}

impl QuantityValue {
    /// Value as `f64`, widening integers
    pub fn as_f64(self) -> f64 {
        match self {
            QuantityValue::Double(v) => v,
            QuantityValue::Int(v) => f64::from(v),
        }
    }

    /// Integer value, `None` for doubles
    pub fn as_i32(self) -> Option<i32> {
        match self {
            QuantityValue::Int(v) => Some(v),
            QuantityValue::Double(_) => None,
        }
    }
}

/// Fixed-width bytes of one particle
#[derive(Debug, Clone, Copy)]
pub struct ParticleRecord<'a> {
    bytes: &'a [u8],
}

impl<'a> ParticleRecord<'a> {
    /// Wrap raw record bytes
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Raw record bytes
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn field<const N: usize>(&self, entry: &LayoutEntry) -> Result<[u8; N], LayoutError> {
        self.bytes
            .get(entry.offset..entry.offset.saturating_add(N))
            .and_then(|slice| <[u8; N]>::try_from(slice).ok())
            .ok_or(LayoutError::RecordTooShort {
                quantity: entry.name(),
                offset: entry.offset,
                len: self.bytes.len(),
            })
    }

    /// Read a double field
    pub fn double(&self, entry: &LayoutEntry) -> Result<f64, LayoutError> {
        self.field::<8>(entry).map(f64::from_le_bytes)
    }

    /// Read an int32 field
    pub fn int(&self, entry: &LayoutEntry) -> Result<i32, LayoutError> {
        self.field::<4>(entry).map(i32::from_le_bytes)
    }

    /// Read a field as its declared type
    pub fn value(&self, entry: &LayoutEntry) -> Result<QuantityValue, LayoutError> {
        match entry.ty {
            QuantityType::Double => self.double(entry).map(QuantityValue::Double),
            QuantityType::Int32 => self.int(entry).map(QuantityValue::Int),
        }
    }
}

/// One event's particle payload
#[derive(Debug, Clone, Copy)]
pub struct ParticleBlock<'a> {
    /// Event number
    pub event_number: i32,
    /// Ensemble index within the event
    pub ensamble_number: i32,
    npart: usize,
    stride: usize,
    data: &'a [u8],
}

impl<'a> ParticleBlock<'a> {
    /// Wrap `npart` records of `stride` bytes each
    ///
    /// Fails unless `data` holds exactly `npart * stride` bytes, so a block
    /// never yields fewer records than it declares.
    pub fn new(
        event_number: i32,
        ensamble_number: i32,
        npart: usize,
        stride: usize,
        data: &'a [u8],
    ) -> Result<Self, LayoutError> {
        if stride == 0 {
            return Err(LayoutError::InvalidStride(stride));
        }
        if npart.checked_mul(stride) != Some(data.len()) {
            return Err(LayoutError::BlockSizeMismatch {
                npart,
                stride,
                len: data.len(),
            });
        }
        Ok(Self {
            event_number,
            ensamble_number,
            npart,
            stride,
            data,
        })
    }

    /// Number of particles in the block
    pub fn npart(&self) -> usize {
        self.npart
    }

    /// Bytes per particle record
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw payload
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Record of particle `index`
    pub fn particle(&self, index: usize) -> Option<ParticleRecord<'a>> {
        if index >= self.npart {
            return None;
        }
        let start = index * self.stride;
        self.data
            .get(start..start + self.stride)
            .map(ParticleRecord::new)
    }

    /// Iterate over the particle records in file order
    pub fn particles(&self) -> impl Iterator<Item = ParticleRecord<'a>> + 'a {
        self.data.chunks_exact(self.stride).map(ParticleRecord::new)
    }
}

/// End-of-event marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EndBlock {
    /// Event number
    pub event_number: i32,
    /// Ensemble index within the event
    pub ensamble_number: i32,
    /// Impact parameter of the collision (fm)
    pub impact_parameter: f64,
    /// True if the projectile and target did not interact
    pub empty_event: bool,
}
