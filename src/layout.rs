//! Record layout
//!
//! A [`RecordLayout`] maps quantities to byte offsets inside one particle
//! record. It is built once per stream from the file header, validated so
//! that every field fits inside the record stride without overlapping
//! another field, and then shared read-only (behind an `Arc`) with every
//! accessor for the duration of the read.

use log::debug;

use crate::quantity::{Quantity, QuantityType};

/// Largest record stride a header may declare
pub const MAX_RECORD_STRIDE: usize = 65_536;

/// Errors raised while building a layout or decoding through it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Declared record stride is zero or unreasonably large
    #[error("Invalid record stride {0} (expected 1..={max})", max = MAX_RECORD_STRIDE)]
    InvalidStride(usize),

    /// Field would extend past the end of the record
    #[error("Quantity '{quantity}' at offset {offset} (+{width} bytes) exceeds record stride {stride}")]
    OutOfBounds {
        /// Quantity name
        quantity: &'static str,
        /// Declared offset
        offset: usize,
        /// Field width in bytes
        width: usize,
        /// Record stride
        stride: usize,
    },

    /// Two fields share bytes
    #[error("Quantity '{second}' overlaps '{first}' in the record layout")]
    Overlap {
        /// Field that starts first
        first: &'static str,
        /// Field that starts inside the first one
        second: &'static str,
    },

    /// Same quantity declared twice
    #[error("Quantity '{0}' appears more than once in the record layout")]
    Duplicate(&'static str),

    /// Block payload does not hold exactly `npart` records
    #[error("Block of {npart} particles x {stride} bytes cannot hold {len} payload bytes")]
    BlockSizeMismatch {
        /// Declared particle count
        npart: usize,
        /// Record stride
        stride: usize,
        /// Payload length in bytes
        len: usize,
    },

    /// Record slice shorter than the field being decoded
    #[error("Record of {len} bytes too short to decode '{quantity}' at offset {offset}")]
    RecordTooShort {
        /// Quantity name
        quantity: &'static str,
        /// Field offset
        offset: usize,
        /// Record length in bytes
        len: usize,
    },
}

/// One quantity's position inside a particle record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Quantity tag
    pub quantity: Quantity,
    /// Storage type
    pub ty: QuantityType,
    /// Byte offset from the start of the record
    pub offset: usize,
}

impl LayoutEntry {
    /// Field name of the quantity
    pub fn name(&self) -> &'static str {
        self.quantity.name()
    }

    /// Byte range the field occupies inside a record
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.ty.width()
    }
}

/// Validated quantity → offset table for one stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    stride: usize,
    entries: Vec<LayoutEntry>,
}

impl RecordLayout {
    /// Build a layout from `(quantity, offset)` pairs
    ///
    /// Entry order is preserved. Fails if the stride is out of range, a
    /// field does not fit in the stride, fields overlap, or a quantity is
    /// listed twice.
    pub fn new<I>(stride: usize, pairs: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (Quantity, usize)>,
    {
        if stride == 0 || stride > MAX_RECORD_STRIDE {
            return Err(LayoutError::InvalidStride(stride));
        }

        let mut entries: Vec<LayoutEntry> = Vec::new();
        for (quantity, offset) in pairs {
            if entries.iter().any(|e| e.quantity == quantity) {
                return Err(LayoutError::Duplicate(quantity.name()));
            }
            let ty = quantity.quantity_type();
            let end = offset.checked_add(ty.width());
            if end.map_or(true, |end| end > stride) {
                return Err(LayoutError::OutOfBounds {
                    quantity: quantity.name(),
                    offset,
                    width: ty.width(),
                    stride,
                });
            }
            entries.push(LayoutEntry {
                quantity,
                ty,
                offset,
            });
        }

        let mut by_offset: Vec<&LayoutEntry> = entries.iter().collect();
        by_offset.sort_by_key(|e| e.offset);
        for pair in by_offset.windows(2) {
            if pair[1].offset < pair[0].range().end {
                return Err(LayoutError::Overlap {
                    first: pair[0].name(),
                    second: pair[1].name(),
                });
            }
        }

        Ok(Self { stride, entries })
    }

    /// Packed layout with the quantities laid out back to back in the given order
    pub fn packed(quantities: &[Quantity]) -> Result<Self, LayoutError> {
        let mut offset = 0;
        let mut pairs = Vec::with_capacity(quantities.len());
        for q in quantities {
            pairs.push((*q, offset));
            offset += q.quantity_type().width();
        }
        Self::new(offset.max(1), pairs)
    }

    /// Restrict the layout to `requested`, in request order
    ///
    /// Requested quantities the file does not carry are skipped; accessors
    /// then simply never see them.
    pub fn select(&self, requested: &[Quantity]) -> Self {
        let mut entries = Vec::with_capacity(requested.len());
        for q in requested {
            match self.entry_for(*q) {
                Some(entry) => entries.push(*entry),
                None => debug!("Quantity '{}' not present in stream layout, skipping", q),
            }
        }
        Self {
            stride: self.stride,
            entries,
        }
    }

    /// Bytes per particle record
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Entries in layout order
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Number of quantities in the layout
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the layout carries no quantities
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a quantity, if the layout carries it
    pub fn entry_for(&self, quantity: Quantity) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.quantity == quantity)
    }

    /// Entry for a field name, if the name is cataloged and the layout carries it
    pub fn entry(&self, name: &str) -> Option<&LayoutEntry> {
        Quantity::from_name(name).and_then(|q| self.entry_for(q))
    }

    /// Byte offset of a quantity
    pub fn offset_of(&self, quantity: Quantity) -> Option<usize> {
        self.entry_for(quantity).map(|e| e.offset)
    }

    /// True if the layout carries `quantity`
    pub fn contains(&self, quantity: Quantity) -> bool {
        self.entry_for(quantity).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_layout() {
        let layout =
            RecordLayout::new(20, [(Quantity::Px, 0), (Quantity::PdgId, 8), (Quantity::Py, 12)])
                .unwrap();
        assert_eq!(layout.stride(), 20);
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.offset_of(Quantity::PdgId), Some(8));
        assert_eq!(layout.entry("py").map(|e| e.offset), Some(12));
        assert!(layout.entry("pz").is_none());
        assert!(layout.entry("not_a_quantity").is_none());
    }

    #[test]
    fn test_out_of_bounds() {
        let err = RecordLayout::new(12, [(Quantity::Px, 8)]).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::OutOfBounds { quantity: "px", offset: 8, width: 8, stride: 12 }
        ));
        assert!(RecordLayout::new(8, [(Quantity::Px, usize::MAX)]).is_err());
    }

    #[test]
    fn test_overlap_and_duplicate() {
        let err = RecordLayout::new(32, [(Quantity::Px, 0), (Quantity::Py, 4)]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Overlap {
                first: "px",
                second: "py"
            }
        );

        let err = RecordLayout::new(32, [(Quantity::Px, 0), (Quantity::Px, 8)]).unwrap_err();
        assert_eq!(err, LayoutError::Duplicate("px"));
    }

    #[test]
    fn test_invalid_stride() {
        assert_eq!(
            RecordLayout::new(0, []).unwrap_err(),
            LayoutError::InvalidStride(0)
        );
        assert!(RecordLayout::new(MAX_RECORD_STRIDE + 1, []).is_err());
    }

    #[test]
    fn test_select_keeps_request_order_and_skips_absent() {
        let layout = RecordLayout::packed(&[Quantity::Px, Quantity::Py, Quantity::PdgId]).unwrap();
        let selected = layout.select(&[Quantity::PdgId, Quantity::Pz, Quantity::Px]);
        let names: Vec<_> = selected.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["pdg_id", "px"]);
        assert_eq!(selected.stride(), layout.stride());
    }

    #[test]
    fn test_packed_offsets() {
        let layout = RecordLayout::packed(&[Quantity::PdgId, Quantity::Px]).unwrap();
        assert_eq!(layout.stride(), 12);
        assert_eq!(layout.offset_of(Quantity::Px), Some(4));
    }
}
