//! Columnar collector

use std::collections::HashMap;
use std::sync::Arc;

use super::{Accessor, AccessorError, LayoutSlot};
use crate::block::ParticleBlock;
use crate::layout::{LayoutEntry, RecordLayout};
use crate::quantity::QuantityType;

#[derive(Debug, Clone, PartialEq)]
enum ColumnData {
    Double(Vec<f64>),
    Int(Vec<i32>),
}

/// One named column of decoded values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: &'static str,
    data: ColumnData,
}

impl Column {
    fn for_entry(entry: &LayoutEntry) -> Self {
        let data = match entry.ty {
            QuantityType::Double => ColumnData::Double(Vec::new()),
            QuantityType::Int32 => ColumnData::Int(Vec::new()),
        };
        Self {
            name: entry.name(),
            data,
        }
    }

    /// Quantity name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Storage type of the column
    pub fn quantity_type(&self) -> QuantityType {
        match self.data {
            ColumnData::Double(_) => QuantityType::Double,
            ColumnData::Int(_) => QuantityType::Int32,
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Double(v) => v.len(),
            ColumnData::Int(v) => v.len(),
        }
    }

    /// True if the column holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn truncate(&mut self, len: usize) {
        match &mut self.data {
            ColumnData::Double(v) => v.truncate(len),
            ColumnData::Int(v) => v.truncate(len),
        }
    }

    /// Values of a double column
    pub fn as_doubles(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Double(v) => Some(v),
            ColumnData::Int(_) => None,
        }
    }

    /// Values of an int32 column
    pub fn as_ints(&self) -> Option<&[i32]> {
        match &self.data {
            ColumnData::Int(v) => Some(v),
            ColumnData::Double(_) => None,
        }
    }
}

/// Collects every requested quantity into one flat column
///
/// Columns appear in the order their quantities were first decoded, and
/// values from consecutive events are concatenated. `event_sizes` records
/// the particle count of each block so callers can split the columns back
/// into events.
#[derive(Debug, Clone)]
pub struct CollectorAccessor {
    layout: LayoutSlot,
    columns: Vec<Column>,
    index: HashMap<&'static str, usize>,
    event_sizes: Vec<usize>,
}

impl Default for CollectorAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectorAccessor {
    /// Create an empty collector
    pub fn new() -> Self {
        Self {
            layout: LayoutSlot::new("CollectorAccessor"),
            columns: Vec::new(),
            index: HashMap::new(),
            event_sizes: Vec::new(),
        }
    }

    fn column_mut(&mut self, entry: &LayoutEntry) -> &mut Column {
        let idx = match self.index.get(entry.name()) {
            Some(&idx) => idx,
            None => {
                self.columns.push(Column::for_entry(entry));
                let idx = self.columns.len() - 1;
                self.index.insert(entry.name(), idx);
                idx
            }
        };
        &mut self.columns[idx]
    }

    /// Column by quantity name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&idx| &self.columns[idx])
    }

    /// All columns in first-seen order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Names of the populated columns in first-seen order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Values of a double quantity across the whole stream
    pub fn get_double_array(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::as_doubles)
    }

    /// Values of an int32 quantity across the whole stream
    pub fn get_int_array(&self, name: &str) -> Option<&[i32]> {
        self.column(name).and_then(Column::as_ints)
    }

    /// Particle count of every block, in stream order
    pub fn get_event_sizes(&self) -> &[usize] {
        &self.event_sizes
    }

    /// Total number of particles collected
    pub fn total_particles(&self) -> usize {
        self.event_sizes.iter().sum()
    }

    /// Number of particle blocks collected
    pub fn num_blocks(&self) -> usize {
        self.event_sizes.len()
    }

    fn append_block(
        &mut self,
        layout: &RecordLayout,
        block: &ParticleBlock<'_>,
    ) -> Result<(), AccessorError> {
        for entry in layout.entries() {
            match &mut self.column_mut(entry).data {
                ColumnData::Double(values) => {
                    values.reserve(block.npart());
                    for particle in block.particles() {
                        values.push(particle.double(entry)?);
                    }
                }
                ColumnData::Int(values) => {
                    values.reserve(block.npart());
                    for particle in block.particles() {
                        values.push(particle.int(entry)?);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Accessor for CollectorAccessor {
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        self.layout.set(layout);
    }

    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        let layout = Arc::clone(self.layout.get()?);
        if block.npart() > 0 {
            let known_columns = self.columns.len();
            let lengths: Vec<usize> = self.columns.iter().map(Column::len).collect();
            if let Err(err) = self.append_block(&layout, block) {
                // Leave the collector as it was before this block
                for column in self.columns.drain(known_columns..) {
                    self.index.remove(column.name);
                }
                for (column, len) in self.columns.iter_mut().zip(lengths) {
                    column.truncate(len);
                }
                return Err(err);
            }
        }
        self.event_sizes.push(block.npart());
        Ok(())
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        match name {
            "n_events" => Some(self.event_sizes.len() as i64),
            "n_particles" => Some(self.total_particles() as i64),
            _ => None,
        }
    }
}
