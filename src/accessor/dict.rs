//! Per-particle record collector

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{Accessor, AccessorError, LayoutSlot};
use crate::block::{ParticleBlock, QuantityValue};
use crate::layout::RecordLayout;

/// Name → value record for one particle, in layout order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleDict {
    fields: Vec<(&'static str, QuantityValue)>,
}

impl ParticleDict {
    /// Value of a quantity, if the particle carries it
    pub fn get(&self, name: &str) -> Option<QuantityValue> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, QuantityValue)> + '_ {
        self.fields.iter().copied()
    }

    /// Quantity names present in the record
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ParticleDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Collects one [`ParticleDict`] per particle across the whole stream
///
/// Convenient for inspection of small streams; [`CollectorAccessor`](super::CollectorAccessor)
/// is far cheaper for anything large.
#[derive(Debug, Clone)]
pub struct DictCollectorAccessor {
    layout: LayoutSlot,
    particles: Vec<ParticleDict>,
}

impl Default for DictCollectorAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DictCollectorAccessor {
    /// Create an empty collector
    pub fn new() -> Self {
        Self {
            layout: LayoutSlot::new("DictCollectorAccessor"),
            particles: Vec::new(),
        }
    }

    /// All collected particles in stream order
    pub fn get_particle_dicts(&self) -> &[ParticleDict] {
        &self.particles
    }

    /// Take ownership of the collected particles
    pub fn into_particle_dicts(self) -> Vec<ParticleDict> {
        self.particles
    }

    /// Number of collected particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if nothing was collected
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Accessor for DictCollectorAccessor {
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        self.layout.set(layout);
    }

    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        let layout = self.layout.get()?;
        self.particles.reserve(block.npart());
        for particle in block.particles() {
            let mut fields = Vec::with_capacity(layout.len());
            for entry in layout.entries() {
                fields.push((entry.name(), particle.value(entry)?));
            }
            self.particles.push(ParticleDict { fields });
        }
        Ok(())
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        match name {
            "n_particles" => Some(self.particles.len() as i64),
            _ => None,
        }
    }
}
