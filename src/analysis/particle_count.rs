//! Particle multiplicities per species

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::{save_json, Analysis, AnalysisError};
use crate::accessor::{Accessor, AccessorError, LayoutSlot};
use crate::block::{EndBlock, ParticleBlock};
use crate::layout::RecordLayout;
use crate::quantity::Quantity;

/// Counts particles per PDG code and tracks event-level totals
///
/// Without `pdg_id` in the layout only the totals are filled.
#[derive(Debug, Clone)]
pub struct ParticleCount {
    layout: LayoutSlot,
    counts: BTreeMap<i32, u64>,
    particle_blocks: u64,
    total_particles: u64,
    events: u64,
    empty_events: u64,
    impact_parameter_sum: f64,
}

/// Serializable snapshot of a [`ParticleCount`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleCountResult {
    /// End-of-event blocks seen
    pub events: u64,
    /// Events flagged as empty
    pub empty_events: u64,
    /// Particle blocks seen
    pub particle_blocks: u64,
    /// Particles seen
    pub total_particles: u64,
    /// Mean particles per particle block
    pub mean_multiplicity: f64,
    /// Mean impact parameter over events (fm)
    pub mean_impact_parameter: f64,
    /// Particles per PDG code
    pub counts: BTreeMap<i32, u64>,
}

impl Default for ParticleCount {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleCount {
    /// Registry name
    pub const NAME: &'static str = "particle_count";

    /// Empty analysis
    pub fn new() -> Self {
        Self {
            layout: LayoutSlot::new("particle_count"),
            counts: BTreeMap::new(),
            particle_blocks: 0,
            total_particles: 0,
            events: 0,
            empty_events: 0,
            impact_parameter_sum: 0.0,
        }
    }

    /// Registry factory
    pub fn factory() -> Box<dyn Analysis> {
        Box::new(Self::new())
    }

    /// Snapshot of the accumulated result
    pub fn result(&self) -> ParticleCountResult {
        ParticleCountResult {
            events: self.events,
            empty_events: self.empty_events,
            particle_blocks: self.particle_blocks,
            total_particles: self.total_particles,
            mean_multiplicity: mean(self.total_particles as f64, self.particle_blocks),
            mean_impact_parameter: mean(self.impact_parameter_sum, self.events),
            counts: self.counts.clone(),
        }
    }
}

fn mean(sum: f64, n: u64) -> f64 {
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

impl Accessor for ParticleCount {
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        self.layout.set(layout);
    }

    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        let pdg = self.layout.get()?.entry_for(Quantity::PdgId).copied();
        self.particle_blocks += 1;
        self.total_particles += block.npart() as u64;

        if let Some(pdg) = pdg {
            for particle in block.particles() {
                *self.counts.entry(particle.int(&pdg)?).or_insert(0) += 1;
            }
        }
        Ok(())
    }

    fn on_end_block(&mut self, block: &EndBlock) -> Result<(), AccessorError> {
        self.events += 1;
        self.impact_parameter_sum += block.impact_parameter;
        if block.empty_event {
            self.empty_events += 1;
        }
        Ok(())
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        match name {
            "events" => Some(self.events as i64),
            "total_particles" => Some(self.total_particles as i64),
            "species" => Some(self.counts.len() as i64),
            _ => None,
        }
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        match name {
            "mean_multiplicity" => Some(mean(self.total_particles as f64, self.particle_blocks)),
            "mean_impact_parameter" => Some(mean(self.impact_parameter_sum, self.events)),
            _ => None,
        }
    }
}

impl Analysis for ParticleCount {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_quantities(&self) -> &[&'static str] {
        &["pdg_id"]
    }

    fn save(&self, path: &Path) -> Result<(), AnalysisError> {
        save_json(path, Self::NAME, &self.result())
    }

    fn print_result_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        let result = self.result();
        writeln!(sink, "Particle count")?;
        writeln!(sink, "  events:                {}", result.events)?;
        writeln!(sink, "  empty events:          {}", result.empty_events)?;
        writeln!(sink, "  particle blocks:       {}", result.particle_blocks)?;
        writeln!(sink, "  total particles:       {}", result.total_particles)?;
        writeln!(sink, "  mean multiplicity:     {:.3}", result.mean_multiplicity)?;
        writeln!(sink, "  mean impact parameter: {:.3} fm", result.mean_impact_parameter)?;
        if !result.counts.is_empty() {
            writeln!(sink)?;
            writeln!(sink, "  {:>10}  {:>12}", "pdg_id", "count")?;
            for (pdg, count) in &result.counts {
                writeln!(sink, "  {:>10}  {:>12}", pdg, count)?;
            }
        }
        Ok(())
    }
}
