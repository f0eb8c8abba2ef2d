//! Transverse momentum histogram

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::{save_json, Analysis, AnalysisError};
use crate::accessor::{Accessor, AccessorError, LayoutSlot};
use crate::block::{EndBlock, ParticleBlock};
use crate::layout::RecordLayout;
use crate::quantity::Quantity;

/// Number of histogram bins
pub const PT_BINS: usize = 20;

/// Upper edge of the last bin (GeV)
pub const PT_MAX: f64 = 4.0;

/// Histogram of pT = sqrt(px² + py²)
///
/// Values at or above [`PT_MAX`] (and non-finite values) go to the overflow counter.
#[derive(Debug, Clone)]
pub struct PtSpectrum {
    layout: LayoutSlot,
    counts: [u64; PT_BINS],
    overflow: u64,
    entries: u64,
    pt_sum: f64,
    events: u64,
}

/// One histogram bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PtBin {
    /// Lower edge (GeV)
    pub low: f64,
    /// Upper edge (GeV)
    pub high: f64,
    /// Particles in the bin
    pub count: u64,
    /// count / (bin width * events), 0 without events
    pub density: f64,
}

/// Serializable snapshot of a [`PtSpectrum`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtSpectrumResult {
    /// Events seen
    pub events: u64,
    /// Particles histogrammed, overflow included
    pub entries: u64,
    /// Particles at or above the last edge
    pub overflow: u64,
    /// Mean pT over in-range entries, overflow excluded (GeV)
    pub mean_pt: f64,
    /// Bins in ascending pT order
    pub bins: Vec<PtBin>,
}

impl Default for PtSpectrum {
    fn default() -> Self {
        Self::new()
    }
}

impl PtSpectrum {
    /// Registry name
    pub const NAME: &'static str = "pt_spectrum";

    /// Empty histogram
    pub fn new() -> Self {
        Self {
            layout: LayoutSlot::new("pt_spectrum"),
            counts: [0; PT_BINS],
            overflow: 0,
            entries: 0,
            pt_sum: 0.0,
            events: 0,
        }
    }

    /// Registry factory
    pub fn factory() -> Box<dyn Analysis> {
        Box::new(Self::new())
    }

    fn bin_width() -> f64 {
        PT_MAX / PT_BINS as f64
    }

    /// Record one pT value (GeV)
    pub fn fill(&mut self, pt: f64) {
        self.entries += 1;
        if !pt.is_finite() || pt >= PT_MAX {
            self.overflow += 1;
            return;
        }
        self.pt_sum += pt;
        let bin = ((pt / Self::bin_width()) as usize).min(PT_BINS - 1);
        self.counts[bin] += 1;
    }

    fn mean_pt(&self) -> f64 {
        let in_range = self.entries - self.overflow;
        if in_range == 0 {
            0.0
        } else {
            self.pt_sum / in_range as f64
        }
    }

    /// Snapshot of the accumulated histogram
    pub fn result(&self) -> PtSpectrumResult {
        let width = Self::bin_width();
        let bins = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| PtBin {
                low: i as f64 * width,
                high: (i + 1) as f64 * width,
                count,
                density: if self.events == 0 {
                    0.0
                } else {
                    count as f64 / (width * self.events as f64)
                },
            })
            .collect();
        PtSpectrumResult {
            events: self.events,
            entries: self.entries,
            overflow: self.overflow,
            mean_pt: self.mean_pt(),
            bins,
        }
    }
}

impl Accessor for PtSpectrum {
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        self.layout.set(layout);
    }

    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        let layout = Arc::clone(self.layout.get()?);
        if block.npart() == 0 {
            return Ok(());
        }
        let (px, py) = match (layout.entry_for(Quantity::Px), layout.entry_for(Quantity::Py)) {
            (Some(px), Some(py)) => (px, py),
            _ => {
                return Err(AccessorError::Failed(
                    "pt_spectrum requires quantities 'px' and 'py'".to_string(),
                ))
            }
        };
        for particle in block.particles() {
            let pt = particle.double(px)?.hypot(particle.double(py)?);
            self.fill(pt);
        }
        Ok(())
    }

    fn on_end_block(&mut self, _block: &EndBlock) -> Result<(), AccessorError> {
        self.events += 1;
        Ok(())
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        match name {
            "entries" => Some(self.entries as i64),
            "overflow" => Some(self.overflow as i64),
            _ => None,
        }
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        match name {
            "mean_pt" => Some(self.mean_pt()),
            _ => None,
        }
    }
}

impl Analysis for PtSpectrum {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_quantities(&self) -> &[&'static str] {
        &["px", "py"]
    }

    fn save(&self, path: &Path) -> Result<(), AnalysisError> {
        save_json(path, Self::NAME, &self.result())
    }

    fn print_result_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        let result = self.result();
        writeln!(sink, "Transverse momentum spectrum")?;
        writeln!(
            sink,
            "  events: {}, entries: {}, overflow: {}, <pT> = {:.4} GeV",
            result.events, result.entries, result.overflow, result.mean_pt
        )?;
        let peak = result.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        for bin in &result.bins {
            let bar = "#".repeat((bin.count * 40 / peak) as usize);
            writeln!(
                sink,
                "  [{:4.2}, {:4.2})  {:>10}  {}",
                bin.low, bin.high, bin.count, bar
            )?;
        }
        Ok(())
    }
}
