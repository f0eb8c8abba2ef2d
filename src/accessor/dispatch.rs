//! Fan-out to registered analyses

use std::sync::Arc;

use log::debug;

use super::{Accessor, AccessorError};
use crate::analysis::Analysis;
use crate::block::{EndBlock, ParticleBlock};
use crate::layout::RecordLayout;

/// Composite accessor that forwards every block to its registered analyses
///
/// Members are called in registration order with the same block. The first
/// member to fail stops the fan-out for that block and the error aborts the
/// read; later members are not notified.
#[derive(Default)]
pub struct DispatchingAccessor {
    analyses: Vec<Box<dyn Analysis>>,
}

impl DispatchingAccessor {
    /// Create a dispatcher with no members
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an analysis to the fan-out list
    pub fn register_analysis(&mut self, analysis: Box<dyn Analysis>) {
        debug!(
            "Registering analysis '{}' at position {}",
            analysis.name(),
            self.analyses.len()
        );
        self.analyses.push(analysis);
    }

    /// Registered analyses in registration order
    pub fn analyses(&self) -> &[Box<dyn Analysis>] {
        &self.analyses
    }

    /// Mutable access to the registered analyses
    pub fn analyses_mut(&mut self) -> &mut [Box<dyn Analysis>] {
        &mut self.analyses
    }

    /// Release the registered analyses
    pub fn into_analyses(self) -> Vec<Box<dyn Analysis>> {
        self.analyses
    }

    /// Number of registered analyses
    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    /// True if no analysis is registered
    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    fn for_each_member<F>(&mut self, mut f: F) -> Result<(), AccessorError>
    where
        F: FnMut(&mut dyn Analysis) -> Result<(), AccessorError>,
    {
        for analysis in &mut self.analyses {
            f(analysis.as_mut()).map_err(|source| AccessorError::Member {
                name: analysis.name().to_string(),
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DispatchingAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchingAccessor")
            .field(
                "analyses",
                &self.analyses.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Accessor for DispatchingAccessor {
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        for analysis in &mut self.analyses {
            analysis.set_layout(Arc::clone(&layout));
        }
    }

    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        self.for_each_member(|analysis| analysis.on_particle_block(block))
    }

    fn on_end_block(&mut self, block: &EndBlock) -> Result<(), AccessorError> {
        self.for_each_member(|analysis| analysis.on_end_block(block))
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        self.analyses.iter().find_map(|a| a.get_int(name))
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        self.analyses.iter().find_map(|a| a.get_double(name))
    }
}
