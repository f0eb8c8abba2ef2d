//! Accessors: consumers of decoded blocks
//!
//! The [`BinaryReader`](crate::reader::BinaryReader) knows nothing about
//! what happens to the blocks it decodes. It hands the record layout to one
//! [`Accessor`] before the first block and then calls it once per particle
//! block and once per end-of-event block, in file order.
//!
//! Provided accessors:
//!
//! - [`NullAccessor`]: does nothing; useful for scanning or statistics
//! - [`CollectorAccessor`]: one flat column per quantity plus event sizes
//! - [`DictCollectorAccessor`]: one name → value record per particle
//! - [`DispatchingAccessor`]: fans the stream out to registered analyses
//!
//! Custom accessors follow the same decode rule as the collectors: walk the
//! entries of the layout (requested quantities the file does not carry are
//! never in it) and read each field through [`ParticleRecord`](crate::block::ParticleRecord).

use std::sync::Arc;

use crate::block::{EndBlock, ParticleBlock};
use crate::layout::RecordLayout;

pub use collector::{Column, CollectorAccessor};
pub use dict::{DictCollectorAccessor, ParticleDict};
pub use dispatch::DispatchingAccessor;
pub use error::AccessorError;

mod collector;
mod dict;
mod dispatch;
mod error;

/// Consumer of decoded stream blocks
///
/// Every method has a no-op default, so an empty `impl Accessor for T {}`
/// is a valid accessor.
pub trait Accessor {
    /// Receive the shared record layout; called once, before any block
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        let _ = layout;
    }

    /// Consume one event's particle block
    ///
    /// The block borrows the reader's buffer; copy out anything that must
    /// outlive the call.
    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        let _ = block;
        Ok(())
    }

    /// Consume an end-of-event marker
    fn on_end_block(&mut self, block: &EndBlock) -> Result<(), AccessorError> {
        let _ = block;
        Ok(())
    }

    /// Named integer output exposed by the accessor, if any
    fn get_int(&self, name: &str) -> Option<i64> {
        let _ = name;
        None
    }

    /// Named floating point output exposed by the accessor, if any
    fn get_double(&self, name: &str) -> Option<f64> {
        let _ = name;
        None
    }
}

impl<A: Accessor + ?Sized> Accessor for &mut A {
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        (**self).set_layout(layout)
    }

    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        (**self).on_particle_block(block)
    }

    fn on_end_block(&mut self, block: &EndBlock) -> Result<(), AccessorError> {
        (**self).on_end_block(block)
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        (**self).get_int(name)
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        (**self).get_double(name)
    }
}

impl<A: Accessor + ?Sized> Accessor for Box<A> {
    fn set_layout(&mut self, layout: Arc<RecordLayout>) {
        (**self).set_layout(layout)
    }

    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        (**self).on_particle_block(block)
    }

    fn on_end_block(&mut self, block: &EndBlock) -> Result<(), AccessorError> {
        (**self).on_end_block(block)
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        (**self).get_int(name)
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        (**self).get_double(name)
    }
}

/// Accessor that ignores every block
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAccessor;

impl Accessor for NullAccessor {}

/// Holder for the layout an accessor receives from the reader
#[derive(Debug, Clone)]
pub struct LayoutSlot {
    owner: &'static str,
    layout: Option<Arc<RecordLayout>>,
}

impl LayoutSlot {
    /// Empty slot; `owner` names the accessor in error messages
    pub const fn new(owner: &'static str) -> Self {
        Self {
            owner,
            layout: None,
        }
    }

    /// Store the layout
    pub fn set(&mut self, layout: Arc<RecordLayout>) {
        self.layout = Some(layout);
    }

    /// Shared layout, or [`AccessorError::LayoutNotInitialized`] if none was set yet
    pub fn get(&self) -> Result<&Arc<RecordLayout>, AccessorError> {
        self.layout
            .as_ref()
            .ok_or(AccessorError::LayoutNotInitialized {
                accessor: self.owner,
            })
    }

    /// True once a layout has been set
    pub fn is_set(&self) -> bool {
        self.layout.is_some()
    }
}
