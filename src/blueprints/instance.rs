//! Runtime cell instances - placement units stamped from blueprints.
//!
//! An instance owns nothing beyond a shared reference to its blueprint. It
//! is created on placement or by a turn-into transformation and discarded
//! when removed or superseded; there is no per-instance state to carry over.

use std::rc::Rc;

use crate::core::types::InstanceId;
use crate::grid::Grid;
use crate::rules::interpreter;

use super::blueprint::BlueprintRef;

/// Shared handle to a placed cell instance
pub type InstanceRef = Rc<CellInstance>;

/// A live placement unit wrapping a shared blueprint reference
#[derive(Debug)]
pub struct CellInstance {
    id: InstanceId,
    blueprint: BlueprintRef,
}

impl CellInstance {
    pub fn new(blueprint: BlueprintRef) -> InstanceRef {
        Rc::new(Self {
            id: InstanceId::next(),
            blueprint,
        })
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn blueprint(&self) -> &BlueprintRef {
        &self.blueprint
    }

    /// Run this instance's blueprint rules for one tick
    ///
    /// This is the instance's only behavioral entry point; it delegates to
    /// the rule interpreter, which queries and mutates the grid.
    pub fn tick(self: &Rc<Self>, delta_ms: f64, grid: &mut Grid) {
        tracing::trace!(instance = self.id.0, delta_ms, "instance tick");
        interpreter::run(self, grid);
    }
}
