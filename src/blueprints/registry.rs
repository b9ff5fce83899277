//! Blueprint registry.
//!
//! The registry is the uniqueness authority for blueprint names and the
//! sole place blueprints are deleted from. On removal it fires the
//! blueprint's deletion signal and then heals referential integrity: every
//! live instruction target naming the deleted blueprint is reset to empty.
//! The sweep is driven through the deletion signal itself - the registry
//! subscribes a listener that enqueues the retired id, and drains that
//! queue once the signal has fired - so external subscribers observe the
//! deletion through the same channel.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::types::BlueprintId;
use crate::rules::clear_deleted_target;

use super::blueprint::BlueprintRef;

/// Registry enforcing blueprint name uniqueness
#[derive(Default)]
pub struct BlueprintRegistry {
    blueprints: Vec<BlueprintRef>,
    /// Ids whose deletion signal has fired and whose targets await clearing
    retired: Rc<RefCell<Vec<BlueprintId>>>,
}

impl BlueprintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blueprint
    ///
    /// Returns false (no state change) when the blueprint is already
    /// registered or another blueprint holds the same name.
    pub fn add(&mut self, blueprint: &BlueprintRef) -> bool {
        if self.blueprints.iter().any(|b| Rc::ptr_eq(b, blueprint)) {
            return false;
        }
        let name = blueprint.name();
        if self.blueprints.iter().any(|b| b.name() == name) {
            return false;
        }

        let retired = Rc::clone(&self.retired);
        blueprint.once_removed(move |id| retired.borrow_mut().push(*id));

        self.blueprints.push(Rc::clone(blueprint));
        true
    }

    /// Rename a blueprint; a silent no-op returning false when the new name
    /// is already taken by another registered blueprint.
    pub fn rename(&self, blueprint: &BlueprintRef, name: &str) -> bool {
        let taken = self
            .blueprints
            .iter()
            .any(|b| !Rc::ptr_eq(b, blueprint) && b.name() == name);
        if taken {
            return false;
        }
        blueprint.set_name_unchecked(name);
        true
    }

    /// Unregister a blueprint, firing its deletion signal exactly once and
    /// resetting every live instruction target that names it.
    pub fn remove(&mut self, blueprint: &BlueprintRef) -> bool {
        let Some(index) = self.blueprints.iter().position(|b| Rc::ptr_eq(b, blueprint)) else {
            return false;
        };
        let removed = self.blueprints.remove(index);
        removed.fire_removed();

        let retired: Vec<BlueprintId> = self.retired.borrow_mut().drain(..).collect();
        for id in retired {
            let mut cleared = 0;
            for holder in self.blueprints.iter().chain(std::iter::once(&removed)) {
                cleared += clear_deleted_target(&mut holder.rules_mut(), id);
            }
            if cleared > 0 {
                tracing::debug!(deleted = id.0, cleared, "reset instruction targets of deleted blueprint");
            }
        }
        true
    }

    pub fn get_by_name(&self, name: &str) -> Option<BlueprintRef> {
        self.blueprints
            .iter()
            .find(|b| b.name() == name)
            .map(Rc::clone)
    }

    pub fn contains(&self, blueprint: &BlueprintRef) -> bool {
        self.blueprints.iter().any(|b| Rc::ptr_eq(b, blueprint))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlueprintRef> {
        self.blueprints.iter()
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    /// First name in `base`, `base1`, `base2`, ... that is not taken
    pub fn fresh_name(&self, base: &str) -> String {
        if self.get_by_name(base).is_none() {
            return base.to_string();
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.get_by_name(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }
}
