//! Blueprint definitions - the named, iconed templates cells are stamped
//! from.
//!
//! A blueprint owns its appearance (name, icon), its occupancy flags, a set
//! of typed variables, and the root instructions run for each of its
//! instances every tick. Blueprints are shared by handle ([`BlueprintRef`]);
//! identity is the handle, not the name. Name uniqueness is the registry's
//! concern, which is why renaming lives on [`BlueprintRegistry`](crate::blueprints::BlueprintRegistry)
//! rather than here.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::types::BlueprintId;
use crate::events::{ListenerKey, Signal};
use crate::rules::Instruction;

/// Shared handle to a blueprint
pub type BlueprintRef = Rc<Blueprint>;

/// A typed variable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Text(String),
}

/// A named variable on a blueprint; names are unique within one blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: Value,
}

/// Payload of the change signal
///
/// Carries the new value so listeners do not need to reach back into the
/// blueprint while the signal is firing.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Renamed { name: String },
    IconChanged { icon: String },
}

#[derive(Debug)]
struct Appearance {
    name: String,
    icon: String,
}

/// Construction options beyond name and icon
#[derive(Debug, Clone, Default)]
pub struct BlueprintOptions {
    /// Reference blueprints may be placed at multiple positions at once
    pub is_reference: bool,
    /// Floating blueprints overlap other cells and do not block placement
    pub is_floating: bool,
    pub variables: Vec<Variable>,
}

/// Named, iconed cell template
pub struct Blueprint {
    id: BlueprintId,
    pub is_reference: bool,
    pub is_floating: bool,
    appearance: RefCell<Appearance>,
    variables: RefCell<Vec<Variable>>,
    rules: RefCell<Vec<Instruction>>,
    change: RefCell<Signal<ChangeEvent>>,
    removed: RefCell<Signal<BlueprintId>>,
}

impl Blueprint {
    pub fn new(name: &str, icon: &str) -> BlueprintRef {
        Self::with_options(name, icon, BlueprintOptions::default())
    }

    pub fn with_options(name: &str, icon: &str, options: BlueprintOptions) -> BlueprintRef {
        Rc::new(Self {
            id: BlueprintId::next(),
            is_reference: options.is_reference,
            is_floating: options.is_floating,
            appearance: RefCell::new(Appearance {
                name: name.to_string(),
                icon: icon.to_string(),
            }),
            variables: RefCell::new(options.variables),
            rules: RefCell::new(Vec::new()),
            change: RefCell::new(Signal::new()),
            removed: RefCell::new(Signal::new()),
        })
    }

    pub fn id(&self) -> BlueprintId {
        self.id
    }

    pub fn name(&self) -> String {
        self.appearance.borrow().name.clone()
    }

    pub fn icon(&self) -> String {
        self.appearance.borrow().icon.clone()
    }

    /// Set the icon and fire the change signal
    pub fn set_icon(&self, icon: &str) {
        self.appearance.borrow_mut().icon = icon.to_string();
        self.change.borrow_mut().send(&ChangeEvent::IconChanged {
            icon: icon.to_string(),
        });
    }

    /// Rename without a uniqueness check; the registry is the only caller
    pub(crate) fn set_name_unchecked(&self, name: &str) {
        self.appearance.borrow_mut().name = name.to_string();
        self.change.borrow_mut().send(&ChangeEvent::Renamed {
            name: name.to_string(),
        });
    }

    /// Add a variable; returns false (no state change) on a duplicate name
    pub fn add_variable(&self, name: &str, value: Value) -> bool {
        let mut variables = self.variables.borrow_mut();
        if variables.iter().any(|v| v.name == name) {
            return false;
        }
        variables.push(Variable {
            name: name.to_string(),
            value,
        });
        true
    }

    /// Remove a variable by name; returns whether one existed
    pub fn remove_variable(&self, name: &str) -> bool {
        let mut variables = self.variables.borrow_mut();
        let before = variables.len();
        variables.retain(|v| v.name != name);
        variables.len() != before
    }

    /// Overwrite an existing variable's value; false if no such variable
    pub fn set_variable(&self, name: &str, value: Value) -> bool {
        let mut variables = self.variables.borrow_mut();
        match variables.iter_mut().find(|v| v.name == name) {
            Some(variable) => {
                variable.value = value;
                true
            }
            None => false,
        }
    }

    pub fn variable(&self, name: &str) -> Option<Value> {
        self.variables
            .borrow()
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.clone())
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.variables.borrow().clone()
    }

    /// The root instruction set, read-only
    pub fn rules(&self) -> Ref<'_, Vec<Instruction>> {
        self.rules.borrow()
    }

    /// The root instruction set, writable; the editor builds the tree here
    /// directly
    pub fn rules_mut(&self) -> RefMut<'_, Vec<Instruction>> {
        self.rules.borrow_mut()
    }

    /// Register a persistent change listener (fires on rename or icon change)
    pub fn subscribe_change(&self, key: ListenerKey, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.change.borrow_mut().subscriber().subscribe(key, listener);
    }

    pub fn once_change(&self, listener: impl FnOnce(&ChangeEvent) + 'static) {
        self.change.borrow_mut().subscriber().once(listener);
    }

    pub fn unsubscribe_change(&self, key: ListenerKey) -> bool {
        self.change.borrow_mut().subscriber().unsubscribe(key)
    }

    /// Register a persistent deletion listener; the signal fires exactly once,
    /// when the blueprint is removed from its registry
    pub fn subscribe_removed(&self, key: ListenerKey, listener: impl FnMut(&BlueprintId) + 'static) {
        self.removed.borrow_mut().subscriber().subscribe(key, listener);
    }

    pub fn once_removed(&self, listener: impl FnOnce(&BlueprintId) + 'static) {
        self.removed.borrow_mut().subscriber().once(listener);
    }

    /// Fire the deletion signal; the registry calls this once on removal
    pub(crate) fn fire_removed(&self) {
        let id = self.id;
        self.removed.borrow_mut().send(&id);
    }
}

impl std::fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let appearance = self.appearance.borrow();
        f.debug_struct("Blueprint")
            .field("id", &self.id)
            .field("name", &appearance.name)
            .field("icon", &appearance.icon)
            .field("is_reference", &self.is_reference)
            .field("is_floating", &self.is_floating)
            .finish()
    }
}
