//! Blueprint system: named rule/appearance templates, the live instances
//! placed on the grid, and the uniqueness-enforcing registry.

pub mod blueprint;
pub mod instance;
pub mod registry;

pub use blueprint::{Blueprint, BlueprintOptions, BlueprintRef, ChangeEvent, Value, Variable};
pub use instance::{CellInstance, InstanceRef};
pub use registry::BlueprintRegistry;
