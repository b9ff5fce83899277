//! Recursive instruction interpreter.
//!
//! Pure function of `(instance, grid)`: depth-first walks the instance
//! blueprint's root instructions once per tick, querying the grid for
//! positions and neighbors and issuing placements/removals synchronously.
//! Chance draws come from the grid's shared generator, one independent draw
//! per node per tick.

use std::rc::Rc;

use rand::Rng;

use crate::blueprints::{CellInstance, InstanceRef};
use crate::grid::Grid;

use super::instruction::{Instruction, Target};

/// Nesting deeper than this is pruned rather than overflowing the stack.
/// Real rule trees are a handful of levels deep; the cap is deliberately
/// far above anything an editor produces.
pub const MAX_RULE_DEPTH: usize = 512;

/// Walk the instance blueprint's rule tree once
pub fn run(instance: &InstanceRef, grid: &mut Grid) {
    let blueprint = Rc::clone(instance.blueprint());
    let rules = blueprint.rules();
    execute_all(&rules, instance, grid, 0);
}

fn execute_all(instructions: &[Instruction], instance: &InstanceRef, grid: &mut Grid, depth: usize) {
    if depth > MAX_RULE_DEPTH {
        tracing::warn!(
            blueprint = %instance.blueprint().name(),
            "rule tree nested deeper than {MAX_RULE_DEPTH}, pruning"
        );
        return;
    }
    for instruction in instructions {
        execute(instruction, instance, grid, depth);
    }
}

fn execute(instruction: &Instruction, instance: &InstanceRef, grid: &mut Grid, depth: usize) {
    match instruction {
        Instruction::Chance { probability, then } => {
            let draw = grid.rng_mut().gen_range(0.0f64..100.0);
            if draw < *probability {
                execute_all(then, instance, grid, depth + 1);
            }
        }
        Instruction::TurnInto { target } => turn_into(target, instance, grid),
        Instruction::IfNeighborCount {
            op,
            threshold,
            target,
            then,
        } => {
            let count = matching_neighbor_count(grid, instance, target);
            if op.compare(count, *threshold) {
                execute_all(then, instance, grid, depth + 1);
            }
        }
    }
}

/// Replace the instance at every position it currently holds.
///
/// An empty (or dangling) target erases each position outright; a blueprint
/// target stamps a fresh instance per position. The running instance is
/// simply no longer present afterwards - any siblings still walking operate
/// on an unplaced instance and naturally no-op.
fn turn_into(target: &Target, instance: &InstanceRef, grid: &mut Grid) {
    let positions = grid.positions_of(instance);
    match target.resolve() {
        None => {
            for position in positions {
                grid.remove_cell(position);
            }
        }
        Some(blueprint) => {
            for position in positions {
                grid.set_cell(CellInstance::new(Rc::clone(&blueprint)), position);
            }
        }
    }
}

/// Count neighbors whose blueprint matches the target by identity.
///
/// An empty target matches no real neighbor, so its count is always zero;
/// conditions like `LessThan 1` against empty therefore always hold and
/// `AtLeast 1` never does.
fn matching_neighbor_count(grid: &Grid, instance: &InstanceRef, target: &Target) -> u32 {
    let Some(blueprint) = target.resolve() else {
        return 0;
    };
    grid.neighbors_of(instance)
        .iter()
        .filter(|entry| entry.instance.blueprint().id() == blueprint.id())
        .count() as u32
}
