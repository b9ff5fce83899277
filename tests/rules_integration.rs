//! Rule interpreter and lifecycle integration tests
//!
//! Drives whole ticks through the public API: chance bounds over many
//! trials, turn-into transformations, neighbor-count conditions on a full
//! Moore neighborhood, and deletion propagation from the registry into live
//! rule trees.

use std::rc::Rc;

use cellforge::blueprints::BlueprintOptions;
use cellforge::blueprints::{Blueprint, BlueprintRef, BlueprintRegistry, CellInstance};
use cellforge::core::types::Coord;
use cellforge::grid::Grid;
use cellforge::rules::{CountOp, Instruction, Target};

fn reference(name: &str, icon: &str) -> BlueprintRef {
    Blueprint::with_options(
        name,
        icon,
        BlueprintOptions {
            is_reference: true,
            ..Default::default()
        },
    )
}

/// Run `trials` ticks of a fresh chance-gated instance and count how often
/// the branch fired.
fn chance_hits(probability: f64, trials: u32) -> u32 {
    let mut grid = Grid::seeded(2, 2, 99);
    let moss = Blueprint::new("moss", "M");
    let marker = Blueprint::new("marker", "x");
    moss.rules_mut().push(Instruction::Chance {
        probability,
        then: vec![Instruction::TurnInto {
            target: Target::blueprint(&marker),
        }],
    });

    let position = Coord::new(0, 0);
    let mut hits = 0;
    for _ in 0..trials {
        grid.set_cell(CellInstance::new(Rc::clone(&moss)), position);
        grid.tick(100.0);
        let entries = grid.entries_at(position);
        if entries[0].instance.blueprint().id() == marker.id() {
            hits += 1;
        }
        grid.remove_cell(position);
    }
    hits
}

#[test]
fn chance_hundred_fires_on_every_trial() {
    assert_eq!(chance_hits(100.0, 10_000), 10_000);
}

#[test]
fn chance_zero_never_fires() {
    assert_eq!(chance_hits(0.0, 10_000), 0);
}

#[test]
fn turn_into_empty_clears_every_held_position() {
    let mut grid = Grid::seeded(8, 8, 5);
    let vine = reference("vine", "V");
    vine.rules_mut().push(Instruction::TurnInto {
        target: Target::Empty,
    });

    let instance = CellInstance::new(Rc::clone(&vine));
    let p1 = Coord::new(1, 1);
    let p2 = Coord::new(6, 2);
    grid.set_cell(Rc::clone(&instance), p1);
    grid.set_cell(Rc::clone(&instance), p2);

    grid.tick(100.0);

    assert!(grid.entries_at(p1).is_empty());
    assert!(grid.entries_at(p2).is_empty());
}

#[test]
fn exactly_eight_neighbor_condition() {
    let moss = Blueprint::new("moss", "M");
    let rock = Blueprint::new("rock", "R");
    moss.rules_mut().push(Instruction::IfNeighborCount {
        op: CountOp::Exactly,
        threshold: 8,
        target: Target::blueprint(&rock),
        then: vec![Instruction::TurnInto {
            target: Target::Empty,
        }],
    });

    let fill_block = |grid: &mut Grid| {
        let center = CellInstance::new(Rc::clone(&moss));
        grid.set_cell(Rc::clone(&center), Coord::new(1, 1));
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (1, 1) {
                    grid.set_cell(CellInstance::new(Rc::clone(&rock)), Coord::new(x, y));
                }
            }
        }
        center
    };

    // All 8 neighbors present: the condition holds and the moss clears
    let mut grid = Grid::seeded(3, 3, 5);
    let center = fill_block(&mut grid);
    grid.tick(100.0);
    assert!(grid.positions_of(&center).is_empty());

    // One neighbor short: the condition fails and the moss survives
    let mut grid = Grid::seeded(3, 3, 5);
    let center = fill_block(&mut grid);
    grid.remove_cell(Coord::new(2, 2));
    grid.tick(100.0);
    assert_eq!(grid.positions_of(&center), vec![Coord::new(1, 1)]);
}

#[test]
fn deleting_blueprint_resets_turn_into_targets() {
    let mut registry = BlueprintRegistry::new();
    let moss = Blueprint::new("moss", "M");
    let doomed = Blueprint::new("doomed", "D");
    registry.add(&moss);
    registry.add(&doomed);

    moss.rules_mut().push(Instruction::TurnInto {
        target: Target::blueprint(&doomed),
    });

    registry.remove(&doomed);
    assert!(
        matches!(&moss.rules()[0], Instruction::TurnInto { target } if target.is_empty())
    );

    // The healed rule now erases instead of transforming
    let mut grid = Grid::seeded(4, 4, 5);
    let instance = CellInstance::new(Rc::clone(&moss));
    grid.set_cell(Rc::clone(&instance), Coord::new(2, 2));
    grid.tick(100.0);
    assert!(grid.entries_at(Coord::new(2, 2)).is_empty());
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut grid = Grid::seeded(6, 6, 1234);
        let moss = Blueprint::new("moss", "M");
        let fern = Blueprint::new("fern", "F");
        moss.rules_mut().push(Instruction::Chance {
            probability: 50.0,
            then: vec![Instruction::TurnInto {
                target: Target::blueprint(&fern),
            }],
        });

        for i in 0..6 {
            grid.set_cell(CellInstance::new(Rc::clone(&moss)), Coord::new(i, i));
        }
        for _ in 0..5 {
            grid.tick(100.0);
        }

        let mut flipped: Vec<Coord> = (0..6)
            .map(|i| Coord::new(i, i))
            .filter(|&pos| {
                grid.entries_at(pos)
                    .first()
                    .map(|e| e.instance.blueprint().id() == fern.id())
                    .unwrap_or(false)
            })
            .collect();
        flipped.sort_by_key(|p| (p.x, p.y));
        flipped
    };

    assert_eq!(run(), run());
}

#[test]
fn instances_created_mid_tick_run_on_the_next_tick() {
    // The tick loop snapshots the instances present when it starts, so a
    // transformation's fresh instance sits out the remainder of the tick.
    let mut grid = Grid::seeded(3, 3, 5);
    let caterpillar = Blueprint::new("caterpillar", "c");
    let butterfly = Blueprint::new("butterfly", "b");
    caterpillar.rules_mut().push(Instruction::TurnInto {
        target: Target::blueprint(&butterfly),
    });
    butterfly.rules_mut().push(Instruction::TurnInto {
        target: Target::Empty,
    });

    let position = Coord::new(1, 1);
    grid.set_cell(CellInstance::new(Rc::clone(&caterpillar)), position);

    grid.tick(100.0);
    let entries = grid.entries_at(position);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].instance.blueprint().id(), butterfly.id());

    grid.tick(100.0);
    assert!(grid.entries_at(position).is_empty());
}
