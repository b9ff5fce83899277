//! Forest-fire demo driver
//!
//! Builds a small blueprint registry (trees that catch fire from burning
//! neighbors, fires that burn out), scatters trees over a grid, and ticks
//! the simulation from an external loop, printing frames along the way.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cellforge::blueprints::{Blueprint, BlueprintRegistry, CellInstance};
use cellforge::core::config::EngineConfig;
use cellforge::core::types::Coord;
use cellforge::grid::Grid;
use cellforge::rules::{CountOp, Instruction, Target};

const TICKS: u64 = 60;
const FRAME_EVERY: u64 = 15;
const TREE_DENSITY: f64 = 0.45;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Cellforge forest-fire demo");

    let config_path = Path::new("cellforge.toml");
    let config = if config_path.exists() {
        EngineConfig::load(config_path).expect("Failed to load cellforge.toml")
    } else {
        EngineConfig::default()
    };
    if let Err(reason) = config.validate() {
        eprintln!("Invalid config: {reason}");
        std::process::exit(1);
    }

    println!("Forest Fire Simulation");
    println!("======================");
    println!("Grid: {}x{}", config.grid_width, config.grid_height);
    println!("Ticks: {TICKS}");
    println!();

    let mut registry = BlueprintRegistry::new();

    let tree = Blueprint::new(&registry.fresh_name("tree"), "\u{1F332}");
    let fire = Blueprint::new(&registry.fresh_name("fire"), "\u{1F525}");
    registry.add(&tree);
    registry.add(&fire);

    // A tree next to at least one fire usually ignites; a rare lightning
    // strike ignites it regardless.
    tree.rules_mut().push(Instruction::IfNeighborCount {
        op: CountOp::AtLeast,
        threshold: 1,
        target: Target::blueprint(&fire),
        then: vec![Instruction::Chance {
            probability: 70.0,
            then: vec![Instruction::TurnInto {
                target: Target::blueprint(&fire),
            }],
        }],
    });
    tree.rules_mut().push(Instruction::Chance {
        probability: 0.5,
        then: vec![Instruction::TurnInto {
            target: Target::blueprint(&fire),
        }],
    });

    // Fires burn out
    fire.rules_mut().push(Instruction::Chance {
        probability: 60.0,
        then: vec![Instruction::TurnInto {
            target: Target::Empty,
        }],
    });

    let mut grid = Grid::from_config(&config);

    // Scatter the initial forest
    let mut scatter = match config.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    for y in 0..config.grid_height {
        for x in 0..config.grid_width {
            if scatter.gen_bool(TREE_DENSITY) {
                grid.set_cell(CellInstance::new(Rc::clone(&tree)), Coord::new(x, y));
            }
        }
    }
    println!("Planted {} trees", grid.entry_count());

    for tick in 1..=TICKS {
        grid.tick(config.tick_interval_ms as f64);
        if tick % FRAME_EVERY == 0 {
            println!("\n--- tick {tick} ---");
            print_frame(&grid);
        }
    }

    let mut by_blueprint: BTreeMap<String, usize> = BTreeMap::new();
    for (pos, _) in grid.render_state().iter() {
        for entry in grid.entries_at(*pos) {
            *by_blueprint.entry(entry.instance.blueprint().name()).or_default() += 1;
        }
    }

    println!("\n--- Summary ---");
    println!("Ticks run: {}", grid.tick_count());
    println!("Entries remaining: {}", grid.entry_count());
    for (name, count) in &by_blueprint {
        println!("{name}: {count}");
    }

    // Write the final frame for external tooling
    let snapshot: BTreeMap<String, String> = grid
        .render_state()
        .iter()
        .map(|(pos, icon)| (pos.key(), icon.to_string()))
        .collect();
    let json = serde_json::to_string_pretty(&snapshot).expect("Failed to serialize snapshot");
    std::fs::write("life_sim_output.json", &json).expect("Failed to write output");
    println!("\nFinal frame written to life_sim_output.json");
}

fn print_frame(grid: &Grid) {
    for y in 0..grid.height() {
        let mut row = String::new();
        for x in 0..grid.width() {
            match grid.icon_at(Coord::new(x, y)) {
                Some(icon) => row.push_str(icon),
                None => row.push_str(". "),
            }
        }
        println!("{row}");
    }
}
