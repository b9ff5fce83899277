//! Sparse spatial store of placed cell instances.
//!
//! The grid owns an unordered collection of `(instance, position)` entries -
//! entries exist only where something is placed, there is no dense array.
//! It enforces the occupancy rules (one blocking entry per position,
//! floating entries stack freely, reference instances multi-place,
//! non-reference instances relocate), answers neighbor queries over the
//! Moore neighborhood, and drives the tick.

pub mod render;

use std::rc::Rc;

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::blueprints::InstanceRef;
use crate::core::config::EngineConfig;
use crate::core::error::ForgeError;
use crate::core::types::{Coord, InstanceId, Tick};

pub use render::RenderState;

/// One placement: an instance at a position
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub instance: InstanceRef,
    pub position: Coord,
}

/// The sparse grid and tick driver
pub struct Grid {
    size: Coord,
    entries: Vec<CellEntry>,
    render: RenderState,
    rng: ChaCha8Rng,
    tick_count: Tick,
    ticking: bool,
}

impl Grid {
    /// A grid with an entropy-seeded rule generator
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_rng(width, height, ChaCha8Rng::from_entropy())
    }

    /// A grid with a deterministic rule generator, for tests and replays
    pub fn seeded(width: i32, height: i32, seed: u64) -> Self {
        Self::with_rng(width, height, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        match config.rng_seed {
            Some(seed) => Self::seeded(config.grid_width, config.grid_height, seed),
            None => Self::new(config.grid_width, config.grid_height),
        }
    }

    fn with_rng(width: i32, height: i32, rng: ChaCha8Rng) -> Self {
        Self {
            size: Coord::new(width, height),
            entries: Vec::new(),
            render: RenderState::default(),
            rng,
            tick_count: 0,
            ticking: false,
        }
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// Resize the renderer-facing bounds; placements are not clipped
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.size = Coord::new(width, height);
    }

    /// All entries at a position
    pub fn entries_at(&self, position: Coord) -> Vec<CellEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.position == position)
            .cloned()
            .collect()
    }

    /// Every current position of an instance; empty if it is not placed
    pub fn positions_of(&self, instance: &InstanceRef) -> Vec<Coord> {
        self.entries
            .iter()
            .filter(|entry| entry.instance.id() == instance.id())
            .map(|entry| entry.position)
            .collect()
    }

    /// The single position of a non-reference instance
    ///
    /// Reference-blueprint instances can hold many positions, so asking for
    /// "the" position of one is a caller bug and fails fast.
    pub fn position_of(&self, instance: &InstanceRef) -> Result<Option<Coord>, ForgeError> {
        if instance.blueprint().is_reference {
            return Err(ForgeError::ReferencePosition(instance.blueprint().name()));
        }
        Ok(self.positions_of(instance).into_iter().next())
    }

    /// Place an instance
    ///
    /// Placement rules, in order:
    /// 1. a blocking entry at the position is replaced in place when the
    ///    incoming instance is itself blocking;
    /// 2. reference instances append without touching their other placements;
    /// 3. everything else relocates: any prior entry for this exact instance
    ///    is removed, then the new entry is appended.
    pub fn set_cell(&mut self, instance: InstanceRef, position: Coord) {
        let blueprint = Rc::clone(instance.blueprint());
        let blocking_at = self
            .entries
            .iter()
            .position(|entry| entry.position == position && !entry.instance.blueprint().is_floating);

        match blocking_at {
            Some(index) if !blueprint.is_floating => {
                self.entries[index] = CellEntry { instance, position };
            }
            _ if blueprint.is_reference => {
                self.entries.push(CellEntry { instance, position });
            }
            _ => {
                let id = instance.id();
                self.entries.retain(|entry| entry.instance.id() != id);
                self.entries.push(CellEntry { instance, position });
            }
        }
        self.render.rebuild(&self.entries);
    }

    /// Erase everything at a position - floating and blocking entries alike
    pub fn remove_cell(&mut self, position: Coord) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.position != position);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.render.rebuild(&self.entries);
        }
        removed
    }

    /// Every entry within Chebyshev distance 1 of any of the instance's
    /// positions (the 8 compass directions plus the shared position),
    /// excluding the instance's own entries. Each qualifying entry is
    /// returned once, so multi-position reference instances see the union
    /// of the neighborhoods around each of their cells.
    pub fn neighbors_of(&self, instance: &InstanceRef) -> Vec<CellEntry> {
        let own = self.positions_of(instance);
        if own.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| entry.instance.id() != instance.id())
            .filter(|entry| own.iter().any(|pos| pos.chebyshev(&entry.position) <= 1))
            .cloned()
            .collect()
    }

    /// Run one simulation step: every distinct placed instance's rule tree
    /// is evaluated once, synchronously, in an unspecified but exhaustive
    /// order. Nested ticks are rejected.
    pub fn tick(&mut self, delta_ms: f64) {
        if self.ticking {
            tracing::warn!("tick re-entered mid-tick, ignoring");
            return;
        }
        self.ticking = true;
        self.tick_count += 1;

        let instances = self.distinct_instances();
        for instance in &instances {
            instance.tick(delta_ms, self);
        }

        self.ticking = false;
        tracing::trace!(
            tick = self.tick_count,
            instances = instances.len(),
            entries = self.entries.len(),
            "tick complete"
        );
    }

    pub fn tick_count(&self) -> Tick {
        self.tick_count
    }

    /// Number of entries currently placed
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renderer-facing position→icon state, current as of the last mutation
    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn icon_at(&self, position: Coord) -> Option<&str> {
        self.render.icon_at(position)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Instances currently present, deduplicated by identity; the snapshot
    /// keeps the tick loop stable while instructions mutate the entries.
    fn distinct_instances(&self) -> Vec<InstanceRef> {
        let mut seen: AHashSet<InstanceId> = AHashSet::new();
        self.entries
            .iter()
            .filter(|entry| seen.insert(entry.instance.id()))
            .map(|entry| Rc::clone(&entry.instance))
            .collect()
    }
}
