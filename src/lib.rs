//! Cellforge - Tick-driven cellular automaton engine

pub mod blueprints;
pub mod core;
pub mod events;
pub mod grid;
pub mod rules;
