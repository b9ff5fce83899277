//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::error::ForgeError;

/// Simulation tick counter
pub type Tick = u64;

/// A 2D integer grid coordinate
///
/// Value-equality semantics; the canonical string key is `"x,y"` and is
/// what `Display` produces and `FromStr` parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canonical map key, `"x,y"`
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Chebyshev distance: max of the per-axis absolute differences
    pub fn chebyshev(&self, other: &Coord) -> u32 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dy = (self.y as i64 - other.y as i64).unsigned_abs();
        dx.max(dy) as u32
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| ForgeError::MalformedCoordKey(s.to_string()))?;
        let x = x
            .parse()
            .map_err(|_| ForgeError::MalformedCoordKey(s.to_string()))?;
        let y = y
            .parse()
            .map_err(|_| ForgeError::MalformedCoordKey(s.to_string()))?;
        Ok(Coord { x, y })
    }
}

/// Unique identifier for blueprints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlueprintId(pub u64);

impl BlueprintId {
    /// Hand out the next process-unique id
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unique identifier for placed cell instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl InstanceId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
