//! Derived position→icon state for the external renderer.

use ahash::{AHashMap, AHashSet};

use crate::core::types::Coord;

use super::CellEntry;

/// Snapshot of what the renderer should draw at each occupied position.
///
/// Rebuilt by the grid after every mutation. A blocking entry's icon wins
/// over floating co-occupants; among floating entries the most recently
/// placed one shows.
#[derive(Debug, Default)]
pub struct RenderState {
    icons: AHashMap<Coord, String>,
}

impl RenderState {
    pub(super) fn rebuild(&mut self, entries: &[CellEntry]) {
        self.icons.clear();
        let mut blocking: AHashSet<Coord> = AHashSet::new();
        for entry in entries {
            let floating = entry.instance.blueprint().is_floating;
            if floating && blocking.contains(&entry.position) {
                continue;
            }
            if !floating {
                blocking.insert(entry.position);
            }
            self.icons
                .insert(entry.position, entry.instance.blueprint().icon());
        }
    }

    pub fn icon_at(&self, position: Coord) -> Option<&str> {
        self.icons.get(&position).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &str)> {
        self.icons.iter().map(|(pos, icon)| (pos, icon.as_str()))
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
