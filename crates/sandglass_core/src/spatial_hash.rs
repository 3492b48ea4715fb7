//! Spatial hash grid for grain neighbor queries.
//!
//! A uniform grid keyed by integer cell coordinates. Rebuilt from scratch at
//! the start of every simulation update; only active grains are inserted.

use crate::config::CELL_SIZE;
use crate::grain::Grain;
use crate::math::Vec2;
use std::collections::HashMap;

/// Grid cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell itself plus its 8 surrounding cells.
    fn neighborhood(self) -> impl Iterator<Item = CellCoord> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| CellCoord::new(self.x + dx, self.y + dy)))
    }
}

/// Uniform grid over grain indices.
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<CellCoord, Vec<usize>>,
    indexed: usize,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: HashMap::new(),
            indexed: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of grains inserted by the last rebuild.
    pub fn len(&self) -> usize {
        self.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.indexed == 0
    }

    /// Drop previous contents and index every active grain by its position.
    pub fn rebuild(&mut self, grains: &[Grain]) {
        self.clear();
        for (index, grain) in grains.iter().enumerate() {
            if grain.active {
                self.insert(index, grain.position);
            }
        }
    }

    /// Indices of active grains sharing the 3×3 cell block around grain `index`,
    /// excluding `index` itself.
    pub fn neighbors(&self, index: usize, position: Vec2) -> impl Iterator<Item = usize> + '_ {
        self.pos_to_cell(position)
            .neighborhood()
            .filter_map(move |coord| self.cells.get(&coord))
            .flat_map(|entries| entries.iter().copied())
            .filter(move |&other| other != index)
    }

    fn pos_to_cell(&self, position: Vec2) -> CellCoord {
        CellCoord::new(
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    fn insert(&mut self, index: usize, position: Vec2) {
        let cell = self.pos_to_cell(position);
        self.cells.entry(cell).or_default().push(index);
        self.indexed += 1;
    }

    /// Empty every bucket but keep their allocations for the next rebuild.
    fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.indexed = 0;
    }
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new(CELL_SIZE)
    }
}
