//! Cell grid data model for the generated cave.
//!
//! `CaveGrid` is allocated fresh at the start of a generation run, written
//! cell-by-cell by the pipeline, and treated as read-only by every consumer
//! afterwards. Out-of-bounds queries return `None` (or count as wall for the
//! walkability predicate) instead of panicking.

use serde::{Deserialize, Serialize};

/// Coarse depth classification driving base floor height and floor material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DepthZone {
    #[default]
    Shallow,
    Mid,
    Deep,
}

impl DepthZone {
    /// Submesh slot for this zone's floor geometry. Slot 0 is reserved for
    /// wall geometry.
    pub fn submesh(self) -> usize {
        match self {
            DepthZone::Shallow => 1,
            DepthZone::Mid => 2,
            DepthZone::Deep => 3,
        }
    }
}

/// One grid square of the cave layout.
///
/// `floor_height` is meaningful even under a wall: it is the height of the
/// sand surface the wall stands on. `wall_height` is the rise above
/// `floor_height`, zero exactly when the cell is open floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub is_wall: bool,
    pub floor_height: f32,
    pub wall_height: f32,
    pub zone: DepthZone,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            is_wall: false,
            floor_height: 0.0,
            wall_height: 0.0,
            zone: DepthZone::Shallow,
        }
    }
}

/// The complete 2D cell grid plus the world-space size of one cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaveGrid {
    pub cells: Vec<Cell>,
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
}

impl CaveGrid {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
            cell_size,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Point lookup. Out-of-bounds coordinates return `None`.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let idx = self.index(x, y);
        &mut self.cells[idx]
    }

    /// Walkability predicate: is this coordinate inside any wall?
    ///
    /// Out-of-bounds counts as wall so movement queries never escape the
    /// grid.
    #[inline]
    pub fn is_wall_at(&self, x: i32, y: i32) -> bool {
        match self.get(x, y) {
            Some(cell) => cell.is_wall,
            None => true,
        }
    }

    pub fn world_to_grid(&self, world_x: f32, world_z: f32) -> (i32, i32) {
        let gx = (world_x / self.cell_size).floor() as i32;
        let gy = (world_z / self.cell_size).floor() as i32;
        (gx, gy)
    }

    pub fn grid_to_world(&self, gx: usize, gy: usize) -> (f32, f32) {
        let wx = gx as f32 * self.cell_size + self.cell_size * 0.5;
        let wz = gy as f32 * self.cell_size + self.cell_size * 0.5;
        (wx, wz)
    }

    /// Returns up to 4 cardinal neighbors and the count of valid entries.
    /// Use `&result[..count]` to iterate over valid neighbors.
    pub fn neighbors4(&self, x: usize, y: usize) -> ([(usize, usize); 4], usize) {
        let mut result = [(0, 0); 4];
        let mut count = 0;
        if x > 0 {
            result[count] = (x - 1, y);
            count += 1;
        }
        if x + 1 < self.width {
            result[count] = (x + 1, y);
            count += 1;
        }
        if y > 0 {
            result[count] = (x, y - 1);
            count += 1;
        }
        if y + 1 < self.height {
            result[count] = (x, y + 1);
            count += 1;
        }
        (result, count)
    }
}
