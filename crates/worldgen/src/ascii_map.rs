//! ASCII rendering of the cave grid for debugging and logs.
//!
//! Built on demand from a `&CaveGrid`; no systems involved. The detail view
//! prints one character per cell, the overview one character per 4x4 block.

use crate::grid::{CaveGrid, Cell, DepthZone};

/// Cells per side of one overview block.
const OVERVIEW_BLOCK: usize = 4;

/// Convert a single cell to its ASCII character.
///
/// Walls (formations and perimeter alike) render `#`; open floor renders by
/// zone depth.
pub fn cell_to_char(cell: &Cell) -> char {
    if cell.is_wall {
        return '#';
    }
    match cell.zone {
        DepthZone::Shallow => '.',
        DepthZone::Mid => ':',
        DepthZone::Deep => '~',
    }
}

/// Full-resolution map, one character per cell, rows separated by newlines.
pub fn render_map(grid: &CaveGrid) -> String {
    let mut out = String::with_capacity((grid.width + 1) * grid.height);
    for y in 0..grid.height {
        for x in 0..grid.width {
            out.push(cell_to_char(&grid.cells[y * grid.width + x]));
        }
        out.push('\n');
    }
    out
}

/// Downsampled overview: each character summarizes a 4x4 block. A block
/// renders as wall when at least half of its cells are walls, otherwise as
/// the most common zone among its open cells.
pub fn render_overview(grid: &CaveGrid) -> String {
    let blocks_x = grid.width.div_ceil(OVERVIEW_BLOCK);
    let blocks_y = grid.height.div_ceil(OVERVIEW_BLOCK);
    let mut out = String::with_capacity((blocks_x + 1) * blocks_y);

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let mut total = 0;
            let mut walls = 0;
            let mut zone_counts = [0_usize; 3];
            for y in by * OVERVIEW_BLOCK..((by + 1) * OVERVIEW_BLOCK).min(grid.height) {
                for x in bx * OVERVIEW_BLOCK..((bx + 1) * OVERVIEW_BLOCK).min(grid.width) {
                    let cell = &grid.cells[y * grid.width + x];
                    total += 1;
                    if cell.is_wall {
                        walls += 1;
                    } else {
                        let slot = match cell.zone {
                            DepthZone::Shallow => 0,
                            DepthZone::Mid => 1,
                            DepthZone::Deep => 2,
                        };
                        zone_counts[slot] += 1;
                    }
                }
            }
            let ch = if walls * 2 >= total {
                '#'
            } else {
                match zone_counts
                    .iter()
                    .enumerate()
                    .max_by_key(|&(_, count)| *count)
                    .map(|(slot, _)| slot)
                {
                    Some(1) => ':',
                    Some(2) => '~',
                    _ => '.',
                }
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(width: usize, height: usize) -> CaveGrid {
        CaveGrid::new(width, height, 1.0)
    }

    #[test]
    fn test_cell_chars() {
        let mut cell = Cell::default();
        assert_eq!(cell_to_char(&cell), '.');
        cell.zone = DepthZone::Mid;
        assert_eq!(cell_to_char(&cell), ':');
        cell.zone = DepthZone::Deep;
        assert_eq!(cell_to_char(&cell), '~');
        cell.is_wall = true;
        assert_eq!(cell_to_char(&cell), '#');
    }

    #[test]
    fn test_map_dimensions() {
        let grid = grid_with(12, 5);
        let map = render_map(&grid);
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.len() == 12));
    }

    #[test]
    fn test_overview_marks_wall_blocks() {
        let mut grid = grid_with(8, 8);
        // Fill the top-left 4x4 block with walls.
        for y in 0..4 {
            for x in 0..4 {
                let idx = grid.index(x, y);
                grid.cells[idx].is_wall = true;
                grid.cells[idx].wall_height = 1.0;
            }
        }
        let overview = render_overview(&grid);
        let lines: Vec<&str> = overview.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('#'));
        assert!(lines[0].ends_with('.'));
    }
}
