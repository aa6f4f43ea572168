//! Corridor carving (alternate openness strategy).
//!
//! Random walkers carve open floor out of solid rock with a sinusoidally
//! breathing brush, then three cleanup passes run: Moore-neighborhood wall
//! eroding, cardinal thinning to a fixed point, and a 4-connected flood fill
//! that converts every floor pocket unreachable from the main cavity back to
//! wall.

use std::collections::HashSet;
use std::f32::consts::TAU;

use bevy::prelude::*;
use pathfinding::prelude::bfs_reach;
use rand::Rng;

use crate::config::CaveConfig;
use crate::formations::FormationField;

/// Full sine cycles the brush radius completes over one walker's lifetime.
const BRUSH_CYCLES: f32 = 3.0;

/// Run the corridor-carving strategy. The returned field marks solid cells
/// (everything the walkers did not open, post-cleanup); the placement list
/// is empty, as corridors have no discrete formation centers.
pub fn carve_corridors(config: &CaveConfig, rng: &mut impl Rng) -> FormationField {
    let (width, height) = (config.width, config.height);
    let params = &config.corridors;
    let mut open = vec![false; width * height];

    if width < 3 || height < 3 {
        warn!("grid {width}x{height} too small to carve, leaving it solid");
        return solid_field(open);
    }

    for walker in 0..params.walker_count {
        let mut x = rng.gen_range(1..width - 1) as i32;
        let mut y = rng.gen_range(1..height - 1) as i32;
        for step in 0..params.walker_steps {
            let progress = step as f32 / params.walker_steps.max(1) as f32;
            // Brush size cycles smoothly with step progress, phase-shifted
            // per walker so the population does not pulse in lockstep.
            let phase = progress * TAU * BRUSH_CYCLES + walker as f32;
            let radius = params.min_brush
                + (params.max_brush - params.min_brush) * 0.5 * (1.0 + phase.sin());
            carve_disc(&mut open, width, height, x as f32, y as f32, radius);

            match rng.gen_range(0..4) {
                0 => x += 1,
                1 => x -= 1,
                2 => y += 1,
                _ => y -= 1,
            }
            x = x.clamp(1, width as i32 - 2);
            y = y.clamp(1, height as i32 - 2);
        }
    }

    erode_walls(&mut open, width, height, params.erode_passes, params.min_wall_neighbors);
    thin_floors(&mut open, width, height);
    remove_isolated(&mut open, width, height);

    if open.iter().all(|&o| !o) {
        warn!("corridor carving produced zero open cells");
    }
    solid_field(open)
}

fn solid_field(open: Vec<bool>) -> FormationField {
    FormationField {
        walls: open.iter().map(|&o| !o).collect(),
        placements: Vec::new(),
    }
}

/// Open every cell within `radius` of the brush center, clamped to a 1-cell
/// interior margin.
fn carve_disc(open: &mut [bool], width: usize, height: usize, cx: f32, cy: f32, radius: f32) {
    let min_x = (cx - radius).floor().max(1.0) as usize;
    let max_x = ((cx + radius).ceil() as usize).min(width - 2);
    let min_y = (cy - radius).floor().max(1.0) as usize;
    let max_y = ((cy + radius).ceil() as usize).min(height - 2);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if (dx * dx + dy * dy).sqrt() <= radius {
                open[y * width + x] = true;
            }
        }
    }
}

/// Moore-neighborhood wall eroding: a wall cell with fewer than
/// `min_wall_neighbors` wall neighbors (out of 8, out-of-bounds counting as
/// wall) becomes floor. Fixed pass count; each pass reads a snapshot.
pub(crate) fn erode_walls(
    open: &mut Vec<bool>,
    width: usize,
    height: usize,
    passes: u32,
    min_wall_neighbors: u32,
) {
    for _ in 0..passes {
        let snapshot = open.clone();
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if snapshot[idx] {
                    continue;
                }
                let mut wall_neighbors = 0;
                for dy in -1_i32..=1 {
                    for dx in -1_i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        let is_wall = if nx < 0
                            || ny < 0
                            || nx >= width as i32
                            || ny >= height as i32
                        {
                            true
                        } else {
                            !snapshot[ny as usize * width + nx as usize]
                        };
                        if is_wall {
                            wall_neighbors += 1;
                        }
                    }
                }
                if wall_neighbors < min_wall_neighbors {
                    open[idx] = true;
                }
            }
        }
    }
}

/// Cardinal thinning to a fixed point: a floor cell with fewer than 2 open
/// cardinal neighbors becomes wall. Only ever closes cells, so the pass
/// count is bounded by the open-cell count.
pub(crate) fn thin_floors(open: &mut Vec<bool>, width: usize, height: usize) {
    loop {
        let snapshot = open.clone();
        let mut changed = false;
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if !snapshot[idx] {
                    continue;
                }
                let mut open_neighbors = 0;
                for (dx, dy) in [(-1_i32, 0_i32), (1, 0), (0, -1), (0, 1)] {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx >= 0
                        && ny >= 0
                        && nx < width as i32
                        && ny < height as i32
                        && snapshot[ny as usize * width + nx as usize]
                    {
                        open_neighbors += 1;
                    }
                }
                if open_neighbors < 2 {
                    open[idx] = false;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Flood fill from the open cell nearest the grid center (4-connectivity)
/// and close every open cell the fill did not reach.
pub(crate) fn remove_isolated(open: &mut [bool], width: usize, height: usize) {
    let Some(seed) = nearest_open_to_center(open, width, height) else {
        return;
    };
    let reachable: HashSet<(usize, usize)> = bfs_reach(seed, |&(x, y)| {
        let mut next = Vec::with_capacity(4);
        for (dx, dy) in [(-1_i32, 0_i32), (1, 0), (0, -1), (0, 1)] {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx >= 0
                && ny >= 0
                && nx < width as i32
                && ny < height as i32
                && open[ny as usize * width + nx as usize]
            {
                next.push((nx as usize, ny as usize));
            }
        }
        next
    })
    .collect();

    for y in 0..height {
        for x in 0..width {
            if open[y * width + x] && !reachable.contains(&(x, y)) {
                open[y * width + x] = false;
            }
        }
    }
}

/// Expanding-ring search for the open cell nearest the grid center.
pub(crate) fn nearest_open_to_center(
    open: &[bool],
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    let cx = (width / 2) as i32;
    let cy = (height / 2) as i32;
    let max_ring = width.max(height) as i32;
    for ring in 0..=max_ring {
        for dy in -ring..=ring {
            for dx in -ring..=ring {
                if dx.abs().max(dy.abs()) != ring {
                    continue;
                }
                let x = cx + dx;
                let y = cy + dy;
                if x >= 0
                    && y >= 0
                    && x < width as i32
                    && y < height as i32
                    && open[y as usize * width + x as usize]
                {
                    return Some((x as usize, y as usize));
                }
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
