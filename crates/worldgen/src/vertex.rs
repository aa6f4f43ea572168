//! Dual-grid vertex resolution.
//!
//! Converts the cell grid into a (width+1) x (height+1) corner grid of
//! heights. The pass ordering here is load-bearing: resolve raw heights,
//! smooth wall vertices, smooth floor vertices (never referencing wall
//! heights), then clamp floor vertices against downward spikes. A vertex is
//! a wall vertex when ANY contributing cell is a wall, so wall material
//! bleeds outward to the full boundary of contact and floor texture never
//! shows under cliff overhangs.

use crate::config::CaveConfig;
use crate::grid::CaveGrid;
use crate::noise_field::{NoiseChannel, WALL_TOP_CHANNEL};

/// 3x3 smoothing kernel weights: center, cardinal, diagonal.
const CENTER_WEIGHT: f32 = 4.0;
const CARDINAL_WEIGHT: f32 = 1.0;
const DIAGONAL_WEIGHT: f32 = 0.5;

/// One corner-grid vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub height: f32,
    pub is_wall: bool,
    /// 0 = wall, 1..=3 = zone floor (see `DepthZone::submesh`).
    pub submesh: usize,
}

/// The dual grid: one vertex per cell corner.
#[derive(Debug, Clone)]
pub struct VertexGrid {
    pub verts: Vec<Vertex>,
    pub width: usize,
    pub height: usize,
}

impl VertexGrid {
    #[inline]
    pub fn index(&self, vx: usize, vy: usize) -> usize {
        vy * self.width + vx
    }

    #[inline]
    pub fn get(&self, vx: usize, vy: usize) -> &Vertex {
        &self.verts[vy * self.width + vx]
    }
}

/// Run the full vertex pipeline for a finished cell grid.
pub fn resolve(grid: &CaveGrid, config: &CaveConfig) -> VertexGrid {
    let mut vertices = resolve_raw(grid, config);
    smooth_wall_vertices(&mut vertices, config.vertex.wall_smooth_passes);
    smooth_floor_vertices(&mut vertices, config.vertex.floor_smooth_passes);
    clamp_floor_spikes(&mut vertices);
    vertices
}

// ---------------------------------------------------------------------------
// Raw resolution
// ---------------------------------------------------------------------------

/// Derive each vertex from its up-to-4 contributing cells.
///
/// Wall vertices take the tallest contributing wall top plus small-scale
/// noise and a fixed boost. Floor vertices take the mean contributing floor
/// height.
pub(crate) fn resolve_raw(grid: &CaveGrid, config: &CaveConfig) -> VertexGrid {
    let wall_noise = NoiseChannel::new(config.seed, WALL_TOP_CHANNEL, &config.vertex.wall_top_noise);
    let vwidth = grid.width + 1;
    let vheight = grid.height + 1;
    let mut verts = Vec::with_capacity(vwidth * vheight);

    for vy in 0..vheight {
        for vx in 0..vwidth {
            let mut is_wall = false;
            let mut wall_top = f32::NEG_INFINITY;
            let mut floor_sum = 0.0;
            let mut floor_count = 0;
            let mut submesh = 0;
            let mut zone_seen = false;

            for (cx, cy) in contributing_cells(vx, vy) {
                let Some(cell) = grid.get(cx, cy) else {
                    continue;
                };
                if !zone_seen {
                    submesh = cell.zone.submesh();
                    zone_seen = true;
                }
                if cell.is_wall {
                    is_wall = true;
                    wall_top = wall_top.max(cell.floor_height + cell.wall_height);
                } else {
                    floor_sum += cell.floor_height;
                    floor_count += 1;
                }
            }

            let height = if is_wall {
                wall_top
                    + wall_noise.sample_centered(vx as f32, vy as f32)
                        * config.vertex.wall_top_noise_amplitude
                    + config.vertex.wall_top_boost
            } else if floor_count > 0 {
                floor_sum / floor_count as f32
            } else {
                0.0
            };

            verts.push(Vertex {
                height,
                is_wall,
                submesh: if is_wall { 0 } else { submesh },
            });
        }
    }

    VertexGrid {
        verts,
        width: vwidth,
        height: vheight,
    }
}

/// The up-to-4 cells sharing corner `(vx, vy)`, in scan order.
#[inline]
fn contributing_cells(vx: usize, vy: usize) -> [(i32, i32); 4] {
    let (vx, vy) = (vx as i32, vy as i32);
    [
        (vx - 1, vy - 1),
        (vx, vy - 1),
        (vx - 1, vy),
        (vx, vy),
    ]
}

// ---------------------------------------------------------------------------
// Smoothing passes
// ---------------------------------------------------------------------------

/// Weighted 3x3 smoothing of wall vertices only, rounding formation tops
/// into boulder shapes. Floor vertices pass through unchanged.
pub(crate) fn smooth_wall_vertices(vertices: &mut VertexGrid, passes: u32) {
    for _ in 0..passes {
        let snapshot: Vec<f32> = vertices.verts.iter().map(|v| v.height).collect();
        for vy in 0..vertices.height {
            for vx in 0..vertices.width {
                let idx = vy * vertices.width + vx;
                if !vertices.verts[idx].is_wall {
                    continue;
                }
                let (sum, weight) = kernel_sum(vertices, &snapshot, vx, vy, false);
                vertices.verts[idx].height = sum / weight;
            }
        }
    }
}

/// Weighted 3x3 smoothing of floor vertices, excluding wall neighbors from
/// both the sum and the weight total so a tall wall can never drag adjacent
/// floor upward.
pub(crate) fn smooth_floor_vertices(vertices: &mut VertexGrid, passes: u32) {
    for _ in 0..passes {
        let snapshot: Vec<f32> = vertices.verts.iter().map(|v| v.height).collect();
        for vy in 0..vertices.height {
            for vx in 0..vertices.width {
                let idx = vy * vertices.width + vx;
                if vertices.verts[idx].is_wall {
                    continue;
                }
                let (sum, weight) = kernel_sum(vertices, &snapshot, vx, vy, true);
                vertices.verts[idx].height = sum / weight;
            }
        }
    }
}

/// 3x3 kernel sum around `(vx, vy)`. The center always contributes (callers
/// dispatch on its kind), so the weight total is never zero.
fn kernel_sum(
    vertices: &VertexGrid,
    snapshot: &[f32],
    vx: usize,
    vy: usize,
    skip_walls: bool,
) -> (f32, f32) {
    let mut sum = 0.0;
    let mut weight_total = 0.0;
    for dy in -1_i32..=1 {
        for dx in -1_i32..=1 {
            let nx = vx as i32 + dx;
            let ny = vy as i32 + dy;
            if nx < 0 || ny < 0 || nx >= vertices.width as i32 || ny >= vertices.height as i32 {
                continue;
            }
            let nidx = ny as usize * vertices.width + nx as usize;
            if skip_walls && vertices.verts[nidx].is_wall {
                continue;
            }
            let weight = if dx == 0 && dy == 0 {
                CENTER_WEIGHT
            } else if dx == 0 || dy == 0 {
                CARDINAL_WEIGHT
            } else {
                DIAGONAL_WEIGHT
            };
            sum += snapshot[nidx] * weight;
            weight_total += weight;
        }
    }
    (sum, weight_total)
}

// ---------------------------------------------------------------------------
// Spike clamp
// ---------------------------------------------------------------------------

/// Raise every floor vertex to at least the minimum height among the
/// non-wall vertices of its 3x3 ring. Averaging next to tall walls can dent
/// a floor vertex below all of its neighbors; this pass removes those
/// downward spikes. A vertex with no non-wall ring neighbor is left alone.
pub(crate) fn clamp_floor_spikes(vertices: &mut VertexGrid) {
    let snapshot: Vec<f32> = vertices.verts.iter().map(|v| v.height).collect();
    for vy in 0..vertices.height {
        for vx in 0..vertices.width {
            let idx = vy * vertices.width + vx;
            if vertices.verts[idx].is_wall {
                continue;
            }
            let mut ring_min = f32::INFINITY;
            for dy in -1_i32..=1 {
                for dx in -1_i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = vx as i32 + dx;
                    let ny = vy as i32 + dy;
                    if nx < 0
                        || ny < 0
                        || nx >= vertices.width as i32
                        || ny >= vertices.height as i32
                    {
                        continue;
                    }
                    let nidx = ny as usize * vertices.width + nx as usize;
                    if !vertices.verts[nidx].is_wall {
                        ring_min = ring_min.min(snapshot[nidx]);
                    }
                }
            }
            if ring_min.is_finite() {
                vertices.verts[idx].height = snapshot[idx].max(ring_min);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaveConfig;
    use crate::grid::{CaveGrid, DepthZone};

    /// Open grid with uniform floor height, no walls, no noise influence.
    fn flat_config(width: usize, height: usize) -> CaveConfig {
        let mut config = CaveConfig {
            width,
            height,
            ..CaveConfig::default()
        };
        config.vertex.wall_top_noise_amplitude = 0.0;
        config.vertex.wall_top_boost = 0.0;
        config.vertex.wall_smooth_passes = 0;
        config.vertex.floor_smooth_passes = 0;
        config
    }

    fn flat_grid(width: usize, height: usize, floor: f32) -> CaveGrid {
        let mut grid = CaveGrid::new(width, height, 1.0);
        for cell in &mut grid.cells {
            cell.floor_height = floor;
            cell.zone = DepthZone::Deep;
        }
        grid
    }

    fn set_wall(grid: &mut CaveGrid, x: usize, y: usize, wall_height: f32) {
        let cell = grid.get_mut(x, y);
        cell.is_wall = true;
        cell.wall_height = wall_height;
    }

    #[test]
    fn test_wall_bleed_iff_contributing_wall_cell() {
        let config = flat_config(4, 4);
        let mut grid = flat_grid(4, 4, -3.0);
        set_wall(&mut grid, 1, 1, 2.0);
        let vertices = resolve(&grid, &config);
        for vy in 0..=4_usize {
            for vx in 0..=4_usize {
                let touches_wall = contributing_cells(vx, vy)
                    .iter()
                    .any(|&(cx, cy)| grid.get(cx, cy).is_some_and(|c| c.is_wall));
                assert_eq!(
                    vertices.get(vx, vy).is_wall,
                    touches_wall,
                    "bleed mismatch at ({vx},{vy})"
                );
            }
        }
    }

    #[test]
    fn test_wall_vertex_height_is_tallest_top_plus_boost() {
        let mut config = flat_config(4, 4);
        config.vertex.wall_top_boost = 0.5;
        let mut grid = flat_grid(4, 4, -3.0);
        set_wall(&mut grid, 1, 1, 2.0);
        set_wall(&mut grid, 2, 1, 4.0);
        let vertices = resolve_raw(&grid, &config);
        // Vertex (2,1) touches both wall cells; the taller top wins.
        assert_eq!(vertices.get(2, 1).height, -3.0 + 4.0 + 0.5);
    }

    #[test]
    fn test_floor_vertex_is_mean_of_contributing_floors() {
        let config = flat_config(2, 2);
        let mut grid = flat_grid(2, 2, 0.0);
        grid.get_mut(0, 0).floor_height = -1.0;
        grid.get_mut(1, 0).floor_height = -2.0;
        grid.get_mut(0, 1).floor_height = -3.0;
        grid.get_mut(1, 1).floor_height = -6.0;
        let vertices = resolve_raw(&grid, &config);
        assert_eq!(vertices.get(1, 1).height, (-1.0 - 2.0 - 3.0 - 6.0) / 4.0);
        // Corner vertex touches exactly one cell.
        assert_eq!(vertices.get(0, 0).height, -1.0);
    }

    #[test]
    fn test_floor_heights_ignore_wall_heights_entirely() {
        // Raising a wall dramatically must not move any floor vertex.
        let mut config = flat_config(6, 6);
        config.vertex.wall_smooth_passes = 2;
        config.vertex.floor_smooth_passes = 2;
        let mut low = flat_grid(6, 6, -4.0);
        let mut high = flat_grid(6, 6, -4.0);
        set_wall(&mut low, 3, 3, 1.0);
        set_wall(&mut high, 3, 3, 50.0);
        let low_verts = resolve(&low, &config);
        let high_verts = resolve(&high, &config);
        for (a, b) in low_verts.verts.iter().zip(high_verts.verts.iter()) {
            if !a.is_wall {
                assert_eq!(a.height, b.height, "floor vertex moved with wall height");
            }
        }
    }

    #[test]
    fn test_clamp_raises_spike_to_ring_min() {
        let config = flat_config(4, 4);
        let grid = flat_grid(4, 4, -2.0);
        let mut vertices = resolve_raw(&grid, &config);
        // Dent one interior vertex below all neighbors.
        let idx = vertices.index(2, 2);
        vertices.verts[idx].height = -10.0;
        clamp_floor_spikes(&mut vertices);
        assert_eq!(vertices.verts[idx].height, -2.0);
    }

    #[test]
    fn test_clamp_is_noop_without_nonwall_ring() {
        let config = flat_config(3, 3);
        let mut grid = flat_grid(3, 3, -2.0);
        // Wall every cell except the center: the center vertex ring is all
        // wall vertices.
        for y in 0..3 {
            for x in 0..3 {
                if !(x == 1 && y == 1) {
                    set_wall(&mut grid, x, y, 3.0);
                }
            }
        }
        let mut vertices = resolve_raw(&grid, &config);
        // Every vertex touches a wall cell here, so fabricate the case: the
        // clamp must leave a floor vertex alone when its ring is all walls.
        let idx = vertices.index(1, 1);
        vertices.verts[idx].is_wall = false;
        vertices.verts[idx].height = -9.0;
        clamp_floor_spikes(&mut vertices);
        assert_eq!(vertices.verts[idx].height, -9.0);
    }

    #[test]
    fn test_wall_smoothing_leaves_floor_untouched() {
        let config = flat_config(5, 5);
        let mut grid = flat_grid(5, 5, -3.0);
        set_wall(&mut grid, 2, 2, 4.0);
        let mut vertices = resolve_raw(&grid, &config);
        let before: Vec<f32> = vertices
            .verts
            .iter()
            .filter(|v| !v.is_wall)
            .map(|v| v.height)
            .collect();
        smooth_wall_vertices(&mut vertices, 3);
        let after: Vec<f32> = vertices
            .verts
            .iter()
            .filter(|v| !v.is_wall)
            .map(|v| v.height)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_no_downward_spikes_after_full_resolve() {
        let config = CaveConfig {
            width: 32,
            height: 32,
            seed: 1234,
            ..CaveConfig::default()
        };
        let world = crate::pipeline::generate(&config).expect("valid config");
        let vertices = &world.vertices;
        for vy in 0..vertices.height {
            for vx in 0..vertices.width {
                let vert = vertices.get(vx, vy);
                if vert.is_wall {
                    continue;
                }
                let mut ring_min = f32::INFINITY;
                for dy in -1_i32..=1 {
                    for dx in -1_i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = vx as i32 + dx;
                        let ny = vy as i32 + dy;
                        if nx < 0
                            || ny < 0
                            || nx >= vertices.width as i32
                            || ny >= vertices.height as i32
                        {
                            continue;
                        }
                        let neighbor = vertices.get(nx as usize, ny as usize);
                        if !neighbor.is_wall {
                            ring_min = ring_min.min(neighbor.height);
                        }
                    }
                }
                if ring_min.is_finite() {
                    assert!(
                        vert.height >= ring_min,
                        "downward spike at ({vx},{vy}): {} < {ring_min}",
                        vert.height
                    );
                }
            }
        }
    }
}
