//! Final cell-grid assembly.
//!
//! Combines the smoothed zone heightfield, the formation occupancy mask and
//! the perimeter mask into the published `CaveGrid`. Priority per cell:
//! perimeter wins over formation wins over open floor. Formation wall
//! heights are interpolated between the configured min/max by the wall-top
//! noise channel so neighboring formations vary smoothly but unpredictably.

use crate::config::{CaveConfig, FormationStrategy};
use crate::formations::FormationField;
use crate::grid::{CaveGrid, DepthZone};
use crate::noise_field::{NoiseChannel, WALL_TOP_CHANNEL};

pub fn assemble(
    config: &CaveConfig,
    zones: &[DepthZone],
    floor_heights: &[f32],
    formations: &FormationField,
    perimeter: &[bool],
) -> CaveGrid {
    let wall_noise = NoiseChannel::new(config.seed, WALL_TOP_CHANNEL, &config.vertex.wall_top_noise);
    let (wall_min, wall_max) = match config.strategy {
        FormationStrategy::MesaPlacement => (
            config.formations.wall_height_min,
            config.formations.wall_height_max,
        ),
        FormationStrategy::CorridorCarve => (
            config.corridors.wall_height_min,
            config.corridors.wall_height_max,
        ),
    };
    let perimeter_floor = config.zones.deep_height - 2.0;
    let perimeter_wall = config.perimeter.wall_height + config.zones.deep_height.abs() + 2.0;

    let mut grid = CaveGrid::new(config.width, config.height, config.cell_size);
    for y in 0..config.height {
        for x in 0..config.width {
            let idx = y * config.width + x;
            let cell = grid.get_mut(x, y);
            cell.zone = zones[idx];
            if perimeter[idx] {
                cell.is_wall = true;
                cell.floor_height = perimeter_floor;
                cell.wall_height = perimeter_wall;
            } else if formations.walls[idx] {
                cell.is_wall = true;
                cell.floor_height = floor_heights[idx];
                cell.wall_height =
                    wall_min + (wall_max - wall_min) * wall_noise.sample(x as f32, y as f32);
            } else {
                cell.is_wall = false;
                cell.floor_height = floor_heights[idx];
                cell.wall_height = 0.0;
            }
        }
    }
    grid
}
