//! Noise-deformed solid border band.
//!
//! A cell is perimeter when its distance to the nearest grid edge falls
//! under the base thickness deformed by low-frequency noise, producing an
//! organically uneven boundary instead of a straight frame. With
//! `noise_amount = 0` the band degenerates to an exact rectangle.

use crate::config::CaveConfig;
use crate::noise_field::{NoiseChannel, PERIMETER_CHANNEL};

/// Distance in cells from `(x, y)` to the nearest grid edge.
#[inline]
fn edge_distance(x: usize, y: usize, width: usize, height: usize) -> usize {
    x.min(y).min(width - 1 - x).min(height - 1 - y)
}

/// Boolean perimeter-occupancy mask for the whole grid.
pub fn build_perimeter(config: &CaveConfig) -> Vec<bool> {
    let noise = NoiseChannel::new(config.seed, PERIMETER_CHANNEL, &config.perimeter.noise);
    let mut mask = vec![false; config.width * config.height];
    for y in 0..config.height {
        for x in 0..config.width {
            let d = edge_distance(x, y, config.width, config.height) as f32;
            let deformation =
                noise.sample_centered(x as f32, y as f32) * 2.0 * config.perimeter.noise_amount;
            if d < config.perimeter.base_thickness + deformation {
                mask[y * config.width + x] = true;
            }
        }
    }
    mask
}
