//! Depth-zone classification.
//!
//! A broad 2-octave noise field partitions the grid into Shallow, Mid and
//! Deep zones. Each zone carries a base floor height (Deep lowest); a
//! small-scale detail channel undulates the open sand around that base.
//! Zones are assigned exactly once per run and never mutated afterwards.

use crate::config::CaveConfig;
use crate::grid::DepthZone;
use crate::noise_field::{NoiseChannel, FLOOR_DETAIL_CHANNEL, ZONE_CHANNEL};

/// Classify one zone-noise value against the two ascending thresholds.
/// Lower noise means deeper water.
#[inline]
pub fn classify(value: f32, deep_threshold: f32, mid_threshold: f32) -> DepthZone {
    if value < deep_threshold {
        DepthZone::Deep
    } else if value < mid_threshold {
        DepthZone::Mid
    } else {
        DepthZone::Shallow
    }
}

/// Base floor height for a zone.
#[inline]
pub fn base_height(zone: DepthZone, config: &CaveConfig) -> f32 {
    match zone {
        DepthZone::Shallow => config.zones.shallow_height,
        DepthZone::Mid => config.zones.mid_height,
        DepthZone::Deep => config.zones.deep_height,
    }
}

/// Per-cell zone labels and unsmoothed floor heights for the whole grid.
///
/// Floor height is the zone base plus centered floor-detail noise scaled by
/// `floor_noise_amplitude`. Runs once, O(width * height).
pub fn build_zone_map(config: &CaveConfig) -> (Vec<DepthZone>, Vec<f32>) {
    let zone_noise = NoiseChannel::new(config.seed, ZONE_CHANNEL, &config.zones.noise);
    let detail_noise = NoiseChannel::new(config.seed, FLOOR_DETAIL_CHANNEL, &config.floor_noise);

    let mut zones = vec![DepthZone::Shallow; config.width * config.height];
    let mut heights = vec![0.0_f32; config.width * config.height];

    for y in 0..config.height {
        for x in 0..config.width {
            let idx = y * config.width + x;
            let value = zone_noise.sample(x as f32, y as f32);
            let zone = classify(value, config.zones.deep_threshold, config.zones.mid_threshold);
            zones[idx] = zone;
            heights[idx] = base_height(zone, config)
                + detail_noise.sample_centered(x as f32, y as f32) * config.floor_noise_amplitude;
        }
    }

    (zones, heights)
}
