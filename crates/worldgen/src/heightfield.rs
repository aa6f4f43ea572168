//! Iterative distance-weighted floor-height smoothing.
//!
//! Each pass replaces a cell's height with a weighted average over its 5x5
//! neighborhood: the cell itself weighs 2.0, each neighbor `1/distance`. The
//! zone-penalized variant multiplies a differing-zone neighbor's weight by
//! 0.25, keeping inter-zone drop-offs visually sharp while still smoothing
//! within a zone. Every pass materializes a fresh buffer before the next
//! pass reads it.

use crate::grid::DepthZone;

/// Weight of the cell's own height in the average.
const SELF_WEIGHT: f32 = 2.0;
/// Weight multiplier for neighbors in a different zone.
const CROSS_ZONE_PENALTY: f32 = 0.25;
/// Neighborhood radius in cells.
const RADIUS: i32 = 2;

/// Plain smoothing, all neighbors weighted by inverse distance.
pub fn smooth(heights: &[f32], width: usize, height: usize, passes: u32) -> Vec<f32> {
    run(heights, None, width, height, passes)
}

/// Zone-penalized smoothing: cross-zone neighbors contribute at a quarter
/// weight.
pub fn smooth_zone_aware(
    heights: &[f32],
    zones: &[DepthZone],
    width: usize,
    height: usize,
    passes: u32,
) -> Vec<f32> {
    run(heights, Some(zones), width, height, passes)
}

fn run(
    heights: &[f32],
    zones: Option<&[DepthZone]>,
    width: usize,
    height: usize,
    passes: u32,
) -> Vec<f32> {
    let mut current = heights.to_vec();
    for _ in 0..passes {
        let mut next = vec![0.0_f32; current.len()];
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let mut sum = current[idx] * SELF_WEIGHT;
                let mut total_weight = SELF_WEIGHT;
                for dy in -RADIUS..=RADIUS {
                    for dx in -RADIUS..=RADIUS {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                            continue;
                        }
                        let nidx = ny as usize * width + nx as usize;
                        let distance = ((dx * dx + dy * dy) as f32).sqrt();
                        let mut weight = 1.0 / distance;
                        if let Some(zones) = zones {
                            if zones[nidx] != zones[idx] {
                                weight *= CROSS_ZONE_PENALTY;
                            }
                        }
                        sum += current[nidx] * weight;
                        total_weight += weight;
                    }
                }
                next[idx] = sum / total_weight;
            }
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_field_is_fixed_point() {
        let heights = vec![-4.0; 64];
        let smoothed = smooth(&heights, 8, 8, 3);
        for v in smoothed {
            assert!((v - -4.0).abs() < 1e-5, "uniform field drifted to {v}");
        }
    }

    #[test]
    fn test_zero_passes_is_identity() {
        let heights: Vec<f32> = (0..36).map(|i| i as f32).collect();
        assert_eq!(smooth(&heights, 6, 6, 0), heights);
    }

    #[test]
    fn test_smoothing_stays_within_bounds() {
        // A weighted average can never leave the min/max envelope.
        let mut heights = vec![-9.0; 100];
        heights[55] = -2.0;
        let smoothed = smooth(&heights, 10, 10, 2);
        for v in smoothed {
            assert!((-9.0..=-2.0).contains(&v), "height {v} escaped envelope");
        }
    }

    #[test]
    fn test_smoothing_pulls_spike_toward_neighbors() {
        let mut heights = vec![-9.0; 100];
        heights[55] = -2.0;
        let smoothed = smooth(&heights, 10, 10, 1);
        assert!(smoothed[55] < -2.0, "spike should be pulled down");
        assert!(smoothed[55] > -9.0);
    }

    #[test]
    fn test_zone_penalty_keeps_boundary_sharper() {
        // Two zone halves with a height step; the penalized variant must
        // keep cells nearer their own zone's base than the plain one does.
        let (width, height) = (10, 10);
        let mut heights = vec![0.0_f32; width * height];
        let mut zones = vec![DepthZone::Shallow; width * height];
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if x >= width / 2 {
                    zones[idx] = DepthZone::Deep;
                    heights[idx] = -9.0;
                } else {
                    heights[idx] = -2.0;
                }
            }
        }
        let plain = smooth(&heights, width, height, 2);
        let penalized = smooth_zone_aware(&heights, &zones, width, height, 2);
        // Sample just left of the boundary, mid-row.
        let idx = 5 * width + (width / 2 - 1);
        assert!(
            (penalized[idx] - -2.0).abs() < (plain[idx] - -2.0).abs(),
            "zone penalty should resist cross-zone bleed: penalized {} plain {}",
            penalized[idx],
            plain[idx]
        );
    }

    #[test]
    fn test_pass_reads_previous_buffer_only() {
        // On a 3x1 strip, the middle cell averages its two ORIGINAL
        // neighbors; in-place aliasing would leak the already-smoothed left
        // value into the result.
        let heights = vec![0.0, 3.0, 6.0];
        let smoothed = smooth(&heights, 3, 1, 1);
        assert!((smoothed[1] - 3.0).abs() < 1e-6, "got {}", smoothed[1]);
    }
}
