//! Stochastic rock-formation placement (mesa strategy).
//!
//! Formations are placed by rejection sampling: draw a center inside the
//! safe margin, reject it when it crowds an accepted center, then paint one
//! of five shape variants into a boolean occupancy mask. The attempt budget
//! is capped at 12x the target count so a spacing constraint that cannot be
//! satisfied degrades to fewer formations instead of a hang.

use std::f32::consts::PI;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CaveConfig;

/// Attempt budget multiplier over the requested formation count.
const ATTEMPTS_PER_MESA: usize = 12;

/// The five formation shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationKind {
    /// Irregular disc with noisy edges.
    Round,
    /// Two lobes joined by a sine-pinched waist.
    Hourglass,
    /// Walled corridor with a meandering open channel.
    Canyon,
    /// Overlapping axis-aligned rectangles.
    Chunky,
    /// Scattered small filled circles.
    Boulders,
}

/// One accepted placement. Kept only for the spacing rejection test and for
/// inspection; the grid assembler consumes the painted mask.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub kind: FormationKind,
}

/// Output of an openness strategy: which cells are formation walls, plus the
/// placement list (empty for corridor carving).
#[derive(Debug, Clone)]
pub struct FormationField {
    pub walls: Vec<bool>,
    pub placements: Vec<Placement>,
}

impl FormationField {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            walls: vec![false; width * height],
            placements: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Placement loop
// ---------------------------------------------------------------------------

/// Place up to `mesa_count` non-overlapping formations.
pub fn place_mesas(config: &CaveConfig, rng: &mut impl Rng) -> FormationField {
    let params = &config.formations;
    let mut field = FormationField::empty(config.width, config.height);

    let margin = config.perimeter.base_thickness + params.radius_max;
    let max_x = config.width as f32 - margin;
    let max_y = config.height as f32 - margin;
    if margin >= max_x || margin >= max_y {
        warn!(
            "formation margin {margin} leaves no interior on a {}x{} grid, placing none",
            config.width, config.height
        );
        return field;
    }

    let max_attempts = params.mesa_count * ATTEMPTS_PER_MESA;
    let mut attempts = 0;
    while field.placements.len() < params.mesa_count && attempts < max_attempts {
        attempts += 1;

        let cx = rng.gen_range(margin..max_x);
        let cy = rng.gen_range(margin..max_y);
        let crowded = field.placements.iter().any(|p| {
            let dx = p.cx - cx;
            let dy = p.cy - cy;
            (dx * dx + dy * dy).sqrt() < params.min_spacing
        });
        if crowded {
            continue;
        }

        let radius = if params.radius_min < params.radius_max {
            rng.gen_range(params.radius_min..params.radius_max)
        } else {
            params.radius_min
        };
        let kind = roll_kind(&params.kind_weights, rng.gen::<f32>());
        let placement = Placement {
            cx,
            cy,
            radius,
            kind,
        };
        paint_formation(
            &mut field.walls,
            config.width,
            config.height,
            &placement,
            params.edge_noise,
            rng,
        );
        field.placements.push(placement);
    }

    if field.placements.len() < params.mesa_count {
        info!(
            "placed {}/{} formations in {attempts} attempts (spacing-limited)",
            field.placements.len(),
            params.mesa_count
        );
    }
    field
}

/// Cumulative-probability roll over the five kind weights, in declaration
/// order. A roll past the cumulative total (weights summing under 1.0) lands
/// on the last kind.
pub(crate) fn roll_kind(weights: &[f32; 5], roll: f32) -> FormationKind {
    const KINDS: [FormationKind; 5] = [
        FormationKind::Round,
        FormationKind::Hourglass,
        FormationKind::Canyon,
        FormationKind::Chunky,
        FormationKind::Boulders,
    ];
    let mut cumulative = 0.0;
    for (kind, weight) in KINDS.iter().zip(weights.iter()) {
        cumulative += weight;
        if roll < cumulative {
            return *kind;
        }
    }
    FormationKind::Boulders
}

// ---------------------------------------------------------------------------
// Shape painters
// ---------------------------------------------------------------------------

/// Mark one cell, clamped to a 1-cell interior margin so no shape ever
/// touches the outermost ring.
#[inline]
fn mark(mask: &mut [bool], width: usize, height: usize, x: i32, y: i32) {
    if x >= 1
        && y >= 1
        && (x as usize) < width.saturating_sub(1)
        && (y as usize) < height.saturating_sub(1)
    {
        mask[y as usize * width + x as usize] = true;
    }
}

fn paint_formation(
    mask: &mut [bool],
    width: usize,
    height: usize,
    placement: &Placement,
    edge_noise: f32,
    rng: &mut impl Rng,
) {
    let Placement {
        cx,
        cy,
        radius,
        kind,
    } = *placement;
    match kind {
        FormationKind::Round => paint_round(mask, width, height, cx, cy, radius, edge_noise, rng),
        FormationKind::Hourglass => paint_hourglass(mask, width, height, cx, cy, radius),
        FormationKind::Canyon => paint_canyon(mask, width, height, cx, cy, radius, rng),
        FormationKind::Chunky => paint_chunky(mask, width, height, cx, cy, radius, rng),
        FormationKind::Boulders => paint_boulders(mask, width, height, cx, cy, radius, rng),
    }
}

/// Plain filled circle, shared by several painters.
fn paint_disc(mask: &mut [bool], width: usize, height: usize, cx: f32, cy: f32, radius: f32) {
    let min_x = (cx - radius).floor() as i32;
    let max_x = (cx + radius).ceil() as i32;
    let min_y = (cy - radius).floor() as i32;
    let max_y = (cy + radius).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if (dx * dx + dy * dy).sqrt() <= radius {
                mark(mask, width, height, x, y);
            }
        }
    }
}

/// Irregular disc: per-cell edge jitter in `[-edge_noise*r, +edge_noise*r]`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn paint_round(
    mask: &mut [bool],
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    edge_noise: f32,
    rng: &mut impl Rng,
) {
    let reach = radius * (1.0 + edge_noise);
    let min_x = (cx - reach).floor() as i32;
    let max_x = (cx + reach).ceil() as i32;
    let min_y = (cy - reach).floor() as i32;
    let max_y = (cy + reach).ceil() as i32;
    let jitter_span = edge_noise * radius;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let jitter = rng.gen_range(-jitter_span..=jitter_span);
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if (dx * dx + dy * dy).sqrt() <= radius + jitter {
                mark(mask, width, height, x, y);
            }
        }
    }
}

/// Figure-eight: two lobes of radius `r` centered `r/2` above and below the
/// anchor, joined by a waist of half-width `r/3` pinched by a sine curve
/// (narrowest at the midpoint).
fn paint_hourglass(mask: &mut [bool], width: usize, height: usize, cx: f32, cy: f32, radius: f32) {
    paint_disc(mask, width, height, cx, cy - radius * 0.5, radius);
    paint_disc(mask, width, height, cx, cy + radius * 0.5, radius);

    let top = cy - radius * 0.5;
    let min_y = top.floor() as i32;
    let max_y = (cy + radius * 0.5).ceil() as i32;
    for y in min_y..=max_y {
        let t = ((y as f32 - top) / radius).clamp(0.0, 1.0);
        let half_width = (radius / 3.0) * (1.0 - 0.45 * (PI * t).sin());
        let min_x = (cx - half_width).floor() as i32;
        let max_x = (cx + half_width).ceil() as i32;
        for x in min_x..=max_x {
            if (x as f32 - cx).abs() <= half_width {
                mark(mask, width, height, x, y);
            }
        }
    }
}

/// Walled corridor: a band of half-length `2r + extra` with wall half-width
/// `r/3`, cut by a central gap of half-width `r/4` whose centerline meanders
/// sinusoidally along the band. Orientation is a coin flip.
fn paint_canyon(
    mask: &mut [bool],
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    rng: &mut impl Rng,
) {
    let horizontal = rng.gen_bool(0.5);
    let extra = rng.gen_range(0.0..radius.max(1.0));
    let half_length = 2.0 * radius + extra;
    let wall_half = radius / 3.0;
    let gap_half = radius / 4.0;
    let meander_amplitude = radius / 6.0;

    let len_reach = half_length.ceil() as i32;
    let side_reach = (wall_half + meander_amplitude).ceil() as i32;
    for along in -len_reach..=len_reach {
        let s = along as f32;
        let meander = meander_amplitude * (s * 0.35).sin();
        for across in -side_reach..=side_reach {
            let p = across as f32;
            // Inside the band but outside the open channel.
            if p.abs() <= wall_half && (p - meander).abs() > gap_half {
                let (x, y) = if horizontal {
                    (cx + s, cy + p)
                } else {
                    (cx + p, cy + s)
                };
                mark(mask, width, height, x.round() as i32, y.round() as i32);
            }
        }
    }
}

/// Angular cluster: 3-6 overlapping axis-aligned rectangles inside the
/// bounding radius.
fn paint_chunky(
    mask: &mut [bool],
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    rng: &mut impl Rng,
) {
    let count = rng.gen_range(3..=6);
    for _ in 0..count {
        let ox = rng.gen_range(-radius * 0.6..=radius * 0.6);
        let oy = rng.gen_range(-radius * 0.6..=radius * 0.6);
        let half_w = rng.gen_range(radius * 0.15..=radius * 0.5).max(0.5);
        let half_h = rng.gen_range(radius * 0.15..=radius * 0.5).max(0.5);
        let rcx = cx + ox;
        let rcy = cy + oy;
        let min_x = (rcx - half_w).floor() as i32;
        let max_x = (rcx + half_w).ceil() as i32;
        let min_y = (rcy - half_h).floor() as i32;
        let max_y = (rcy + half_h).ceil() as i32;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if (x as f32 - rcx).abs() <= half_w && (y as f32 - rcy).abs() <= half_h {
                    mark(mask, width, height, x, y);
                }
            }
        }
    }
}

/// Scattered debris: 3-7 small filled circles inside the bounding area.
fn paint_boulders(
    mask: &mut [bool],
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    rng: &mut impl Rng,
) {
    let count = rng.gen_range(3..=7);
    for _ in 0..count {
        let ox = rng.gen_range(-radius * 0.8..=radius * 0.8);
        let oy = rng.gen_range(-radius * 0.8..=radius * 0.8);
        let boulder_radius = rng.gen_range(radius * 0.15..=radius * 0.5).max(0.5);
        paint_disc(mask, width, height, cx + ox, cy + oy, boulder_radius);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaveConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_roll_kind_cumulative_order() {
        let weights = [0.3, 0.15, 0.15, 0.2, 0.2];
        assert_eq!(roll_kind(&weights, 0.0), FormationKind::Round);
        assert_eq!(roll_kind(&weights, 0.29), FormationKind::Round);
        assert_eq!(roll_kind(&weights, 0.31), FormationKind::Hourglass);
        assert_eq!(roll_kind(&weights, 0.5), FormationKind::Canyon);
        assert_eq!(roll_kind(&weights, 0.7), FormationKind::Chunky);
        assert_eq!(roll_kind(&weights, 0.99), FormationKind::Boulders);
    }

    #[test]
    fn test_roll_kind_overflow_falls_to_last() {
        // Weights summing to 0.9 must still classify every roll.
        let weights = [0.2, 0.2, 0.2, 0.2, 0.1];
        assert_eq!(roll_kind(&weights, 0.95), FormationKind::Boulders);
        assert_eq!(roll_kind(&weights, 1.0), FormationKind::Boulders);
    }

    #[test]
    fn test_round_with_zero_edge_noise_is_exact_disc() {
        let (width, height) = (32, 32);
        let mut mask = vec![false; width * height];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (cx, cy, radius) = (16.0, 16.0, 5.0);
        paint_round(&mut mask, width, height, cx, cy, radius, 0.0, &mut rng);
        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let inside = dx * dx + dy * dy <= radius * radius;
                let interior = x >= 1 && y >= 1 && x < width - 1 && y < height - 1;
                assert_eq!(
                    mask[y * width + x],
                    inside && interior,
                    "mismatch at ({x},{y})"
                );
            }
        }
    }

    #[test]
    fn test_painters_respect_interior_margin() {
        let (width, height) = (24, 24);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for kind in [
            FormationKind::Round,
            FormationKind::Hourglass,
            FormationKind::Canyon,
            FormationKind::Chunky,
            FormationKind::Boulders,
        ] {
            let mut mask = vec![false; width * height];
            let placement = Placement {
                cx: 2.0,
                cy: 2.0,
                radius: 8.0,
                kind,
            };
            paint_formation(&mut mask, width, height, &placement, 0.3, &mut rng);
            for x in 0..width {
                assert!(!mask[x], "{kind:?} painted border row at x={x}");
                assert!(
                    !mask[(height - 1) * width + x],
                    "{kind:?} painted border row at x={x}"
                );
            }
            for y in 0..height {
                assert!(!mask[y * width], "{kind:?} painted border col at y={y}");
                assert!(
                    !mask[y * width + width - 1],
                    "{kind:?} painted border col at y={y}"
                );
            }
        }
    }

    #[test]
    fn test_placement_attempts_are_bounded() {
        // A spacing constraint that can never fit 50 formations on a tiny
        // grid must terminate with partial fulfilment, not spin.
        let config = CaveConfig {
            width: 24,
            height: 24,
            formations: crate::config::FormationParams {
                mesa_count: 50,
                min_spacing: 100.0,
                ..Default::default()
            },
            ..CaveConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let field = place_mesas(&config, &mut rng);
        assert!(field.placements.len() < 50);
        assert!(!field.placements.is_empty());
    }

    #[test]
    fn test_placement_is_deterministic() {
        let config = CaveConfig::default();
        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        let a = place_mesas(&config, &mut rng_a);
        let b = place_mesas(&config, &mut rng_b);
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.placements.len(), b.placements.len());
    }

    #[test]
    fn test_canyon_keeps_an_open_channel() {
        let (width, height) = (48, 48);
        let mut mask = vec![false; width * height];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        paint_canyon(&mut mask, width, height, 24.0, 24.0, 6.0, &mut rng);
        let painted = mask.iter().filter(|&&m| m).count();
        assert!(painted > 0, "canyon painted nothing");
        // The gap guarantees the band is never a full solid rectangle.
        let band_area = (2.0 * (2.0 * 6.0) + 1.0) * (2.0 * (6.0 / 3.0) + 1.0);
        assert!((painted as f32) < band_area, "canyon has no open channel");
    }
}
