//! Generation orchestration and world publication.
//!
//! `generate` runs the whole pipeline synchronously: zone classification,
//! openness strategy, perimeter, heightfield smoothing, grid assembly and
//! vertex resolution. The product is immutable; hosts publish it through
//! `CaveWorldHandle`, which swaps an `Arc` wholesale so readers of the
//! previous world keep a consistent snapshot across regeneration.

use std::sync::Arc;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{CaveConfig, ConfigError, FormationStrategy};
use crate::grid::CaveGrid;
use crate::vertex::VertexGrid;
use crate::{assembly, corridors, formations, heightfield, perimeter, vertex, zones};

/// The read-only product of one generation run.
#[derive(Debug, Clone)]
pub struct CaveWorld {
    pub grid: CaveGrid,
    pub vertices: VertexGrid,
    /// Monotone version stamped at publish time; 0 until published.
    pub generation: u64,
}

/// Run one full generation. Deterministic: identical config produces a
/// bit-identical world.
pub fn generate(config: &CaveConfig) -> Result<CaveWorld, ConfigError> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let (zone_map, raw_heights) = zones::build_zone_map(config);

    let formation_field = match config.strategy {
        FormationStrategy::MesaPlacement => formations::place_mesas(config, &mut rng),
        FormationStrategy::CorridorCarve => corridors::carve_corridors(config, &mut rng),
    };
    let perimeter_mask = perimeter::build_perimeter(config);

    let smoothed = heightfield::smooth_zone_aware(
        &raw_heights,
        &zone_map,
        config.width,
        config.height,
        config.smoothing_passes,
    );

    let grid = assembly::assemble(
        config,
        &zone_map,
        &smoothed,
        &formation_field,
        &perimeter_mask,
    );
    let vertices = vertex::resolve(&grid, config);

    let wall_cells = grid.cells.iter().filter(|c| c.is_wall).count();
    info!(
        "generated {}x{} cave: {} wall cells, {} formations",
        config.width,
        config.height,
        wall_cells,
        formation_field.placements.len()
    );

    Ok(CaveWorld {
        grid,
        vertices,
        generation: 0,
    })
}

// ---------------------------------------------------------------------------
// Publication handle
// ---------------------------------------------------------------------------

/// Shared handle to the currently published world.
///
/// Regeneration builds a complete new `CaveWorld` and swaps it in here;
/// consumers holding the previous `Arc` continue reading their snapshot
/// until they next look the handle up.
#[derive(Resource, Default)]
pub struct CaveWorldHandle {
    current: Option<Arc<CaveWorld>>,
    generation: u64,
}

impl CaveWorldHandle {
    /// Stamp and publish a freshly generated world, superseding the previous
    /// one atomically.
    pub fn publish(&mut self, mut world: CaveWorld) -> Arc<CaveWorld> {
        self.generation += 1;
        world.generation = self.generation;
        let shared = Arc::new(world);
        self.current = Some(Arc::clone(&shared));
        shared
    }

    pub fn current(&self) -> Option<Arc<CaveWorld>> {
        self.current.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generate from `config` and publish through `handle` in one step.
pub fn regenerate(
    config: &CaveConfig,
    handle: &mut CaveWorldHandle,
) -> Result<Arc<CaveWorld>, ConfigError> {
    let world = generate(config)?;
    Ok(handle.publish(world))
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the config and world-handle resources. Generation itself stays
/// an explicit call; nothing here runs per frame.
pub struct CaveGenPlugin;

impl Plugin for CaveGenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CaveConfig>();
        app.init_resource::<CaveWorldHandle>();
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
