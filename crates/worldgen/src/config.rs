//! Generation configuration.
//!
//! `CaveConfig` is plain data: everything the pipeline needs to produce a
//! cave deterministically from a seed. It is validated up-front via
//! [`CaveConfig::validate`] so a degenerate configuration fails fast instead
//! of producing a degenerate world.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Noise parameters
// ---------------------------------------------------------------------------

/// Fractal noise parameters for one named noise channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Feature size in cells; sampling frequency is `1 / scale`.
    pub scale: f32,
    pub octaves: i32,
    pub persistence: f32,
    pub lacunarity: f32,
}

impl NoiseParams {
    pub fn new(scale: f32, octaves: i32) -> Self {
        Self {
            scale,
            octaves,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Zone parameters
// ---------------------------------------------------------------------------

/// Depth-zone thresholds and per-zone base floor heights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZoneParams {
    /// Broad-scale noise driving the zone partition.
    pub noise: NoiseParams,
    /// Zone-noise values below this are Deep.
    pub deep_threshold: f32,
    /// Zone-noise values below this (and at least `deep_threshold`) are Mid.
    pub mid_threshold: f32,
    pub shallow_height: f32,
    pub mid_height: f32,
    pub deep_height: f32,
}

impl Default for ZoneParams {
    fn default() -> Self {
        Self {
            noise: NoiseParams::new(48.0, 2),
            deep_threshold: 0.35,
            mid_threshold: 0.55,
            shallow_height: -2.0,
            mid_height: -5.5,
            deep_height: -9.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Formation parameters
// ---------------------------------------------------------------------------

/// Which openness strategy shapes the cave interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FormationStrategy {
    /// Scatter discrete rock formations onto open sea floor.
    #[default]
    MesaPlacement,
    /// Carve corridors out of solid rock with random walkers.
    CorridorCarve,
}

/// Mesa-placement strategy parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormationParams {
    /// Target number of formations; fewer may be placed when spacing cannot
    /// be satisfied within the attempt budget.
    pub mesa_count: usize,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Minimum Euclidean distance between accepted formation centers.
    pub min_spacing: f32,
    pub wall_height_min: f32,
    pub wall_height_max: f32,
    /// Edge irregularity of Round formations, as a fraction of the radius.
    pub edge_noise: f32,
    /// Probability weights for Round, Hourglass, Canyon, Chunky, Boulders.
    /// Must sum to 1.0 (unchecked); a roll past the cumulative total falls
    /// through to Boulders.
    pub kind_weights: [f32; 5],
}

impl Default for FormationParams {
    fn default() -> Self {
        Self {
            mesa_count: 12,
            radius_min: 3.0,
            radius_max: 7.0,
            min_spacing: 14.0,
            wall_height_min: 2.5,
            wall_height_max: 6.0,
            edge_noise: 0.3,
            kind_weights: [0.3, 0.15, 0.15, 0.2, 0.2],
        }
    }
}

/// Corridor-carving strategy parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CorridorParams {
    pub walker_count: usize,
    pub walker_steps: usize,
    pub min_brush: f32,
    pub max_brush: f32,
    /// Moore-neighborhood wall-eroding passes.
    pub erode_passes: u32,
    /// A wall survives eroding only with at least this many wall neighbors
    /// out of 8.
    pub min_wall_neighbors: u32,
    pub wall_height_min: f32,
    pub wall_height_max: f32,
}

impl Default for CorridorParams {
    fn default() -> Self {
        Self {
            walker_count: 6,
            walker_steps: 400,
            min_brush: 1.5,
            max_brush: 4.0,
            erode_passes: 3,
            min_wall_neighbors: 3,
            wall_height_min: 2.5,
            wall_height_max: 6.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Perimeter parameters
// ---------------------------------------------------------------------------

/// The permanently solid border band enclosing the playable grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerimeterParams {
    /// Base band thickness in cells before noise deformation.
    pub base_thickness: f32,
    /// Maximum deformation of the band edge, in cells.
    pub noise_amount: f32,
    pub noise: NoiseParams,
    /// Wall rise of perimeter cells above the deepest floor.
    pub wall_height: f32,
}

impl Default for PerimeterParams {
    fn default() -> Self {
        Self {
            base_thickness: 2.0,
            noise_amount: 2.0,
            noise: NoiseParams::new(12.0, 2),
            wall_height: 14.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Vertex resolution parameters
// ---------------------------------------------------------------------------

/// Vertex resolution and smoothing parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VertexParams {
    /// Small-scale noise applied to wall-top vertex heights.
    pub wall_top_noise: NoiseParams,
    pub wall_top_noise_amplitude: f32,
    /// Fixed rise added to every wall vertex on top of the tallest
    /// contributing cell.
    pub wall_top_boost: f32,
    pub wall_smooth_passes: u32,
    pub floor_smooth_passes: u32,
}

impl Default for VertexParams {
    fn default() -> Self {
        Self {
            wall_top_noise: NoiseParams::new(4.0, 3),
            wall_top_noise_amplitude: 0.8,
            wall_top_boost: 0.5,
            wall_smooth_passes: 2,
            floor_smooth_passes: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Everything one generation run needs. Same config + same seed produces a
/// bit-identical world.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CaveConfig {
    pub width: usize,
    pub height: usize,
    /// World-space size of one grid cell.
    pub cell_size: f32,
    /// Cells per side of one tessellation chunk.
    pub chunk_size: usize,
    pub seed: u64,
    pub zones: ZoneParams,
    /// Small-scale undulation of open sand, centered on the zone base height.
    pub floor_noise: NoiseParams,
    pub floor_noise_amplitude: f32,
    /// Floor-height smoothing passes over the cell grid.
    pub smoothing_passes: u32,
    pub strategy: FormationStrategy,
    pub formations: FormationParams,
    pub corridors: CorridorParams,
    pub perimeter: PerimeterParams,
    pub vertex: VertexParams,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 96,
            height: 96,
            cell_size: 2.0,
            chunk_size: 16,
            seed: 0,
            zones: ZoneParams::default(),
            floor_noise: NoiseParams::new(9.0, 3),
            floor_noise_amplitude: 0.6,
            smoothing_passes: 2,
            strategy: FormationStrategy::MesaPlacement,
            formations: FormationParams::default(),
            corridors: CorridorParams::default(),
            perimeter: PerimeterParams::default(),
            vertex: VertexParams::default(),
        }
    }
}

impl CaveConfig {
    /// Fail-fast validation. Generation refuses to run on a config that
    /// would produce degenerate output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveCellSize(self.cell_size));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.zones.deep_threshold >= self.zones.mid_threshold {
            return Err(ConfigError::InvalidThresholds {
                deep: self.zones.deep_threshold,
                mid: self.zones.mid_threshold,
            });
        }
        if self.formations.radius_min > self.formations.radius_max {
            return Err(ConfigError::InvalidRadiusRange {
                min: self.formations.radius_min,
                max: self.formations.radius_max,
            });
        }
        if self.corridors.min_brush > self.corridors.max_brush {
            return Err(ConfigError::InvalidBrushRange {
                min: self.corridors.min_brush,
                max: self.corridors.max_brush,
            });
        }
        for params in [
            &self.zones.noise,
            &self.floor_noise,
            &self.perimeter.noise,
            &self.vertex.wall_top_noise,
        ] {
            if params.scale <= 0.0 {
                return Err(ConfigError::NonPositiveNoiseScale(params.scale));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Configuration validation failures. Generation is otherwise a pure
/// transform with no recoverable-error taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid has zero cells in at least one dimension.
    EmptyGrid { width: usize, height: usize },
    /// `cell_size` must be positive to map grid to world space.
    NonPositiveCellSize(f32),
    /// `chunk_size` must be at least one cell.
    ZeroChunkSize,
    /// Zone thresholds must satisfy `deep < mid`.
    InvalidThresholds { deep: f32, mid: f32 },
    /// Formation radius range is inverted.
    InvalidRadiusRange { min: f32, max: f32 },
    /// Corridor brush range is inverted.
    InvalidBrushRange { min: f32, max: f32 },
    /// A noise channel's feature scale must be positive.
    NonPositiveNoiseScale(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGrid { width, height } => {
                write!(f, "grid must be non-empty, got {width}x{height}")
            }
            ConfigError::NonPositiveCellSize(size) => {
                write!(f, "cell_size must be positive, got {size}")
            }
            ConfigError::ZeroChunkSize => write!(f, "chunk_size must be at least 1"),
            ConfigError::InvalidThresholds { deep, mid } => {
                write!(f, "zone thresholds must be ascending: deep {deep} >= mid {mid}")
            }
            ConfigError::InvalidRadiusRange { min, max } => {
                write!(f, "formation radius range inverted: {min} > {max}")
            }
            ConfigError::InvalidBrushRange { min, max } => {
                write!(f, "corridor brush range inverted: {min} > {max}")
            }
            ConfigError::NonPositiveNoiseScale(scale) => {
                write!(f, "noise scale must be positive, got {scale}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
