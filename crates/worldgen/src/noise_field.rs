//! Seeded fractal noise channels.
//!
//! Every named noise use in the pipeline (zone partition, floor detail,
//! perimeter deformation, wall tops) gets its own [`NoiseChannel`], seeded as
//! `run seed + channel constant`. Channels are therefore independent:
//! retuning one sub-system's noise never perturbs the samples of another,
//! which keeps regeneration reproducible under partial config changes.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use crate::config::NoiseParams;

/// Channel constant for the broad zone-partition noise.
pub const ZONE_CHANNEL: u64 = 0;
/// Channel constant for small-scale floor undulation.
pub const FLOOR_DETAIL_CHANNEL: u64 = 101;
/// Channel constant for perimeter band deformation.
pub const PERIMETER_CHANNEL: u64 = 211;
/// Channel constant for wall-top height variation.
pub const WALL_TOP_CHANNEL: u64 = 307;

/// One seeded fractal value-noise sampler, output normalized to [0, 1].
pub struct NoiseChannel {
    noise: FastNoiseLite,
}

impl NoiseChannel {
    pub fn new(seed: u64, channel: u64, params: &NoiseParams) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed.wrapping_add(channel) as i32);
        noise.set_noise_type(Some(NoiseType::Value));
        noise.set_frequency(Some(1.0 / params.scale));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(params.octaves));
        noise.set_fractal_gain(Some(params.persistence));
        noise.set_fractal_lacunarity(Some(params.lacunarity));
        Self { noise }
    }

    /// Sample at a grid-space position. Fractal value noise outputs in
    /// [-1, 1]; normalize to [0, 1] and clamp.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let raw = self.noise.get_noise_2d(x, y);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Sample recentered on zero, in [-0.5, 0.5]. Used by passes that want
    /// a signed deformation instead of an absolute value.
    #[inline]
    pub fn sample_centered(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y) - 0.5
    }
}
