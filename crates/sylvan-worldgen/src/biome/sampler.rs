//! Biome sampler: temperature and moisture noise fields fed into a
//! [`ClimateDiagram`].

use noise::{NoiseFn, Simplex};

use super::{BiomeId, ClimateDiagram};

/// Samples biomes at block columns.
pub struct BiomeSampler {
    temperature_noise: Simplex,
    moisture_noise: Simplex,
    diagram: ClimateDiagram,
    /// Lower values produce broader climate zones.
    pub temperature_frequency: f64,
    pub moisture_frequency: f64,
}

impl BiomeSampler {
    /// Temperature and moisture use decorrelated seeds derived from `seed`.
    pub fn new(seed: u64, diagram: ClimateDiagram) -> Self {
        Self {
            temperature_noise: Simplex::new(seed as u32),
            moisture_noise: Simplex::new(seed.wrapping_add(0xDEAD_BEEF) as u32),
            diagram,
            temperature_frequency: 0.004,
            moisture_frequency: 0.005,
        }
    }

    /// Returns `(biome, temperature, moisture)` at column `(x, z)`, with the
    /// climate values normalized to `[0, 1]`.
    pub fn sample(&self, x: f64, z: f64) -> (BiomeId, f64, f64) {
        let t = self
            .temperature_noise
            .get([x * self.temperature_frequency, z * self.temperature_frequency]);
        let m = self
            .moisture_noise
            .get([x * self.moisture_frequency, z * self.moisture_frequency]);

        let temperature = ((t + 1.0) * 0.5).clamp(0.0, 1.0);
        let moisture = ((m + 1.0) * 0.5).clamp(0.0, 1.0);
        (self.diagram.lookup(temperature, moisture), temperature, moisture)
    }

    pub fn biome_at(&self, x: i32, z: i32) -> BiomeId {
        self.sample(x as f64, z as f64).0
    }
}
