//! Climate diagram: maps (temperature, moisture) to a biome.

use std::ops::Range;

use super::BiomeId;

/// A rectangle in temperature–moisture space. Ranges are half-open.
#[derive(Clone, Debug)]
pub struct ClimateRegion {
    pub temperature: Range<f64>,
    pub moisture: Range<f64>,
    pub biome: BiomeId,
}

impl ClimateRegion {
    pub fn contains(&self, temperature: f64, moisture: f64) -> bool {
        self.temperature.contains(&temperature) && self.moisture.contains(&moisture)
    }
}

/// Ordered climate regions; first match wins.
#[derive(Clone, Debug)]
pub struct ClimateDiagram {
    pub regions: Vec<ClimateRegion>,
    /// Used when no region matches (including values of exactly 1.0).
    pub fallback: BiomeId,
}

impl ClimateDiagram {
    /// Looks up the biome for normalized temperature and moisture in `[0, 1]`.
    pub fn lookup(&self, temperature: f64, moisture: f64) -> BiomeId {
        self.regions
            .iter()
            .find(|region| region.contains(temperature, moisture))
            .map_or(self.fallback, |region| region.biome)
    }
}
