//! Biomes: identifiers and definitions, climate-based assignment for the demo
//! terrain, and the per-biome tree rule table consulted during generation.

mod database;
mod def;
mod diagram;
mod registry;
mod sampler;

pub use database::{BiomeDatabase, BiomeEntry, BiomeEntryBuilder, BiomeTableError};
pub use def::BiomeDef;
pub use diagram::{ClimateDiagram, ClimateRegion};
pub use registry::{BiomeId, BiomeRegistry, BiomeRegistryError};
pub use sampler::BiomeSampler;
