//! Procedural tree placement: coordinate-seeded randomness, Poisson-disc
//! candidate sampling, per-biome rule tables and the decision pipeline that
//! turns a candidate into a tree (or a reason why not).

mod async_generation;
mod debug_viz;
mod generator;
mod heightmap;
mod poisson;
mod selectors;
mod species;
mod terrain;
mod world;

pub mod biome;
pub mod seed;

pub use async_generation::{AsyncTreeGenerator, GeneratedRegion, RegionTask, generate_region_sync};
pub use biome::{
    BiomeDatabase, BiomeDef, BiomeEntry, BiomeEntryBuilder, BiomeId, BiomeRegistry,
    BiomeRegistryError, BiomeSampler, BiomeTableError, ClimateDiagram, ClimateRegion,
};
pub use debug_viz::{BoundedPainter, DebugPainter, DyeColor, MarkerPalette};
pub use generator::{GeneratorResult, RegionReport, TreeGenerator};
pub use heightmap::{HeightmapParams, HeightmapSampler};
pub use poisson::{
    DensityPolicy, Disc, DiscProvider, MAX_DISC_RADIUS, PolicyError, RegionKey, sample,
};
pub use seed::{CoordRng, coord_rng, derive_coord_seed};
pub use selectors::{
    AlwaysChance, AnySoil, ChanceSelector, FixedChance, GroundFinder, LayeredGroundFinder,
    NeverChance, NoSpecies, RadiusChance, SoilSet, SoilValidator, SpeciesSelector,
    StaticSpecies, SurfaceGroundFinder, UnhandledSpecies, WeightedSpecies,
};
pub use species::{Chance, GrowthRoutine, Species, SpeciesSelection, TrunkAndCanopy};
pub use terrain::{NoiseTerrain, RegionSource, TerrainLayout};
pub use world::{RegionWorld, WorldAccessor, WorldContext};
