//! Blocks, biomes and tree rules used by the demo.

use std::sync::Arc;

use sylvan_voxel::{BlockDef, BlockRegistry, BlockState, RegistryError};
use sylvan_worldgen::{
    BiomeDatabase, BiomeDef, BiomeEntry, BiomeId, BiomeRegistry, BiomeRegistryError,
    BiomeTableError, ClimateDiagram, ClimateRegion, FixedChance, LayeredGroundFinder,
    MarkerPalette, RadiusChance, SoilSet, Species, StaticSpecies, TrunkAndCanopy,
    WeightedSpecies,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum SetupError {
    #[error(transparent)]
    Block(#[from] RegistryError),
    #[error(transparent)]
    Biome(#[from] BiomeRegistryError),
    #[error(transparent)]
    Table(#[from] BiomeTableError),
}

pub(crate) struct Blocks {
    pub stone: BlockState,
    pub dirt: BlockState,
    pub grass: BlockState,
    pub sand: BlockState,
    pub snow: BlockState,
    pub oak_log: BlockState,
    pub oak_leaves: BlockState,
    pub birch_log: BlockState,
    pub birch_leaves: BlockState,
    pub spruce_log: BlockState,
    pub spruce_leaves: BlockState,
}

impl Blocks {
    fn register(registry: &mut BlockRegistry) -> Result<Self, RegistryError> {
        let mut solid = |name: &str| registry.register(BlockDef::solid(name));
        Ok(Self {
            stone: solid("stone")?,
            dirt: solid("dirt")?,
            grass: solid("grass")?,
            sand: solid("sand")?,
            snow: solid("snow")?,
            oak_log: solid("oak_log")?,
            oak_leaves: solid("oak_leaves")?,
            birch_log: solid("birch_log")?,
            birch_leaves: solid("birch_leaves")?,
            spruce_log: solid("spruce_log")?,
            spruce_leaves: solid("spruce_leaves")?,
        })
    }
}

pub(crate) struct Biomes {
    pub registry: BiomeRegistry,
    pub plains: BiomeId,
    pub forest: BiomeId,
    pub taiga: BiomeId,
    pub desert: BiomeId,
}

impl Biomes {
    fn register(blocks: &Blocks) -> Result<Self, BiomeRegistryError> {
        let mut registry = BiomeRegistry::new();
        let mut add = |name: &str, surface_block, subsurface_block| {
            registry.register(BiomeDef {
                name: name.to_string(),
                surface_block,
                subsurface_block,
            })
        };
        let plains = add("plains", blocks.grass, blocks.dirt)?;
        let forest = add("forest", blocks.grass, blocks.dirt)?;
        let taiga = add("taiga", blocks.snow, blocks.dirt)?;
        let desert = add("desert", blocks.sand, blocks.sand)?;
        Ok(Self {
            registry,
            plains,
            forest,
            taiga,
            desert,
        })
    }

    /// Cold is taiga, hot and dry is desert, moist is forest, the rest plains.
    pub fn diagram(&self) -> ClimateDiagram {
        let region = |t: std::ops::Range<f64>, m: std::ops::Range<f64>, biome| ClimateRegion {
            temperature: t,
            moisture: m,
            biome,
        };
        ClimateDiagram {
            regions: vec![
                region(0.0..0.35, 0.0..1.0, self.taiga),
                region(0.65..1.0, 0.0..0.35, self.desert),
                region(0.35..1.0, 0.55..1.0, self.forest),
            ],
            fallback: self.plains,
        }
    }
}

/// Everything the generator needs besides terrain.
pub(crate) struct DemoWorld {
    pub registry: BlockRegistry,
    pub palette: MarkerPalette,
    pub blocks: Blocks,
    pub biomes: Biomes,
    pub table: BiomeDatabase,
}

pub(crate) fn build_demo_world() -> Result<DemoWorld, SetupError> {
    let mut registry = BlockRegistry::new();
    let blocks = Blocks::register(&mut registry)?;
    let palette = MarkerPalette::from_registry(&mut registry)?;
    let biomes = Biomes::register(&blocks)?;
    let table = build_table(&blocks, &biomes)?;

    tracing::info!(
        blocks = registry.len(),
        biomes = biomes.registry.len(),
        rules = table.len(),
        "Demo world registered"
    );
    Ok(DemoWorld {
        registry,
        palette,
        blocks,
        biomes,
        table,
    })
}

fn build_table(blocks: &Blocks, biomes: &Biomes) -> Result<BiomeDatabase, BiomeTableError> {
    let oak = Species::new(
        "oak",
        Arc::new(TrunkAndCanopy::new(blocks.oak_log, blocks.oak_leaves)),
    );
    let birch = Species::new(
        "birch",
        Arc::new(TrunkAndCanopy {
            min_height: 5,
            max_canopy: 2,
            ..TrunkAndCanopy::new(blocks.birch_log, blocks.birch_leaves)
        }),
    );
    let spruce = Species::new(
        "spruce",
        Arc::new(TrunkAndCanopy {
            min_height: 6,
            max_canopy: 2,
            ..TrunkAndCanopy::new(blocks.spruce_log, blocks.spruce_leaves)
        }),
    );

    let mut table = BiomeDatabase::new();
    table.register(
        biomes.forest,
        BiomeEntry::builder()
            .species(WeightedSpecies::new().with(Arc::clone(&oak), 3).with(birch, 1))
            .chance(RadiusChance {
                base: 0.5,
                per_radius: 0.1,
            })
            .soil(SoilSet::new([blocks.grass, blocks.dirt]))
            .build(),
    )?;
    table.register(
        biomes.plains,
        BiomeEntry::builder()
            .species(StaticSpecies(oak))
            .chance(FixedChance(0.1))
            .soil(SoilSet::new([blocks.grass]))
            .build(),
    )?;
    table.register(
        biomes.taiga,
        BiomeEntry::builder()
            .species(StaticSpecies(spruce))
            .chance(FixedChance(0.6))
            .soil(SoilSet::new([blocks.snow, blocks.dirt]))
            .ground(LayeredGroundFinder { max_layers: 2 })
            .build(),
    )?;
    table.blacklist(biomes.desert);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_world_builds() {
        let world = build_demo_world().unwrap();
        assert_eq!(world.table.len(), 4);
        assert!(world.table.handled_entry(world.biomes.desert).is_none());
        assert!(world.table.handled_entry(world.biomes.forest).is_some());
        assert_eq!(world.registry.lookup_by_name("oak_log"), Some(world.blocks.oak_log));
    }

    #[test]
    fn test_diagram_covers_every_biome() {
        let world = build_demo_world().unwrap();
        let diagram = world.biomes.diagram();
        assert_eq!(diagram.lookup(0.1, 0.5), world.biomes.taiga);
        assert_eq!(diagram.lookup(0.8, 0.1), world.biomes.desert);
        assert_eq!(diagram.lookup(0.5, 0.8), world.biomes.forest);
        assert_eq!(diagram.lookup(0.5, 0.4), world.biomes.plains);
    }
}
