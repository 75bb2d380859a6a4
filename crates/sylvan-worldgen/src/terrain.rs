//! Region worlds for tree generation to run on.

use std::sync::Arc;

use sylvan_voxel::{BlockRegistry, BlockState};

use crate::biome::{BiomeRegistry, BiomeSampler};
use crate::heightmap::HeightmapSampler;
use crate::poisson::RegionKey;
use crate::world::RegionWorld;

/// Builds the world a region's trees are generated into.
pub trait RegionSource: Send + Sync {
    fn build(&self, region: RegionKey) -> RegionWorld;
}

/// Size and placement of the worlds built by [`NoiseTerrain`].
#[derive(Clone, Copy, Debug)]
pub struct TerrainLayout {
    pub region_size: i32,
    /// Extra columns around the region, so trees near its edge have room.
    pub margin: i32,
    pub min_y: i32,
    pub height: usize,
}

impl Default for TerrainLayout {
    fn default() -> Self {
        Self {
            region_size: 16,
            margin: 8,
            min_y: 0,
            height: 128,
        }
    }
}

/// Number of subsurface layers under the surface block.
const SUBSURFACE_DEPTH: i32 = 3;

/// Heightmap terrain with climate-assigned biomes.
pub struct NoiseTerrain {
    registry: Arc<BlockRegistry>,
    biomes: Arc<BiomeRegistry>,
    heightmap: HeightmapSampler,
    climate: BiomeSampler,
    stone: BlockState,
    layout: TerrainLayout,
}

impl NoiseTerrain {
    pub fn new(
        registry: Arc<BlockRegistry>,
        biomes: Arc<BiomeRegistry>,
        heightmap: HeightmapSampler,
        climate: BiomeSampler,
        stone: BlockState,
        layout: TerrainLayout,
    ) -> Self {
        Self {
            registry,
            biomes,
            heightmap,
            climate,
            stone,
            layout,
        }
    }

    pub fn layout(&self) -> &TerrainLayout {
        &self.layout
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }
}

impl RegionSource for NoiseTerrain {
    fn build(&self, region: RegionKey) -> RegionWorld {
        let layout = &self.layout;
        let bounds = region.bounds(layout.region_size);
        let bounds = bounds.shrink(-layout.margin);
        let top = layout.min_y + layout.height as i32 - 1;

        let mut world = RegionWorld::new(
            Arc::clone(&self.registry),
            bounds,
            layout.min_y,
            layout.height,
            self.climate.biome_at(bounds.min_x, bounds.min_z),
        );

        for (x, z) in bounds.columns() {
            let surface = self.heightmap.height_at(x, z).clamp(layout.min_y, top - 1);
            let biome = self.climate.biome_at(x, z);
            world.set_biome(x, z, biome);

            let (surface_block, subsurface_block) = self
                .biomes
                .get(biome)
                .map_or((self.stone, self.stone), |def| {
                    (def.surface_block, def.subsurface_block)
                });

            let volume = world.volume_mut();
            let sub_start = surface - SUBSURFACE_DEPTH;
            volume.fill_column(x, z, layout.min_y, sub_start, self.stone);
            volume.fill_column(x, z, sub_start, surface, subsurface_block);
            volume.fill_column(x, z, surface, surface + 1, surface_block);
        }

        world
    }
}
