//! World access as seen by tree generation.
//!
//! The generator only reads blocks and biomes and writes blocks through
//! [`WorldAccessor`]. [`RegionWorld`] is the in-memory implementation used by
//! the region worker pool and tests.

use std::sync::Arc;

use sylvan_voxel::{BlockPos, BlockRegistry, BlockState, PlacementFlags, RegionBounds, VoxelVolume};

use crate::biome::BiomeId;

/// Block and biome access for one generation pass.
///
/// A pass holds exclusive access to its world, so implementations need no
/// internal locking.
pub trait WorldAccessor {
    fn block_state(&self, pos: BlockPos) -> BlockState;

    /// Returns `false` if the write was rejected.
    fn set_block_state(&mut self, pos: BlockPos, state: BlockState, flags: PlacementFlags) -> bool;

    fn biome(&self, pos: BlockPos) -> BiomeId;

    /// Inclusive lowest and exclusive highest addressable y.
    fn height_range(&self) -> (i32, i32);

    /// Block metadata used to tell ground from air.
    fn registry(&self) -> &BlockRegistry;
}

/// Everything a generation pass needs besides the rule table.
pub struct WorldContext<'a> {
    pub access: &'a mut dyn WorldAccessor,
    pub world_seed: u64,
    /// Writes outside these bounds must be skipped.
    pub bounds: RegionBounds,
}

impl<'a> WorldContext<'a> {
    pub fn new(access: &'a mut dyn WorldAccessor, world_seed: u64, bounds: RegionBounds) -> Self {
        Self {
            access,
            world_seed,
            bounds,
        }
    }
}

/// A voxel volume plus one biome per column.
#[derive(Clone, Debug)]
pub struct RegionWorld {
    registry: Arc<BlockRegistry>,
    volume: VoxelVolume,
    biomes: Vec<BiomeId>,
    /// Reported for columns outside the volume.
    default_biome: BiomeId,
}

impl RegionWorld {
    pub fn new(
        registry: Arc<BlockRegistry>,
        bounds: RegionBounds,
        min_y: i32,
        height: usize,
        default_biome: BiomeId,
    ) -> Self {
        Self {
            registry,
            volume: VoxelVolume::new(bounds, min_y, height),
            biomes: vec![default_biome; bounds.width() * bounds.depth()],
            default_biome,
        }
    }

    pub fn bounds(&self) -> RegionBounds {
        self.volume.bounds()
    }

    pub fn volume(&self) -> &VoxelVolume {
        &self.volume
    }

    pub fn volume_mut(&mut self) -> &mut VoxelVolume {
        &mut self.volume
    }

    /// Assign a biome to column `(x, z)`. Ignored outside the bounds.
    pub fn set_biome(&mut self, x: i32, z: i32, biome: BiomeId) {
        if let Some(i) = self.column_index(x, z) {
            self.biomes[i] = biome;
        }
    }

    /// Assign one biome to every column.
    pub fn fill_biome(&mut self, biome: BiomeId) {
        self.biomes.fill(biome);
    }

    fn column_index(&self, x: i32, z: i32) -> Option<usize> {
        let bounds = self.volume.bounds();
        bounds.contains_xz(x, z).then(|| {
            (z - bounds.min_z) as usize * bounds.width() + (x - bounds.min_x) as usize
        })
    }
}

impl WorldAccessor for RegionWorld {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.volume.get(pos)
    }

    fn set_block_state(&mut self, pos: BlockPos, state: BlockState, flags: PlacementFlags) -> bool {
        self.volume.set(pos, state, flags)
    }

    fn biome(&self, pos: BlockPos) -> BiomeId {
        self.column_index(pos.x, pos.z)
            .map_or(self.default_biome, |i| self.biomes[i])
    }

    fn height_range(&self) -> (i32, i32) {
        self.volume.height_range()
    }

    fn registry(&self) -> &BlockRegistry {
        &self.registry
    }
}
