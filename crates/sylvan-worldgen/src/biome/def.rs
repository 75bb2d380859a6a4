//! Biome definition: terrain materials of a single biome type.

use sylvan_voxel::BlockState;

/// Descriptor for a biome type.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDef {
    /// Unique biome name (e.g., "forest", "plains").
    pub name: String,
    /// Block placed on the terrain surface (grass, sand, snow...).
    pub surface_block: BlockState,
    /// Block for the few layers below the surface.
    pub subsurface_block: BlockState,
}
