//! Block storage primitives consumed by tree generation: block ids, positions,
//! placement flags, region bounds, and an in-memory voxel volume.

pub mod bounds;
pub mod pos;
pub mod registry;
pub mod volume;

pub use bounds::RegionBounds;
pub use pos::BlockPos;
pub use registry::{BlockDef, BlockRegistry, BlockState, RegistryError};
pub use volume::{PlacementFlags, VoxelVolume};
