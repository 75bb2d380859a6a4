//! Tree species and their growth routines.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use sylvan_voxel::{BlockPos, BlockState, PlacementFlags};

use crate::biome::BiomeId;
use crate::seed::CoordRng;
use crate::world::WorldContext;

/// Materializes a tree into the world.
///
/// This is the only decision stage allowed to write blocks. Implementations
/// must confine their writes to `ctx.bounds` and draw randomness only from
/// `rng`.
pub trait GrowthRoutine: Send + Sync {
    /// Grow a tree rooted on `ground`. `radius` is the size hint from the
    /// candidate disc. Returns `false` if the tree could not be placed.
    fn grow(
        &self,
        ctx: &mut WorldContext<'_>,
        ground: BlockPos,
        biome: BiomeId,
        rng: &mut CoordRng,
        radius: i32,
    ) -> bool;
}

/// A named species with its growth routine.
pub struct Species {
    name: String,
    growth: Arc<dyn GrowthRoutine>,
}

impl Species {
    pub fn new(name: impl Into<String>, growth: Arc<dyn GrowthRoutine>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            growth,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grow(
        &self,
        ctx: &mut WorldContext<'_>,
        ground: BlockPos,
        biome: BiomeId,
        rng: &mut CoordRng,
        radius: i32,
    ) -> bool {
        self.growth.grow(ctx, ground, biome, rng, radius)
    }
}

impl fmt::Debug for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Species").field("name", &self.name).finish()
    }
}

/// What a species selector decided for one candidate.
#[derive(Clone, Debug, Default)]
pub enum SpeciesSelection {
    /// The selector does not cover this position at all.
    #[default]
    Unhandled,
    /// The selector covers this position; `None` means "no tree here".
    Handled(Option<Arc<Species>>),
}

impl SpeciesSelection {
    pub fn species(species: Arc<Species>) -> Self {
        Self::Handled(Some(species))
    }

    /// Handled, but no tree.
    pub fn empty() -> Self {
        Self::Handled(None)
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Outcome of a chance roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chance {
    Ok,
    Fail,
    /// The selector has no opinion. Treated as [`Chance::Fail`] by the generator.
    Unhandled,
}

// ---------------------------------------------------------------------------
// Stock growth routine
// ---------------------------------------------------------------------------

/// A straight log trunk capped with a round leaf canopy.
///
/// Trunk height grows with the disc radius; the canopy radius is
/// `radius - 1` clamped to `1..=max_canopy`.
#[derive(Clone, Debug)]
pub struct TrunkAndCanopy {
    pub log: BlockState,
    pub leaves: BlockState,
    pub min_height: i32,
    pub max_canopy: i32,
}

impl TrunkAndCanopy {
    pub fn new(log: BlockState, leaves: BlockState) -> Self {
        Self {
            log,
            leaves,
            min_height: 4,
            max_canopy: 3,
        }
    }

    fn canopy_radius(&self, radius: i32) -> i32 {
        (radius - 1).clamp(1, self.max_canopy.max(1))
    }
}

impl GrowthRoutine for TrunkAndCanopy {
    fn grow(
        &self,
        ctx: &mut WorldContext<'_>,
        ground: BlockPos,
        _biome: BiomeId,
        rng: &mut CoordRng,
        radius: i32,
    ) -> bool {
        let height = self.min_height + radius / 2 + rng.random_range(0..=2);
        let canopy = self.canopy_radius(radius);
        let top = ground.y + height;

        if !ctx.bounds.contains_square(ground.x, ground.z, canopy) {
            return false;
        }
        let (_, max_y) = ctx.access.height_range();
        if top + canopy >= max_y {
            return false;
        }

        let registry = ctx.access.registry();
        let obstructed = (1..=height).any(|dy| {
            let state = ctx.access.block_state(ground.offset(0, dy, 0));
            !registry.is_replaceable(state)
        });
        if obstructed {
            return false;
        }

        let flags = PlacementFlags::SEND_TO_CLIENTS;
        for dy in 1..=height {
            ctx.access
                .set_block_state(ground.offset(0, dy, 0), self.log, flags);
        }

        let reach = canopy * canopy + canopy;
        for dy in -canopy..=canopy {
            for dz in -canopy..=canopy {
                for dx in -canopy..=canopy {
                    if dx * dx + dy * dy + dz * dz > reach {
                        continue;
                    }
                    let pos = BlockPos::new(ground.x + dx, top + dy, ground.z + dz);
                    if ctx.access.registry().is_replaceable(ctx.access.block_state(pos)) {
                        ctx.access.set_block_state(pos, self.leaves, flags);
                    }
                }
            }
        }
        true
    }
}
