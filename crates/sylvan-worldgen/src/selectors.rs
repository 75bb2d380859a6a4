//! The per-biome capabilities consulted by the generator, one method each,
//! together with stock implementations.

use std::sync::Arc;

use hashbrown::HashSet;
use rand::Rng;
use sylvan_voxel::{BlockPos, BlockState};

use crate::seed::CoordRng;
use crate::species::{Chance, Species, SpeciesSelection};
use crate::world::WorldAccessor;

/// Picks the species to grow at a candidate.
pub trait SpeciesSelector: Send + Sync {
    fn select(&self, pos: BlockPos, ground: BlockState, rng: &mut CoordRng) -> SpeciesSelection;
}

/// Decides whether a selected species actually grows at a disc of `radius`.
pub trait ChanceSelector: Send + Sync {
    fn roll(&self, rng: &mut CoordRng, species: &Species, radius: i32) -> Chance;
}

/// Decides whether `ground` can host `species`.
pub trait SoilValidator: Send + Sync {
    fn is_acceptable(
        &self,
        world: &dyn WorldAccessor,
        pos: BlockPos,
        ground: BlockState,
        species: &Species,
    ) -> bool;
}

/// Finds candidate ground heights in a column.
pub trait GroundFinder: Send + Sync {
    /// Returns the y of every ground block found in `column` (its own y is ignored).
    fn find(&self, world: &dyn WorldAccessor, column: BlockPos) -> Vec<i32>;
}

// ---------------------------------------------------------------------------
// Species selectors
// ---------------------------------------------------------------------------

/// Always selects the same species.
pub struct StaticSpecies(pub Arc<Species>);

impl SpeciesSelector for StaticSpecies {
    fn select(&self, _pos: BlockPos, _ground: BlockState, _rng: &mut CoordRng) -> SpeciesSelection {
        SpeciesSelection::species(Arc::clone(&self.0))
    }
}

/// Handles every position but never selects a tree.
pub struct NoSpecies;

impl SpeciesSelector for NoSpecies {
    fn select(&self, _pos: BlockPos, _ground: BlockState, _rng: &mut CoordRng) -> SpeciesSelection {
        SpeciesSelection::empty()
    }
}

/// Declines every position.
pub struct UnhandledSpecies;

impl SpeciesSelector for UnhandledSpecies {
    fn select(&self, _pos: BlockPos, _ground: BlockState, _rng: &mut CoordRng) -> SpeciesSelection {
        SpeciesSelection::Unhandled
    }
}

/// Weighted random pick among species. Zero weights are never picked.
#[derive(Default)]
pub struct WeightedSpecies {
    choices: Vec<(Arc<Species>, u32)>,
    total: u32,
}

impl WeightedSpecies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, species: Arc<Species>, weight: u32) -> Self {
        self.total += weight;
        self.choices.push((species, weight));
        self
    }
}

impl SpeciesSelector for WeightedSpecies {
    fn select(&self, _pos: BlockPos, _ground: BlockState, rng: &mut CoordRng) -> SpeciesSelection {
        if self.total == 0 {
            return SpeciesSelection::empty();
        }
        let mut pick = rng.random_range(0..self.total);
        for (species, weight) in &self.choices {
            if pick < *weight {
                return SpeciesSelection::species(Arc::clone(species));
            }
            pick -= weight;
        }
        SpeciesSelection::empty()
    }
}

// ---------------------------------------------------------------------------
// Chance selectors
// ---------------------------------------------------------------------------

pub struct AlwaysChance;

impl ChanceSelector for AlwaysChance {
    fn roll(&self, _rng: &mut CoordRng, _species: &Species, _radius: i32) -> Chance {
        Chance::Ok
    }
}

pub struct NeverChance;

impl ChanceSelector for NeverChance {
    fn roll(&self, _rng: &mut CoordRng, _species: &Species, _radius: i32) -> Chance {
        Chance::Fail
    }
}

/// Accepts with fixed probability.
pub struct FixedChance(pub f64);

impl ChanceSelector for FixedChance {
    fn roll(&self, rng: &mut CoordRng, _species: &Species, _radius: i32) -> Chance {
        if rng.random::<f64>() < self.0 {
            Chance::Ok
        } else {
            Chance::Fail
        }
    }
}

/// Probability grows linearly with the disc radius:
/// `base + per_radius * (radius - 1)`, clamped to `[0, 1]`.
pub struct RadiusChance {
    pub base: f64,
    pub per_radius: f64,
}

impl RadiusChance {
    pub fn probability(&self, radius: i32) -> f64 {
        (self.base + self.per_radius * (radius - 1) as f64).clamp(0.0, 1.0)
    }
}

impl ChanceSelector for RadiusChance {
    fn roll(&self, rng: &mut CoordRng, _species: &Species, radius: i32) -> Chance {
        if rng.random::<f64>() < self.probability(radius) {
            Chance::Ok
        } else {
            Chance::Fail
        }
    }
}

// ---------------------------------------------------------------------------
// Soil validators
// ---------------------------------------------------------------------------

pub struct AnySoil;

impl SoilValidator for AnySoil {
    fn is_acceptable(
        &self,
        _world: &dyn WorldAccessor,
        _pos: BlockPos,
        _ground: BlockState,
        _species: &Species,
    ) -> bool {
        true
    }
}

/// Accepts ground blocks from a fixed set, for every species.
#[derive(Default)]
pub struct SoilSet(HashSet<BlockState>);

impl SoilSet {
    pub fn new(blocks: impl IntoIterator<Item = BlockState>) -> Self {
        Self(blocks.into_iter().collect())
    }
}

impl SoilValidator for SoilSet {
    fn is_acceptable(
        &self,
        _world: &dyn WorldAccessor,
        _pos: BlockPos,
        ground: BlockState,
        _species: &Species,
    ) -> bool {
        self.0.contains(&ground)
    }
}

// ---------------------------------------------------------------------------
// Ground finders
// ---------------------------------------------------------------------------

/// Whether `y` is a solid block with air above it.
fn is_surface(world: &dyn WorldAccessor, x: i32, y: i32, z: i32) -> bool {
    let registry = world.registry();
    registry.is_solid(world.block_state(BlockPos::new(x, y, z)))
        && world.block_state(BlockPos::new(x, y + 1, z)).is_air()
}

/// The topmost solid block that has air above it.
pub struct SurfaceGroundFinder;

impl GroundFinder for SurfaceGroundFinder {
    fn find(&self, world: &dyn WorldAccessor, column: BlockPos) -> Vec<i32> {
        let (lo, hi) = world.height_range();
        (lo..hi - 1)
            .rev()
            .find(|&y| is_surface(world, column.x, y, column.z))
            .into_iter()
            .collect()
    }
}

/// Every solid block that has air above it, top first. Finds cave floors
/// and ledges as well as the surface.
pub struct LayeredGroundFinder {
    /// Upper bound on the number of results.
    pub max_layers: usize,
}

impl GroundFinder for LayeredGroundFinder {
    fn find(&self, world: &dyn WorldAccessor, column: BlockPos) -> Vec<i32> {
        let (lo, hi) = world.height_range();
        (lo..hi - 1)
            .rev()
            .filter(|&y| is_surface(world, column.x, y, column.z))
            .take(self.max_layers)
            .collect()
    }
}
