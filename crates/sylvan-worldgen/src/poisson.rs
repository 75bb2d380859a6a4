//! Candidate tree sites: Poisson-disc style sampling over a global cell grid.
//!
//! The world is covered by a virtual grid whose cell side fits the largest
//! allowed disc plus the configured gap. Each cell holds at most one disc,
//! jittered so that the whole disc stays inside its cell. A region keeps the
//! discs whose centers fall inside it. Every cell is a pure function of the
//! world seed and its global origin, so the disc set of a region does not
//! depend on which neighbours were sampled first, or whether they were
//! sampled at all.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use sylvan_voxel::{BlockPos, RegionBounds};
use thiserror::Error;

use crate::seed::salted_rng;

/// Salt for sampler streams, so cell draws never coincide with decision draws.
const SAMPLER_SALT: u64 = 0x5041_4D50_4C45_5200;

/// Largest disc radius a policy may request.
pub const MAX_DISC_RADIUS: i32 = 32;

// ---------------------------------------------------------------------------
// Region key
// ---------------------------------------------------------------------------

/// Address of a square generation region (one chunk column).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    pub x: i32,
    pub z: i32,
}

impl RegionKey {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The region containing block column `(x, z)`.
    pub fn containing(x: i32, z: i32, region_size: i32) -> Self {
        Self::new(x.div_euclid(region_size), z.div_euclid(region_size))
    }

    /// Block bounds of this region without margin.
    pub fn bounds(self, region_size: i32) -> RegionBounds {
        RegionBounds::for_region(self.x, self.z, region_size, 0)
    }

    /// Squared distance in region units, used for work prioritisation.
    pub fn distance_squared(self, other: RegionKey) -> u64 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dz = (self.z as i64 - other.z as i64).unsigned_abs();
        dx * dx + dz * dz
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region[{}, {}]", self.x, self.z)
    }
}

// ---------------------------------------------------------------------------
// Density policy
// ---------------------------------------------------------------------------

/// Errors from constructing a [`DensityPolicy`].
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("radius range {min}..={max} is empty or outside 1..={MAX_DISC_RADIUS}")]
    InvalidRadius { min: i32, max: i32 },
    #[error("gap must be non-negative, got {0}")]
    NegativeGap(i32),
    #[error("occupancy must be within [0, 1], got {0}")]
    InvalidOccupancy(f64),
    #[error("region size must be positive, got {0}")]
    InvalidRegionSize(i32),
}

/// How densely discs are packed.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityPolicy {
    min_radius: i32,
    max_radius: i32,
    gap: i32,
    occupancy: f64,
    region_size: i32,
}

impl DensityPolicy {
    /// Create a validated policy.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] describing the first invalid parameter.
    pub fn new(
        min_radius: i32,
        max_radius: i32,
        gap: i32,
        occupancy: f64,
        region_size: i32,
    ) -> Result<Self, PolicyError> {
        if min_radius < 1 || max_radius > MAX_DISC_RADIUS || min_radius > max_radius {
            return Err(PolicyError::InvalidRadius {
                min: min_radius,
                max: max_radius,
            });
        }
        if gap < 0 {
            return Err(PolicyError::NegativeGap(gap));
        }
        if !(0.0..=1.0).contains(&occupancy) {
            return Err(PolicyError::InvalidOccupancy(occupancy));
        }
        if region_size < 1 {
            return Err(PolicyError::InvalidRegionSize(region_size));
        }
        Ok(Self {
            min_radius,
            max_radius,
            gap,
            occupancy,
            region_size,
        })
    }

    pub fn min_radius(&self) -> i32 {
        self.min_radius
    }

    pub fn max_radius(&self) -> i32 {
        self.max_radius
    }

    pub fn gap(&self) -> i32 {
        self.gap
    }

    pub fn occupancy(&self) -> f64 {
        self.occupancy
    }

    pub fn region_size(&self) -> i32 {
        self.region_size
    }

    /// Clamp a radius into the configured range.
    pub fn clamp_radius(&self, radius: i32) -> i32 {
        radius.clamp(self.min_radius, self.max_radius)
    }

    /// Side length of a grid cell.
    pub fn cell_size(&self) -> i32 {
        2 * self.max_radius + 1 + self.gap
    }

    /// Minimum center distance between two discs of the given radii.
    pub fn min_separation(&self, r1: i32, r2: i32) -> i32 {
        r1 + r2 + self.gap
    }
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self {
            min_radius: 2,
            max_radius: 8,
            gap: 0,
            occupancy: 1.0,
            region_size: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// Disc
// ---------------------------------------------------------------------------

/// A candidate tree site: integer center and radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Disc {
    pub x: i32,
    pub z: i32,
    pub radius: i32,
}

impl Disc {
    /// Radius is raised to 1 if smaller.
    pub fn new(x: i32, z: i32, radius: i32) -> Self {
        Self {
            x,
            z,
            radius: radius.max(1),
        }
    }

    /// The disc center at height `y`.
    pub fn center(&self, y: i32) -> BlockPos {
        BlockPos::new(self.x, y, self.z)
    }

    /// Whether cell `(px, pz)` belongs to the rasterised disc.
    ///
    /// Cells are inside when their distance from the center rounds (half up)
    /// to at most the radius: `4 * d² < (2r + 1)²`.
    pub fn is_inside(&self, px: i32, pz: i32) -> bool {
        let dx = (px - self.x) as i64;
        let dz = (pz - self.z) as i64;
        let diameter = 2 * self.radius as i64 + 1;
        4 * (dx * dx + dz * dz) < diameter * diameter
    }

    /// Whether cell `(px, pz)` lies on the disc's one-voxel boundary ring.
    ///
    /// An edge cell is inside and has at least one 4-neighbour outside, which
    /// yields a closed, 8-connected ring for every radius.
    pub fn is_edge(&self, px: i32, pz: i32) -> bool {
        self.is_inside(px, pz)
            && [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .any(|&(ox, oz)| !self.is_inside(px + ox, pz + oz))
    }

    /// All edge cells, row by row.
    pub fn edge_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let bbox = self.bounding_box();
        (bbox.min_z..=bbox.max_z).flat_map(move |pz| {
            (bbox.min_x..=bbox.max_x).filter_map(move |px| self.is_edge(px, pz).then_some((px, pz)))
        })
    }

    pub fn distance_to(&self, other: &Disc) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dz = (self.z - other.z) as f64;
        libm::sqrt(dx * dx + dz * dz)
    }

    /// Whether the two discs' circles overlap.
    pub fn intersects(&self, other: &Disc) -> bool {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        let reach = (self.radius + other.radius) as i64;
        dx * dx + dz * dz < reach * reach
    }

    /// Square xz bounds of the disc.
    pub fn bounding_box(&self) -> RegionBounds {
        RegionBounds::new(
            (self.x - self.radius, self.z - self.radius),
            (self.x + self.radius, self.z + self.radius),
        )
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// The disc owned by grid cell `(cell_x, cell_z)`, if the cell is occupied.
fn cell_disc(world_seed: u64, cell_x: i32, cell_z: i32, policy: &DensityPolicy) -> Option<Disc> {
    let side = policy.cell_size();
    let (origin_x, origin_z) = (cell_x * side, cell_z * side);
    let mut rng = salted_rng(world_seed, SAMPLER_SALT, origin_x, 0, origin_z);

    // Always drawn, so the remaining draws do not depend on occupancy.
    let roll: f64 = rng.random();
    let radius = rng.random_range(policy.min_radius..=policy.max_radius);
    let span = side - 1 - policy.gap - 2 * radius;
    let jitter_x = rng.random_range(0..=span);
    let jitter_z = rng.random_range(0..=span);

    if roll >= policy.occupancy {
        return None;
    }
    Some(Disc::new(
        origin_x + radius + jitter_x,
        origin_z + radius + jitter_z,
        policy.clamp_radius(radius),
    ))
}

/// Sample the discs of one region, sorted by `(z, x)`.
///
/// Any two returned discs satisfy
/// `distance >= policy.min_separation(r1, r2)`. Discs of adjacent regions
/// satisfy it too, since they come from distinct grid cells.
pub fn sample(world_seed: u64, region: RegionKey, policy: &DensityPolicy) -> Vec<Disc> {
    let bounds = region.bounds(policy.region_size);
    let side = policy.cell_size();

    let mut discs = Vec::new();
    for cell_z in bounds.min_z.div_euclid(side)..=bounds.max_z.div_euclid(side) {
        for cell_x in bounds.min_x.div_euclid(side)..=bounds.max_x.div_euclid(side) {
            if let Some(disc) = cell_disc(world_seed, cell_x, cell_z, policy)
                && bounds.contains_xz(disc.x, disc.z)
            {
                discs.push(disc);
            }
        }
    }

    discs.sort_by_key(|d| (d.z, d.x));
    discs
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Memoising front end to [`sample`], safe to share across worker threads.
///
/// Cached values are pure functions of their keys, so races between workers
/// computing the same region are harmless.
pub struct DiscProvider {
    world_seed: u64,
    policy: DensityPolicy,
    cache: DashMap<RegionKey, Arc<[Disc]>>,
}

impl DiscProvider {
    pub fn new(world_seed: u64, policy: DensityPolicy) -> Self {
        Self {
            world_seed,
            policy,
            cache: DashMap::new(),
        }
    }

    /// Discs of `region`, computed on first request.
    pub fn discs(&self, region: RegionKey) -> Arc<[Disc]> {
        if let Some(hit) = self.cache.get(&region) {
            return Arc::clone(hit.value());
        }
        let fresh: Arc<[Disc]> = sample(self.world_seed, region, &self.policy).into();
        Arc::clone(self.cache.entry(region).or_insert(fresh).value())
    }

    /// Drop the cached discs of a region, e.g. once it has been generated.
    pub fn evict(&self, region: RegionKey) {
        self.cache.remove(&region);
    }

    pub fn cached_regions(&self) -> usize {
        self.cache.len()
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    pub fn policy(&self) -> &DensityPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_separated(discs: &[Disc], policy: &DensityPolicy) {
        for (i, a) in discs.iter().enumerate() {
            for b in &discs[i + 1..] {
                let min = policy.min_separation(a.radius, b.radius) as f64;
                assert!(
                    a.distance_to(b) >= min,
                    "Discs {a:?} and {b:?} too close: {} < {min}",
                    a.distance_to(b)
                );
            }
        }
    }

    #[test]
    fn test_sample_is_deterministic() {
        let policy = DensityPolicy::default();
        let a = sample(42, RegionKey::new(3, -5), &policy);
        let b = sample(42, RegionKey::new(3, -5), &policy);
        assert_eq!(a, b);
    }

    /// Pinned output; a change here breaks every saved world.
    #[test]
    fn test_sample_matches_known_layout() {
        let policy = DensityPolicy::default();
        assert_eq!(sample(42, RegionKey::new(0, 0), &policy), vec![Disc::new(7, 9, 6)]);
        assert_eq!(sample(42, RegionKey::new(3, -2), &policy), vec![Disc::new(57, -25, 5)]);

        let wide = DensityPolicy::new(2, 8, 0, 1.0, 64).unwrap();
        let expected = [
            (-39, -61, 2),
            (-9, -60, 8),
            (-58, -58, 6),
            (-23, -56, 2),
            (-25, -45, 5),
            (-7, -44, 6),
            (-47, -41, 2),
            (-58, -39, 4),
            (-28, -29, 4),
            (-43, -26, 8),
            (-5, -26, 2),
            (-62, -24, 2),
            (-25, -15, 2),
            (-59, -9, 7),
            (-43, -9, 8),
            (-9, -9, 7),
        ]
        .map(|(x, z, r)| Disc::new(x, z, r));
        assert_eq!(sample(42, RegionKey::new(-1, -1), &wide), expected);
    }

    #[test]
    fn test_edge_cells_within_bounding_box() {
        for radius in [1, 4, 9] {
            let disc = Disc::new(-3, 11, radius);
            let bbox = disc.bounding_box();
            assert_eq!(bbox.width(), (2 * radius + 1) as usize);
            assert!(disc.edge_cells().all(|(x, z)| bbox.contains_xz(x, z)));
            assert!(disc.is_edge(-3 + radius, 11) && disc.is_edge(-3, 11 - radius));
        }
    }

    #[test]
    fn test_region_zero_is_not_empty_with_full_occupancy() {
        let discs = sample(42, RegionKey::new(0, 0), &DensityPolicy::default());
        assert!(!discs.is_empty());
    }

    #[test]
    fn test_discs_stay_in_region_and_radius_range() {
        let policy = DensityPolicy::new(2, 5, 1, 1.0, 16).unwrap();
        for rx in -3..3 {
            for rz in -3..3 {
                let region = RegionKey::new(rx, rz);
                let bounds = region.bounds(16);
                for disc in sample(9, region, &policy) {
                    assert!(bounds.contains_xz(disc.x, disc.z));
                    assert!((2..=5).contains(&disc.radius));
                }
            }
        }
    }

    #[test]
    fn test_min_separation_holds_within_region() {
        let policy = DensityPolicy::new(1, 3, 0, 1.0, 64).unwrap();
        let discs = sample(1234, RegionKey::new(-1, 2), &policy);
        assert!(discs.len() > 10);
        assert_separated(&discs, &policy);
    }

    #[test]
    fn test_min_separation_holds_across_regions() {
        let policy = DensityPolicy::new(2, 6, 2, 1.0, 16).unwrap();
        let mut all = Vec::new();
        for rx in -2..2 {
            for rz in -2..2 {
                all.extend(sample(77, RegionKey::new(rx, rz), &policy));
            }
        }
        assert_separated(&all, &policy);
    }

    #[test]
    fn test_region_order_does_not_matter() {
        let policy = DensityPolicy::default();
        let target = RegionKey::new(1, 1);
        let direct = sample(5, target, &policy);
        for rx in -1..3 {
            let _ = sample(5, RegionKey::new(rx, 0), &policy);
        }
        assert_eq!(direct, sample(5, target, &policy));
    }

    #[test]
    fn test_zero_occupancy_yields_empty_set() {
        let policy = DensityPolicy::new(2, 8, 0, 0.0, 16).unwrap();
        assert!(sample(42, RegionKey::new(0, 0), &policy).is_empty());
    }

    #[test]
    fn test_partial_occupancy_is_subset_of_full() {
        let full = DensityPolicy::new(1, 2, 0, 1.0, 64).unwrap();
        let half = DensityPolicy::new(1, 2, 0, 0.5, 64).unwrap();
        let region = RegionKey::new(0, 0);
        let all = sample(3, region, &full);
        let some = sample(3, region, &half);
        assert!(some.len() < all.len());
        assert!(some.iter().all(|d| all.contains(d)));
    }

    #[test]
    fn test_policy_validation() {
        assert_eq!(
            DensityPolicy::new(0, 4, 0, 1.0, 16),
            Err(PolicyError::InvalidRadius { min: 0, max: 4 })
        );
        assert_eq!(
            DensityPolicy::new(5, 4, 0, 1.0, 16),
            Err(PolicyError::InvalidRadius { min: 5, max: 4 })
        );
        assert_eq!(
            DensityPolicy::new(2, 4, -1, 1.0, 16),
            Err(PolicyError::NegativeGap(-1))
        );
        assert_eq!(
            DensityPolicy::new(2, 4, 0, 1.5, 16),
            Err(PolicyError::InvalidOccupancy(1.5))
        );
        assert_eq!(
            DensityPolicy::new(2, 4, 0, 1.0, 0),
            Err(PolicyError::InvalidRegionSize(0))
        );
    }

    #[test]
    fn test_clamp_radius() {
        let policy = DensityPolicy::default();
        assert_eq!(policy.clamp_radius(0), 2);
        assert_eq!(policy.clamp_radius(5), 5);
        assert_eq!(policy.clamp_radius(40), 8);
    }

    #[test]
    fn test_region_containing_negative_columns() {
        assert_eq!(RegionKey::containing(-1, -16, 16), RegionKey::new(-1, -1));
        assert_eq!(RegionKey::containing(-17, 15, 16), RegionKey::new(-2, 0));
        assert_eq!(RegionKey::containing(16, 0, 16), RegionKey::new(1, 0));
    }

    #[test]
    fn test_edge_ring_is_closed_for_all_radii() {
        for r in 1..=16 {
            let disc = Disc::new(0, 0, r);
            let ring: Vec<_> = disc.edge_cells().collect();
            assert!(!ring.is_empty());
            for &(x, z) in &ring {
                let neighbours = ring
                    .iter()
                    .filter(|&&(ox, oz)| (ox, oz) != (x, z) && (ox - x).abs() <= 1 && (oz - z).abs() <= 1)
                    .count();
                assert!(neighbours >= 2, "Ring of radius {r} has a gap at ({x}, {z})");
            }
            for (x, z) in [(r, 0), (-r, 0), (0, r), (0, -r)] {
                assert!(disc.is_edge(x, z), "Axis point ({x}, {z}) missing at radius {r}");
            }
        }
    }

    #[test]
    fn test_edge_ring_is_single_width_on_axes() {
        let disc = Disc::new(10, -4, 6);
        assert!(disc.is_edge(16, -4));
        assert!(!disc.is_edge(15, -4));
        assert!(!disc.is_edge(17, -4));
        assert!(!disc.is_edge(10, -4));
    }

    #[test]
    fn test_radius_one_ring_surrounds_center() {
        let disc = Disc::new(0, 0, 1);
        assert_eq!(disc.edge_cells().count(), 8);
        assert!(!disc.is_edge(0, 0));
    }

    #[test]
    fn test_intersects() {
        let a = Disc::new(0, 0, 3);
        assert!(a.intersects(&Disc::new(5, 0, 3)));
        assert!(!a.intersects(&Disc::new(6, 0, 3)));
        assert!((a.distance_to(&Disc::new(3, 4, 1)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_provider_caches_and_matches_sample() {
        let provider = DiscProvider::new(42, DensityPolicy::default());
        let region = RegionKey::new(2, 2);
        let first = provider.discs(region);
        let second = provider.discs(region);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, sample(42, region, &DensityPolicy::default()).as_slice());
        assert_eq!(provider.cached_regions(), 1);

        provider.evict(region);
        assert_eq!(provider.cached_regions(), 0);
    }
}
