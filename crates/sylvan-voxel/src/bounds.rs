//! Horizontal write bounds for a region being generated.
//!
//! A generator owns exclusive write access to one region plus a margin around
//! it. Writes outside the bounds belong to some other region's pass and must
//! be skipped rather than performed.

use crate::pos::BlockPos;

/// An inclusive axis-aligned box in the xz plane. Height is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionBounds {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
}

impl RegionBounds {
    /// Creates bounds from two inclusive corners in any order.
    pub fn new(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            min_z: a.1.min(b.1),
            max_x: a.0.max(b.0),
            max_z: a.1.max(b.1),
        }
    }

    /// Bounds of region `(region_x, region_z)` of side `size`, grown by `margin`
    /// blocks on every side.
    pub fn for_region(region_x: i32, region_z: i32, size: i32, margin: i32) -> Self {
        let min_x = region_x * size - margin;
        let min_z = region_z * size - margin;
        Self {
            min_x,
            min_z,
            max_x: min_x + size - 1 + 2 * margin,
            max_z: min_z + size - 1 + 2 * margin,
        }
    }

    /// Bounds that accept every position.
    pub fn unbounded() -> Self {
        Self {
            min_x: i32::MIN,
            min_z: i32::MIN,
            max_x: i32::MAX,
            max_z: i32::MAX,
        }
    }

    pub fn contains_xz(&self, x: i32, z: i32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.contains_xz(pos.x, pos.z)
    }

    /// Returns `true` if the square of half-extent `radius` around `(x, z)`
    /// lies entirely inside.
    pub fn contains_square(&self, x: i32, z: i32, radius: i32) -> bool {
        self.contains_xz(x - radius, z - radius) && self.contains_xz(x + radius, z + radius)
    }

    /// Number of columns along x.
    pub fn width(&self) -> usize {
        (self.max_x as i64 - self.min_x as i64 + 1) as usize
    }

    /// Number of columns along z.
    pub fn depth(&self) -> usize {
        (self.max_z as i64 - self.min_z as i64 + 1) as usize
    }

    /// Shrinks the bounds by `margin` on every side.
    pub fn shrink(&self, margin: i32) -> Self {
        Self {
            min_x: self.min_x + margin,
            min_z: self.min_z + margin,
            max_x: self.max_x - margin,
            max_z: self.max_z - margin,
        }
    }

    /// Iterates all `(x, z)` columns, z-major.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.min_z..=self.max_z).flat_map(move |z| (self.min_x..=self.max_x).map(move |x| (x, z)))
    }
}
