//! Dense in-memory block storage over a [`RegionBounds`] and a vertical range.
//!
//! Out-of-range reads return air and out-of-range writes are ignored with a
//! warning, so callers never panic on a stray coordinate.

use std::ops::BitOr;

use crate::bounds::RegionBounds;
use crate::pos::BlockPos;
use crate::registry::BlockState;

/// Flags passed along with a block write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlacementFlags(pub u8);

impl PlacementFlags {
    pub const NONE: Self = Self(0);
    /// Neighbouring blocks should be told about the change.
    pub const NOTIFY_NEIGHBORS: Self = Self(0b0000_0001);
    /// The change should be replicated to clients.
    pub const SEND_TO_CLIENTS: Self = Self(0b0000_0010);
    /// The change should not trigger a mesh rebuild.
    pub const NO_RERENDER: Self = Self(0b0000_0100);
    /// Flags used by ordinary block placement.
    pub const DEFAULT: Self = Self(Self::NOTIFY_NEIGHBORS.0 | Self::SEND_TO_CLIENTS.0);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PlacementFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A column-major block volume.
#[derive(Clone, Debug)]
pub struct VoxelVolume {
    bounds: RegionBounds,
    min_y: i32,
    height: usize,
    blocks: Vec<BlockState>,
    /// Union of the flags of every accepted write.
    dirty: PlacementFlags,
    /// Incremented on each accepted write.
    version: u64,
}

impl VoxelVolume {
    /// Creates a volume filled with air covering `bounds` and `min_y..min_y + height`.
    pub fn new(bounds: RegionBounds, min_y: i32, height: usize) -> Self {
        let len = bounds.width() * bounds.depth() * height;
        Self {
            bounds,
            min_y,
            height,
            blocks: vec![BlockState::AIR; len],
            dirty: PlacementFlags::NONE,
            version: 0,
        }
    }

    pub fn bounds(&self) -> RegionBounds {
        self.bounds
    }

    /// Inclusive lowest and exclusive highest stored y.
    pub fn height_range(&self) -> (i32, i32) {
        (self.min_y, self.min_y + self.height as i32)
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.bounds.contains(pos) && pos.y >= self.min_y && pos.y < self.min_y + self.height as i32
    }

    /// Returns the block at `pos`, or air when out of range.
    pub fn get(&self, pos: BlockPos) -> BlockState {
        match self.index(pos) {
            Some(i) => self.blocks[i],
            None => BlockState::AIR,
        }
    }

    /// Writes `state` at `pos`. Returns `false` (and logs) when out of range.
    pub fn set(&mut self, pos: BlockPos, state: BlockState, flags: PlacementFlags) -> bool {
        let Some(i) = self.index(pos) else {
            tracing::warn!("VoxelVolume::set out of bounds: {}", pos);
            return false;
        };
        self.blocks[i] = state;
        self.dirty = self.dirty | flags;
        self.version += 1;
        true
    }

    /// Fills the vertical span `[from_y, to_y)` of a column. Used by terrain fill,
    /// so it does not bump the version or dirty flags.
    pub fn fill_column(&mut self, x: i32, z: i32, from_y: i32, to_y: i32, state: BlockState) {
        for y in from_y.max(self.min_y)..to_y.min(self.min_y + self.height as i32) {
            if let Some(i) = self.index(BlockPos::new(x, y, z)) {
                self.blocks[i] = state;
            }
        }
    }

    /// Highest y in the column whose block is not air.
    pub fn top_non_air(&self, x: i32, z: i32) -> Option<i32> {
        let (lo, hi) = self.height_range();
        (lo..hi)
            .rev()
            .find(|&y| !self.get(BlockPos::new(x, y, z)).is_air())
    }

    /// Number of cells holding `state`.
    pub fn count(&self, state: BlockState) -> usize {
        self.blocks.iter().filter(|&&b| b == state).count()
    }

    pub fn dirty_flags(&self) -> PlacementFlags {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = PlacementFlags::NONE;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let lx = (pos.x - self.bounds.min_x) as usize;
        let lz = (pos.z - self.bounds.min_z) as usize;
        let ly = (pos.y - self.min_y) as usize;
        Some((lz * self.bounds.width() + lx) * self.height + ly)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
