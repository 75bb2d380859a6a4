//! In-world debug markers for tree generation.
//!
//! When debug output is enabled the generator outlines every evaluated disc
//! with coloured concrete and stacks a marker of the outcome colour where a
//! tree was not grown. Markers are ordinary block writes clipped to the
//! region bounds.

use std::fmt;

use sylvan_voxel::{BlockDef, BlockPos, BlockRegistry, BlockState, PlacementFlags, RegionBounds, RegistryError};

use crate::poisson::Disc;
use crate::world::WorldAccessor;

/// The sixteen dye colours, with stable ids `0..16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DyeColor {
    White = 0,
    Orange = 1,
    Magenta = 2,
    LightBlue = 3,
    Yellow = 4,
    Lime = 5,
    Pink = 6,
    Gray = 7,
    LightGray = 8,
    Cyan = 9,
    Purple = 10,
    Blue = 11,
    Brown = 12,
    Green = 13,
    Red = 14,
    Black = 15,
}

impl DyeColor {
    pub const ALL: [DyeColor; 16] = [
        DyeColor::White,
        DyeColor::Orange,
        DyeColor::Magenta,
        DyeColor::LightBlue,
        DyeColor::Yellow,
        DyeColor::Lime,
        DyeColor::Pink,
        DyeColor::Gray,
        DyeColor::LightGray,
        DyeColor::Cyan,
        DyeColor::Purple,
        DyeColor::Blue,
        DyeColor::Brown,
        DyeColor::Green,
        DyeColor::Red,
        DyeColor::Black,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Colour for an id; only the low four bits are used.
    pub fn from_id(id: u8) -> Self {
        Self::ALL[(id & 0xF) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            DyeColor::White => "white",
            DyeColor::Orange => "orange",
            DyeColor::Magenta => "magenta",
            DyeColor::LightBlue => "light_blue",
            DyeColor::Yellow => "yellow",
            DyeColor::Lime => "lime",
            DyeColor::Pink => "pink",
            DyeColor::Gray => "gray",
            DyeColor::LightGray => "light_gray",
            DyeColor::Cyan => "cyan",
            DyeColor::Purple => "purple",
            DyeColor::Blue => "blue",
            DyeColor::Brown => "brown",
            DyeColor::Green => "green",
            DyeColor::Red => "red",
            DyeColor::Black => "black",
        }
    }
}

impl fmt::Display for DyeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One marker block per dye colour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerPalette {
    blocks: [BlockState; 16],
}

impl MarkerPalette {
    pub fn new(blocks: [BlockState; 16]) -> Self {
        Self { blocks }
    }

    /// Look up or register `"<color>_concrete"` for every colour.
    pub fn from_registry(registry: &mut BlockRegistry) -> Result<Self, RegistryError> {
        let mut blocks = [BlockState::AIR; 16];
        for color in DyeColor::ALL {
            let name = format!("{}_concrete", color.name());
            blocks[color.id() as usize] = registry.get_or_register(BlockDef::solid(name))?;
        }
        Ok(Self { blocks })
    }

    pub fn block(&self, color: DyeColor) -> BlockState {
        self.blocks[color.id() as usize]
    }

    /// Outline colour of `disc`, keyed by its center so neighbouring discs
    /// usually differ.
    pub fn ring_color(disc: &Disc) -> DyeColor {
        DyeColor::from_id(((disc.x ^ disc.z) & 0xF) as u8)
    }
}

/// Writes debug markers into the world.
pub trait DebugPainter: Send + Sync {
    /// Paint `marker` at `pos`. Returns whether the block was written.
    fn paint(
        &self,
        world: &mut dyn WorldAccessor,
        bounds: &RegionBounds,
        pos: BlockPos,
        marker: BlockState,
        flags: PlacementFlags,
    ) -> bool;
}

/// Paints only inside the bounds and silently skips everything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundedPainter;

impl DebugPainter for BoundedPainter {
    fn paint(
        &self,
        world: &mut dyn WorldAccessor,
        bounds: &RegionBounds,
        pos: BlockPos,
        marker: BlockState,
        flags: PlacementFlags,
    ) -> bool {
        if !bounds.contains(pos) {
            return false;
        }
        world.set_block_state(pos, marker, flags)
    }
}
