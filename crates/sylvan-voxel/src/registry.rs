//! Block registry: maps compact [`BlockState`] values to [`BlockDef`] metadata.
//!
//! The registry is built once during world setup. Air is always ID 0 so that
//! zero-initialized storage represents empty space.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored in every block cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState(pub u16);

impl BlockState {
    /// Empty space.
    pub const AIR: Self = Self(0);

    /// Returns `true` for [`BlockState::AIR`].
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// Descriptor for a block type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Unique name (e.g. "grass", "oak_log", "white_concrete").
    pub name: String,
    /// Whether the block counts as ground when searching a column.
    pub solid: bool,
    /// Whether growth may overwrite this block (air, grass tufts, snow layers).
    pub replaceable: bool,
}

impl BlockDef {
    /// A solid, non-replaceable block.
    pub fn solid(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            solid: true,
            replaceable: false,
        }
    }

    /// A non-solid block that growth may overwrite.
    pub fn replaceable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            solid: false,
            replaceable: true,
        }
    }
}

/// Errors that can occur during block registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A block with the same name has already been registered.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    /// All 65 535 user-defined slots have been consumed.
    #[error("block registry is full (max 65536 blocks)")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`BlockState`] → [`BlockDef`] with O(1) lookup by index and by name.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    /// Dense array where `index == BlockState.0`.
    blocks: Vec<BlockDef>,
    name_to_id: FxHashMap<String, BlockState>,
}

impl BlockRegistry {
    /// Creates a new registry with air pre-registered as ID 0.
    pub fn new() -> Self {
        let air = BlockDef {
            name: "air".to_string(),
            solid: false,
            replaceable: true,
        };

        let mut name_to_id = FxHashMap::default();
        name_to_id.insert(air.name.clone(), BlockState::AIR);

        Self {
            blocks: vec![air],
            name_to_id,
        }
    }

    /// Registers a new block and returns its assigned state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a block with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if all slots are used.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockState, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.blocks.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = BlockState(self.blocks.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.blocks.push(def);
        Ok(id)
    }

    /// Returns the existing state for `def.name`, registering it first if needed.
    pub fn get_or_register(&mut self, def: BlockDef) -> Result<BlockState, RegistryError> {
        match self.lookup_by_name(&def.name) {
            Some(id) => Ok(id),
            None => self.register(def),
        }
    }

    /// Returns the definition for a state, or `None` for unknown IDs.
    pub fn get(&self, id: BlockState) -> Option<&BlockDef> {
        self.blocks.get(id.0 as usize)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<BlockState> {
        self.name_to_id.get(name).copied()
    }

    /// Unknown IDs are treated as non-solid.
    pub fn is_solid(&self, id: BlockState) -> bool {
        self.get(id).is_some_and(|def| def.solid)
    }

    /// Unknown IDs are treated as replaceable, like air.
    pub fn is_replaceable(&self, id: BlockState) -> bool {
        self.get(id).is_none_or(|def| def.replaceable)
    }

    /// Returns the total number of registered blocks (including air).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() <= 1
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
