//! Per-biome tree rules.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use super::registry::{BiomeId, BiomeRegistry};
use crate::poisson::PolicyError;
use crate::selectors::{
    AlwaysChance, AnySoil, ChanceSelector, GroundFinder, SoilValidator, SpeciesSelector,
    SurfaceGroundFinder, UnhandledSpecies,
};

/// Errors raised while building a [`BiomeDatabase`].
#[derive(Debug, thiserror::Error)]
pub enum BiomeTableError {
    #[error("biome {0} already has an entry")]
    DuplicateEntry(BiomeId),
    #[error("unknown biome '{0}'")]
    UnknownBiome(String),
    #[error("invalid density policy: {0}")]
    Policy(#[from] PolicyError),
}

/// The collaborators consulted for one biome.
#[derive(Clone)]
pub struct BiomeEntry {
    blacklisted: bool,
    species: Arc<dyn SpeciesSelector>,
    chance: Arc<dyn ChanceSelector>,
    soil: Arc<dyn SoilValidator>,
    ground: Arc<dyn GroundFinder>,
}

impl BiomeEntry {
    pub fn builder() -> BiomeEntryBuilder {
        BiomeEntryBuilder::default()
    }

    /// An entry that stops generation in its biome.
    pub fn blacklisted() -> Self {
        Self::builder().blacklisted(true).build()
    }

    pub fn is_blacklisted(&self) -> bool {
        self.blacklisted
    }

    pub fn species(&self) -> &dyn SpeciesSelector {
        self.species.as_ref()
    }

    pub fn chance(&self) -> &dyn ChanceSelector {
        self.chance.as_ref()
    }

    pub fn soil(&self) -> &dyn SoilValidator {
        self.soil.as_ref()
    }

    pub fn ground(&self) -> &dyn GroundFinder {
        self.ground.as_ref()
    }
}

impl fmt::Debug for BiomeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiomeEntry")
            .field("blacklisted", &self.blacklisted)
            .finish_non_exhaustive()
    }
}

/// Builder for [`BiomeEntry`]. Unset collaborators fall back to
/// [`UnhandledSpecies`], [`AlwaysChance`], [`AnySoil`] and
/// [`SurfaceGroundFinder`].
#[derive(Default)]
pub struct BiomeEntryBuilder {
    blacklisted: bool,
    species: Option<Arc<dyn SpeciesSelector>>,
    chance: Option<Arc<dyn ChanceSelector>>,
    soil: Option<Arc<dyn SoilValidator>>,
    ground: Option<Arc<dyn GroundFinder>>,
}

impl BiomeEntryBuilder {
    pub fn blacklisted(mut self, blacklisted: bool) -> Self {
        self.blacklisted = blacklisted;
        self
    }

    pub fn species(mut self, selector: impl SpeciesSelector + 'static) -> Self {
        self.species = Some(Arc::new(selector));
        self
    }

    pub fn chance(mut self, selector: impl ChanceSelector + 'static) -> Self {
        self.chance = Some(Arc::new(selector));
        self
    }

    pub fn soil(mut self, validator: impl SoilValidator + 'static) -> Self {
        self.soil = Some(Arc::new(validator));
        self
    }

    pub fn ground(mut self, finder: impl GroundFinder + 'static) -> Self {
        self.ground = Some(Arc::new(finder));
        self
    }

    /// Use an already shared ground finder.
    pub fn shared_ground(mut self, finder: Arc<dyn GroundFinder>) -> Self {
        self.ground = Some(finder);
        self
    }

    pub fn build(self) -> BiomeEntry {
        BiomeEntry {
            blacklisted: self.blacklisted,
            species: self.species.unwrap_or_else(|| Arc::new(UnhandledSpecies)),
            chance: self.chance.unwrap_or_else(|| Arc::new(AlwaysChance)),
            soil: self.soil.unwrap_or_else(|| Arc::new(AnySoil)),
            ground: self.ground.unwrap_or_else(|| Arc::new(SurfaceGroundFinder)),
        }
    }
}

/// Maps biomes to their [`BiomeEntry`].
///
/// Built once at startup, then shared read-only between workers.
#[derive(Debug, Default)]
pub struct BiomeDatabase {
    entries: HashMap<BiomeId, BiomeEntry>,
}

impl BiomeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the entry for `biome`. Fails if one is already present.
    pub fn register(&mut self, biome: BiomeId, entry: BiomeEntry) -> Result<(), BiomeTableError> {
        if self.entries.contains_key(&biome) {
            return Err(BiomeTableError::DuplicateEntry(biome));
        }
        self.entries.insert(biome, entry);
        Ok(())
    }

    /// Register by biome name.
    pub fn register_named(
        &mut self,
        biomes: &BiomeRegistry,
        name: &str,
        entry: BiomeEntry,
    ) -> Result<BiomeId, BiomeTableError> {
        let id = biomes
            .lookup_by_name(name)
            .ok_or_else(|| BiomeTableError::UnknownBiome(name.to_string()))?;
        self.register(id, entry)?;
        Ok(id)
    }

    /// Set or replace the entry for `biome`, returning the old one.
    pub fn replace(&mut self, biome: BiomeId, entry: BiomeEntry) -> Option<BiomeEntry> {
        self.entries.insert(biome, entry)
    }

    /// Mark `biome` as excluded from generation, keeping its collaborators.
    pub fn blacklist(&mut self, biome: BiomeId) {
        self.entries
            .entry(biome)
            .or_insert_with(BiomeEntry::blacklisted)
            .blacklisted = true;
    }

    pub fn entry(&self, biome: BiomeId) -> Option<&BiomeEntry> {
        self.entries.get(&biome)
    }

    /// The entry for `biome` if it exists and is not blacklisted.
    pub fn handled_entry(&self, biome: BiomeId) -> Option<&BiomeEntry> {
        self.entry(biome).filter(|entry| !entry.is_blacklisted())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
