//! The tree placement decision pipeline.
//!
//! For each candidate disc the generator asks the biome's rule table, in
//! order: is the biome handled, where is the ground, which species, is the
//! soil acceptable, does the chance roll pass, and finally does the tree
//! grow. The first stage that says no decides the [`GeneratorResult`].

use std::fmt;
use std::sync::Arc;

use sylvan_voxel::{BlockPos, PlacementFlags};

use crate::biome::BiomeDatabase;
use crate::debug_viz::{BoundedPainter, DebugPainter, DyeColor, MarkerPalette};
use crate::poisson::{Disc, DiscProvider, RegionKey};
use crate::seed::coord_rng;
use crate::species::{Chance, SpeciesSelection};
use crate::world::WorldContext;

/// Outcome of one placement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorResult {
    Generated,
    /// The species selector handled the position but chose no tree.
    NoTree,
    /// No entry, a blacklisted entry, or a selector that declined.
    UnhandledBiome,
    FailSoil,
    FailChance,
    FailGeneration,
    NoGround,
}

impl GeneratorResult {
    pub const ALL: [GeneratorResult; 7] = [
        GeneratorResult::Generated,
        GeneratorResult::NoTree,
        GeneratorResult::UnhandledBiome,
        GeneratorResult::FailSoil,
        GeneratorResult::FailChance,
        GeneratorResult::FailGeneration,
        GeneratorResult::NoGround,
    ];

    /// Marker colour shown by the debug visualizer.
    pub fn color(self) -> DyeColor {
        match self {
            GeneratorResult::Generated => DyeColor::White,
            GeneratorResult::NoTree => DyeColor::Black,
            GeneratorResult::UnhandledBiome => DyeColor::Yellow,
            GeneratorResult::FailSoil => DyeColor::Brown,
            GeneratorResult::FailChance => DyeColor::Blue,
            GeneratorResult::FailGeneration => DyeColor::Red,
            GeneratorResult::NoGround => DyeColor::Purple,
        }
    }

    pub fn is_success(self) -> bool {
        self == GeneratorResult::Generated
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GeneratorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorResult::Generated => "generated",
            GeneratorResult::NoTree => "no_tree",
            GeneratorResult::UnhandledBiome => "unhandled_biome",
            GeneratorResult::FailSoil => "fail_soil",
            GeneratorResult::FailChance => "fail_chance",
            GeneratorResult::FailGeneration => "fail_generation",
            GeneratorResult::NoGround => "no_ground",
        };
        f.write_str(name)
    }
}

/// Outcome tallies for one region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionReport {
    pub region: RegionKey,
    /// Number of candidate discs sampled for the region.
    pub discs: usize,
    counts: [usize; 7],
}

impl RegionReport {
    pub fn new(region: RegionKey, discs: usize) -> Self {
        Self {
            region,
            discs,
            counts: [0; 7],
        }
    }

    pub fn record(&mut self, result: GeneratorResult) {
        self.counts[result.index()] += 1;
    }

    pub fn count(&self, result: GeneratorResult) -> usize {
        self.counts[result.index()]
    }

    pub fn generated(&self) -> usize {
        self.count(GeneratorResult::Generated)
    }

    /// Total number of results; at least `discs`.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Non-zero tallies in [`GeneratorResult::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (GeneratorResult, usize)> + '_ {
        GeneratorResult::ALL
            .into_iter()
            .map(move |r| (r, self.count(r)))
            .filter(|&(_, n)| n > 0)
    }

    /// Add another report's tallies to this one.
    pub fn merge(&mut self, other: &RegionReport) {
        self.discs += other.discs;
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
    }
}

impl fmt::Display for RegionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} discs", self.region, self.discs)?;
        for (result, n) in self.iter() {
            write!(f, ", {result}={n}")?;
        }
        Ok(())
    }
}

/// Places trees on sampled discs according to a [`BiomeDatabase`].
///
/// Holds no per-call state; one generator is shared by all workers.
pub struct TreeGenerator {
    provider: DiscProvider,
    palette: MarkerPalette,
    painter: Arc<dyn DebugPainter>,
    debug: bool,
}

impl TreeGenerator {
    pub fn new(provider: DiscProvider, palette: MarkerPalette, debug: bool) -> Self {
        Self {
            provider,
            palette,
            painter: Arc::new(BoundedPainter),
            debug,
        }
    }

    /// Replace the painter used for debug markers.
    pub fn with_painter(mut self, painter: impl DebugPainter + 'static) -> Self {
        self.painter = Arc::new(painter);
        self
    }

    pub fn provider(&self) -> &DiscProvider {
        &self.provider
    }

    pub fn palette(&self) -> &MarkerPalette {
        &self.palette
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Run the decision chain for a single ground position.
    pub fn evaluate(
        &self,
        ctx: &mut WorldContext<'_>,
        table: &BiomeDatabase,
        disc: &Disc,
        ground: BlockPos,
    ) -> GeneratorResult {
        let result = self.decide(ctx, table, disc, ground);
        if self.debug {
            self.paint_markers(ctx, disc, ground, result);
        }
        result
    }

    /// Find the ground under `disc` and evaluate every candidate height.
    ///
    /// Never returns an empty vec.
    pub fn generate_at(
        &self,
        ctx: &mut WorldContext<'_>,
        table: &BiomeDatabase,
        disc: &Disc,
    ) -> Vec<GeneratorResult> {
        let column = disc.center(0);
        let biome = ctx.access.biome(column);

        let results = match table.handled_entry(biome) {
            None => vec![GeneratorResult::UnhandledBiome],
            Some(entry) => {
                let heights = entry.ground().find(&*ctx.access, column);
                if heights.is_empty() {
                    vec![GeneratorResult::NoGround]
                } else {
                    heights
                        .into_iter()
                        .map(|y| self.evaluate(ctx, table, disc, column.with_y(y)))
                        .collect()
                }
            }
        };

        tracing::trace!(
            x = disc.x,
            z = disc.z,
            radius = disc.radius,
            %biome,
            ?results,
            "Tree candidate evaluated"
        );
        results
    }

    /// Evaluate every disc sampled for `region`.
    pub fn generate_region(
        &self,
        ctx: &mut WorldContext<'_>,
        table: &BiomeDatabase,
        region: RegionKey,
    ) -> RegionReport {
        let discs = self.provider.discs(region);
        let mut report = RegionReport::new(region, discs.len());
        for disc in discs.iter() {
            for result in self.generate_at(ctx, table, disc) {
                report.record(result);
            }
        }
        tracing::debug!(%report, "Region trees generated");
        report
    }

    fn decide(
        &self,
        ctx: &mut WorldContext<'_>,
        table: &BiomeDatabase,
        disc: &Disc,
        ground: BlockPos,
    ) -> GeneratorResult {
        let biome = ctx.access.biome(ground);
        let Some(entry) = table.handled_entry(biome) else {
            return GeneratorResult::UnhandledBiome;
        };

        // One stream per ground position, shared by every stage below.
        let mut rng = coord_rng(ctx.world_seed, ground);
        let ground_state = ctx.access.block_state(ground);

        let species = match entry.species().select(ground, ground_state, &mut rng) {
            SpeciesSelection::Unhandled => return GeneratorResult::UnhandledBiome,
            SpeciesSelection::Handled(None) => return GeneratorResult::NoTree,
            SpeciesSelection::Handled(Some(species)) => species,
        };

        if !entry
            .soil()
            .is_acceptable(&*ctx.access, ground, ground_state, &species)
        {
            return GeneratorResult::FailSoil;
        }

        match entry.chance().roll(&mut rng, &species, disc.radius) {
            Chance::Ok => {}
            Chance::Fail | Chance::Unhandled => return GeneratorResult::FailChance,
        }

        if species.grow(ctx, ground, biome, &mut rng, disc.radius) {
            GeneratorResult::Generated
        } else {
            GeneratorResult::FailGeneration
        }
    }

    fn paint_markers(
        &self,
        ctx: &mut WorldContext<'_>,
        disc: &Disc,
        ground: BlockPos,
        result: GeneratorResult,
    ) {
        let flags = PlacementFlags::SEND_TO_CLIENTS;
        let ring = self.palette.block(MarkerPalette::ring_color(disc));
        for (x, z) in disc.edge_cells() {
            self.painter.paint(
                &mut *ctx.access,
                &ctx.bounds,
                BlockPos::new(x, ground.y, z),
                ring,
                flags,
            );
        }

        if result != GeneratorResult::Generated {
            let marker = self.palette.block(result.color());
            for pos in [ground, ground.above()] {
                self.painter
                    .paint(&mut *ctx.access, &ctx.bounds, pos, marker, flags);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeEntry, BiomeId};
    use crate::poisson::DensityPolicy;
    use crate::selectors::{
        ChanceSelector, GroundFinder, SoilValidator, SpeciesSelector, StaticSpecies,
    };
    use crate::seed::CoordRng;
    use crate::species::{GrowthRoutine, Species};
    use crate::world::{RegionWorld, WorldAccessor};
    use hashbrown::HashSet;
    use rand::RngCore;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use sylvan_voxel::{BlockDef, BlockRegistry, BlockState, RegionBounds};

    const FOREST: BiomeId = BiomeId(1);

    // -----------------------------------------------------------------------
    // Instrumented collaborators
    // -----------------------------------------------------------------------

    /// Call log shared by all instrumented collaborators of one test.
    #[derive(Default)]
    struct Calls {
        order: Mutex<Vec<&'static str>>,
        grow: AtomicUsize,
    }

    impl Calls {
        fn hit(&self, stage: &'static str) {
            self.order.lock().unwrap().push(stage);
        }

        fn stages(&self) -> Vec<&'static str> {
            self.order.lock().unwrap().clone()
        }
    }

    struct Ground(Arc<Calls>, Vec<i32>);

    impl GroundFinder for Ground {
        fn find(&self, _world: &dyn WorldAccessor, _column: BlockPos) -> Vec<i32> {
            self.0.hit("ground");
            self.1.clone()
        }
    }

    struct Select(Arc<Calls>, SpeciesSelection);

    impl SpeciesSelector for Select {
        fn select(&self, _pos: BlockPos, _g: BlockState, _rng: &mut CoordRng) -> SpeciesSelection {
            self.0.hit("species");
            self.1.clone()
        }
    }

    struct Soil(Arc<Calls>, bool);

    impl SoilValidator for Soil {
        fn is_acceptable(
            &self,
            _world: &dyn WorldAccessor,
            _pos: BlockPos,
            _ground: BlockState,
            _species: &Species,
        ) -> bool {
            self.0.hit("soil");
            self.1
        }
    }

    struct Roll(Arc<Calls>, Chance);

    impl ChanceSelector for Roll {
        fn roll(&self, _rng: &mut CoordRng, _species: &Species, _radius: i32) -> Chance {
            self.0.hit("chance");
            self.1
        }
    }

    struct Grow(Arc<Calls>, bool);

    impl GrowthRoutine for Grow {
        fn grow(
            &self,
            _ctx: &mut WorldContext<'_>,
            _ground: BlockPos,
            _biome: BiomeId,
            _rng: &mut CoordRng,
            _radius: i32,
        ) -> bool {
            self.0.hit("grow");
            self.0.grow.fetch_add(1, Ordering::SeqCst);
            self.1
        }
    }

    /// Records the first draw of every stage's random stream.
    struct DrawRecorder(Arc<Mutex<Vec<u64>>>, Arc<Species>);

    impl SpeciesSelector for DrawRecorder {
        fn select(&self, _pos: BlockPos, _g: BlockState, rng: &mut CoordRng) -> SpeciesSelection {
            self.0.lock().unwrap().push(rng.next_u64());
            SpeciesSelection::species(Arc::clone(&self.1))
        }
    }

    impl ChanceSelector for DrawRecorder {
        fn roll(&self, rng: &mut CoordRng, _species: &Species, _radius: i32) -> Chance {
            self.0.lock().unwrap().push(rng.next_u64());
            Chance::Ok
        }
    }

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    struct Fixture {
        world: RegionWorld,
        palette: MarkerPalette,
        stone: BlockState,
    }

    fn fixture() -> Fixture {
        let mut registry = BlockRegistry::new();
        let stone = registry.register(BlockDef::solid("stone")).unwrap();
        let palette = MarkerPalette::from_registry(&mut registry).unwrap();
        let bounds = RegionBounds::for_region(0, 0, 16, 0);
        let mut world = RegionWorld::new(Arc::new(registry), bounds, 0, 96, FOREST);
        for (x, z) in bounds.columns() {
            world.volume_mut().fill_column(x, z, 0, 65, stone);
        }
        Fixture {
            world,
            palette,
            stone,
        }
    }

    fn generator(palette: &MarkerPalette, debug: bool) -> TreeGenerator {
        let provider = DiscProvider::new(42, DensityPolicy::default());
        TreeGenerator::new(provider, palette.clone(), debug)
    }

    fn species(calls: &Arc<Calls>, grows: bool) -> Arc<Species> {
        Species::new("oak", Arc::new(Grow(Arc::clone(calls), grows)))
    }

    fn instrumented(
        calls: &Arc<Calls>,
        heights: Vec<i32>,
        selection: SpeciesSelection,
        soil: bool,
        chance: Chance,
    ) -> BiomeDatabase {
        let mut table = BiomeDatabase::new();
        table
            .register(
                FOREST,
                BiomeEntry::builder()
                    .ground(Ground(Arc::clone(calls), heights))
                    .species(Select(Arc::clone(calls), selection))
                    .soil(Soil(Arc::clone(calls), soil))
                    .chance(Roll(Arc::clone(calls), chance))
                    .build(),
            )
            .unwrap();
        table
    }

    fn run_at(fx: &mut Fixture, table: &BiomeDatabase, debug: bool, disc: Disc) -> Vec<GeneratorResult> {
        let generator = generator(&fx.palette, debug);
        let bounds = fx.world.bounds();
        let mut ctx = WorldContext::new(&mut fx.world, 42, bounds);
        generator.generate_at(&mut ctx, table, &disc)
    }

    // -----------------------------------------------------------------------
    // Stage ordering
    // -----------------------------------------------------------------------

    #[test]
    fn test_full_chain_visits_every_stage_in_order() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, true);
        let table = instrumented(&calls, vec![64], SpeciesSelection::species(oak), true, Chance::Ok);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::Generated]);
        assert_eq!(calls.stages(), ["ground", "species", "soil", "chance", "grow"]);
    }

    #[test]
    fn test_no_tree_stops_after_species() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let table = instrumented(&calls, vec![64], SpeciesSelection::empty(), true, Chance::Ok);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::NoTree]);
        assert_eq!(calls.stages(), ["ground", "species"]);
    }

    #[test]
    fn test_unhandled_species_is_unhandled_biome() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let table = instrumented(&calls, vec![64], SpeciesSelection::Unhandled, true, Chance::Ok);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::UnhandledBiome]);
        assert_eq!(calls.stages(), ["ground", "species"]);
    }

    #[test]
    fn test_soil_rejection_stops_before_chance() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, true);
        let table = instrumented(&calls, vec![64], SpeciesSelection::species(oak), false, Chance::Ok);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::FailSoil]);
        assert_eq!(calls.stages(), ["ground", "species", "soil"]);
    }

    #[test]
    fn test_chance_failure_never_grows() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, true);
        let table = instrumented(&calls, vec![64], SpeciesSelection::species(oak), true, Chance::Fail);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::FailChance]);
        assert_eq!(calls.grow.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unhandled_chance_counts_as_failure() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, true);
        let table = instrumented(
            &calls,
            vec![64],
            SpeciesSelection::species(oak),
            true,
            Chance::Unhandled,
        );

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::FailChance]);
        assert_eq!(calls.grow.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_growth_failure_reported() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, false);
        let table = instrumented(&calls, vec![64], SpeciesSelection::species(oak), true, Chance::Ok);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::FailGeneration]);
    }

    // -----------------------------------------------------------------------
    // Biome and ground contracts
    // -----------------------------------------------------------------------

    #[test]
    fn test_missing_entry_consults_nothing() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let mut table = instrumented(&calls, vec![64], SpeciesSelection::empty(), true, Chance::Ok);
        fx.world.fill_biome(BiomeId(7));

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::UnhandledBiome]);
        assert!(calls.stages().is_empty());

        fx.world.fill_biome(FOREST);
        table.blacklist(FOREST);
        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::UnhandledBiome]);
        assert!(calls.stages().is_empty(), "blacklisted biome must not reach the ground finder");
    }

    #[test]
    fn test_no_ground_yields_single_result() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, true);
        let table = instrumented(&calls, vec![], SpeciesSelection::species(oak), true, Chance::Ok);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::NoGround]);
        assert_eq!(calls.stages(), ["ground"]);
    }

    #[test]
    fn test_one_result_per_ground_height() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let table = instrumented(&calls, vec![64, 30, 12], SpeciesSelection::empty(), true, Chance::Ok);

        let results = run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| *r == GeneratorResult::NoTree));
    }

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------

    #[test]
    fn test_collaborator_draws_repeat() {
        let oak = species(&Arc::new(Calls::default()), true);
        let draws = Arc::new(Mutex::new(Vec::new()));
        let mut table = BiomeDatabase::new();
        table
            .register(
                FOREST,
                BiomeEntry::builder()
                    .species(DrawRecorder(Arc::clone(&draws), Arc::clone(&oak)))
                    .chance(DrawRecorder(Arc::clone(&draws), oak))
                    .build(),
            )
            .unwrap();

        let disc = Disc::new(8, 8, 3);
        let mut fx = fixture();
        run_at(&mut fx, &table, false, disc);
        let first = draws.lock().unwrap().split_off(0);
        let mut fx = fixture();
        run_at(&mut fx, &table, false, disc);
        let second = draws.lock().unwrap().clone();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_ne!(first[0], first[1], "chance must continue the species stream");
    }

    // -----------------------------------------------------------------------
    // Debug painting
    // -----------------------------------------------------------------------

    #[test]
    fn test_debug_off_writes_nothing() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let table = instrumented(&calls, vec![64], SpeciesSelection::empty(), true, Chance::Ok);

        run_at(&mut fx, &table, false, Disc::new(8, 8, 3));
        assert_eq!(fx.world.volume().version(), 0);
    }

    #[test]
    fn test_debug_marks_failures_with_result_color() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let table = instrumented(&calls, vec![64], SpeciesSelection::empty(), true, Chance::Ok);

        let results = run_at(&mut fx, &table, true, Disc::new(8, 8, 3));
        assert_eq!(results, vec![GeneratorResult::NoTree]);

        let black = fx.palette.block(DyeColor::Black);
        assert_eq!(fx.world.block_state(BlockPos::new(8, 64, 8)), black);
        assert_eq!(fx.world.block_state(BlockPos::new(8, 65, 8)), black);

        assert_eq!(fx.world.block_state(BlockPos::new(9, 64, 8)), fx.stone);
    }

    #[test]
    fn test_debug_ring_has_one_color_per_disc() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let table = instrumented(&calls, vec![64], SpeciesSelection::empty(), true, Chance::Ok);
        let disc = Disc::new(8, 7, 5);

        run_at(&mut fx, &table, true, disc);

        // 8 ^ 7 = 15
        let expected = fx.palette.block(DyeColor::Black);
        assert_eq!(fx.palette.block(MarkerPalette::ring_color(&disc)), expected);
        let colors: HashSet<_> = disc
            .edge_cells()
            .map(|(x, z)| fx.world.block_state(BlockPos::new(x, 64, z)))
            .collect();
        assert_eq!(colors.len(), 1, "ring painted in {colors:?}");
        assert!(colors.contains(&expected));
    }

    #[test]
    fn test_debug_ring_clipped_to_bounds() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let table = instrumented(&calls, vec![64], SpeciesSelection::empty(), true, Chance::Ok);
        let disc = Disc::new(1, 8, 4);

        let generator = generator(&fx.palette, true);
        let bounds = RegionBounds::new((0, 0), (15, 15));
        let mut ctx = WorldContext::new(&mut fx.world, 42, bounds.shrink(1));
        generator.generate_at(&mut ctx, &table, &disc);

        let written: Vec<_> = disc
            .edge_cells()
            .filter(|&(x, z)| {
                fx.world.block_state(BlockPos::new(x, 64, z)) != fx.stone
            })
            .collect();
        assert!(!written.is_empty());
        assert!(written.iter().all(|&(x, z)| bounds.shrink(1).contains_xz(x, z)));
        assert!(disc.is_edge(0, 12));
        assert_eq!(fx.world.block_state(BlockPos::new(0, 64, 12)), fx.stone);
    }

    #[test]
    fn test_debug_generated_has_no_marker() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, true);
        let table = instrumented(&calls, vec![64], SpeciesSelection::species(oak), true, Chance::Ok);

        run_at(&mut fx, &table, true, Disc::new(8, 8, 3));
        assert_eq!(fx.world.block_state(BlockPos::new(8, 64, 8)), fx.stone);
        assert!(fx.world.block_state(BlockPos::new(8, 65, 8)).is_air());
    }

    // -----------------------------------------------------------------------
    // Region driver and reports
    // -----------------------------------------------------------------------

    #[test]
    fn test_generate_region_tallies_every_disc() {
        let mut fx = fixture();
        let calls = Arc::new(Calls::default());
        let oak = species(&calls, true);
        let mut table = BiomeDatabase::new();
        table
            .register(FOREST, BiomeEntry::builder().species(StaticSpecies(oak)).build())
            .unwrap();

        let generator = generator(&fx.palette, false);
        let bounds = fx.world.bounds();
        let mut ctx = WorldContext::new(&mut fx.world, 42, bounds);
        let report = generator.generate_region(&mut ctx, &table, RegionKey::new(0, 0));

        assert!(report.discs > 0);
        assert_eq!(report.total(), report.discs, "surface finder yields one height");
        assert_eq!(report.generated(), report.discs);
        assert_eq!(generator.provider().cached_regions(), 1);
    }

    #[test]
    fn test_report_display_and_merge() {
        let mut a = RegionReport::new(RegionKey::new(0, 0), 2);
        a.record(GeneratorResult::Generated);
        a.record(GeneratorResult::NoGround);
        let mut b = RegionReport::new(RegionKey::new(1, 0), 1);
        b.record(GeneratorResult::Generated);

        a.merge(&b);
        assert_eq!(a.discs, 3);
        assert_eq!(a.generated(), 2);
        assert_eq!(a.to_string(), "region[0, 0]: 3 discs, generated=2, no_ground=1");
    }

    #[test]
    fn test_result_colors_are_distinct() {
        let mut colors: Vec<_> = GeneratorResult::ALL.iter().map(|r| r.color()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), GeneratorResult::ALL.len());
        assert_eq!(GeneratorResult::FailChance.color(), DyeColor::Blue);
        assert!(GeneratorResult::Generated.is_success());
    }
}
