//! Demo binary: generates trees over a square of regions around the origin
//! and logs what happened at every candidate.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p sylvan-demo -- --seed 7 --region-radius 4`.

mod world_setup;

use std::collections::VecDeque;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use sylvan_config::{CliArgs, Config, default_config_dir};
use sylvan_worldgen::seed::{derive_coord_seed, hash_volume};
use sylvan_worldgen::{
    AsyncTreeGenerator, BiomeSampler, DensityPolicy, DiscProvider, GeneratorResult,
    HeightmapParams, HeightmapSampler, NoiseTerrain, PolicyError, RegionKey, RegionReport,
    RegionSource, RegionTask, TerrainLayout, TreeGenerator,
};
use tracing::{debug, error, info, warn};

use crate::world_setup::{SetupError, build_demo_world};

/// Give up on outstanding regions after this long.
const RUN_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("world setup failed: {0}")]
    Setup(#[from] SetupError),
    #[error("invalid density settings: {0}")]
    Density(#[from] PolicyError),
    #[error("failed to start worker threads: {0}")]
    Workers(#[from] std::io::Error),
    #[error("timed out with {0} regions outstanding")]
    Timeout(usize),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    sylvan_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn density_policy(config: &Config) -> Result<DensityPolicy, PolicyError> {
    let d = &config.density;
    DensityPolicy::new(d.min_radius, d.max_radius, d.gap, d.occupancy, d.region_size)
}

/// Regions within `radius` of the origin, nearest first.
fn regions_around_origin(radius: i32) -> VecDeque<RegionTask> {
    let radius = radius.max(0);
    let mut tasks: Vec<_> = (-radius..=radius)
        .flat_map(|z| (-radius..=radius).map(move |x| RegionKey::new(x, z)))
        .map(|region| RegionTask {
            region,
            priority: region.distance_squared(RegionKey::new(0, 0)),
        })
        .collect();
    tasks.sort_by_key(|t| (t.priority, t.region.z, t.region.x));
    tasks.into()
}

/// Combine per-region volume hashes into one value that does not depend on
/// the order regions arrive in.
fn world_digest(seed: u64, regions: impl IntoIterator<Item = (RegionKey, u64)>) -> u64 {
    regions.into_iter().fold(0, |digest, (region, hash)| {
        let spin = derive_coord_seed(seed, region.x, 0, region.z) % 64;
        digest ^ hash.rotate_left(spin as u32)
    })
}

fn run(config: &Config) -> Result<(), DemoError> {
    let seed = config.worldgen.seed;
    let policy = density_policy(config)?;
    let demo = build_demo_world()?;

    let layout = TerrainLayout {
        region_size: policy.region_size(),
        margin: policy.max_radius(),
        ..TerrainLayout::default()
    };
    let diagram = demo.biomes.diagram();
    let source: Arc<dyn RegionSource> = Arc::new(NoiseTerrain::new(
        Arc::new(demo.registry),
        Arc::new(demo.biomes.registry),
        HeightmapSampler::new(HeightmapParams {
            seed,
            base_height: config.worldgen.sea_level,
            ..HeightmapParams::default()
        }),
        BiomeSampler::new(seed, diagram),
        demo.blocks.stone,
        layout,
    ));

    let generator = Arc::new(TreeGenerator::new(
        DiscProvider::new(seed, policy),
        demo.palette,
        config.worldgen.debug,
    ));
    let table = Arc::new(demo.table);

    let pool = match config.demo.worker_threads {
        0 => AsyncTreeGenerator::with_defaults(generator, table, source)?,
        n => AsyncTreeGenerator::new(n, 64, 128, generator, table, source)?,
    };

    let mut queue = regions_around_origin(config.demo.region_radius);
    let expected = queue.len();
    info!(
        seed,
        regions = expected,
        debug = config.worldgen.debug,
        "Generating trees"
    );

    let start = Instant::now();
    let mut totals = RegionReport::new(RegionKey::new(0, 0), 0);
    let mut received = 0;
    let mut region_hashes = Vec::with_capacity(expected);

    while received < expected {
        while let Some(task) = queue.pop_front() {
            if let Err(task) = pool.submit(task) {
                queue.push_front(task);
                break;
            }
        }

        for generated in pool.drain_results() {
            debug!(
                report = %generated.report,
                time_us = generated.generation_time_us,
                "Region done"
            );
            totals.merge(&generated.report);
            region_hashes.push((generated.region, hash_volume(generated.world.volume())));
            received += 1;
        }

        if start.elapsed() > RUN_TIMEOUT {
            return Err(DemoError::Timeout(expected - received));
        }
        if received < expected {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    info!(
        regions = received,
        discs = totals.discs,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Tree generation complete"
    );
    for result in GeneratorResult::ALL {
        let count = totals.count(result);
        if count > 0 {
            info!(%result, color = %result.color(), count, "Outcome");
        }
    }
    if totals.generated() == 0 {
        warn!("No trees were generated; check the density and biome settings");
    }
    info!("World digest: {:016x}", world_digest(seed, region_hashes));
    Ok(())
}
