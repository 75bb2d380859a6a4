//! Background tree generation over a pool of worker threads.
//!
//! Each task builds one region's world, runs the tree pipeline on it, and
//! delivers the result through a bounded channel. Regions are independent,
//! so the output does not depend on thread count or completion order.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;

use crate::biome::BiomeDatabase;
use crate::generator::{RegionReport, TreeGenerator};
use crate::poisson::RegionKey;
use crate::terrain::RegionSource;
use crate::world::{RegionWorld, WorldContext};

/// A request to generate the trees of one region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionTask {
    pub region: RegionKey,
    /// Lower values are meant to go first, e.g. squared distance to the
    /// viewer. Informational; the queue is FIFO.
    pub priority: u64,
}

/// A region with its trees generated.
#[derive(Debug)]
pub struct GeneratedRegion {
    pub region: RegionKey,
    pub world: RegionWorld,
    pub report: RegionReport,
    pub generation_time_us: u64,
}

struct QueuedTask {
    task: RegionTask,
    cancelled: Arc<AtomicBool>,
}

/// Everything a worker needs, shared read-only.
#[derive(Clone)]
struct Shared {
    generator: Arc<TreeGenerator>,
    table: Arc<BiomeDatabase>,
    source: Arc<dyn RegionSource>,
}

pub struct AsyncTreeGenerator {
    task_sender: Sender<QueuedTask>,
    result_receiver: Receiver<GeneratedRegion>,
    active_tasks: Arc<DashMap<RegionKey, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl AsyncTreeGenerator {
    /// Spawn `thread_count` workers. At most `max_concurrent * 2` tasks queue
    /// up before [`submit`](Self::submit) starts rejecting; finished regions
    /// wait in a channel of `result_capacity`.
    pub fn new(
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
        generator: Arc<TreeGenerator>,
        table: Arc<BiomeDatabase>,
        source: Arc<dyn RegionSource>,
    ) -> io::Result<Self> {
        let (task_sender, task_receiver) = bounded::<QueuedTask>(max_concurrent * 2);
        let (result_sender, result_receiver) = bounded::<GeneratedRegion>(result_capacity);
        let in_flight = Arc::new(AtomicU64::new(0));
        let shared = Shared {
            generator,
            table,
            source,
        };

        for i in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let shared = shared.clone();

            std::thread::Builder::new()
                .name(format!("tree-gen-worker-{i}"))
                .spawn(move || {
                    while let Ok(queued) = receiver.recv() {
                        // Only queued tasks can be cancelled; started ones run to the end.
                        if queued.cancelled.load(Ordering::Relaxed) {
                            tracing::trace!(region = %queued.task.region, "Skipping cancelled region");
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let generated = generate_region_sync(
                            &shared.generator,
                            &shared.table,
                            shared.source.as_ref(),
                            queued.task.region,
                        );
                        let _ = sender.send(generated);
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        tracing::debug!(threads = thread_count.max(1), "Tree generation pool started");
        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Pool sized from the CPU count, leaving two cores for the caller.
    pub fn with_defaults(
        generator: Arc<TreeGenerator>,
        table: Arc<BiomeDatabase>,
        source: Arc<dyn RegionSource>,
    ) -> io::Result<Self> {
        let threads = num_cpus::get().saturating_sub(2).max(1);
        Self::new(threads, 64, 128, generator, table, source)
    }

    /// Queue a region. Returns the task back if the queue is full.
    pub fn submit(&self, task: RegionTask) -> Result<(), RegionTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(task.region, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(QueuedTask { task, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let task = e.into_inner().task;
                self.active_tasks.remove(&task.region);
                task
            })
    }

    /// Cancel a queued region. No effect once a worker has picked it up.
    pub fn cancel(&self, region: &RegionKey) {
        if let Some((_, cancelled)) = self.active_tasks.remove(region) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Collect every finished region without blocking.
    pub fn drain_results(&self) -> Vec<GeneratedRegion> {
        let mut results = Vec::new();
        while let Ok(region) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&region.region);
            results.push(region);
        }
        results
    }

    /// Tasks queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn is_pending(&self, region: &RegionKey) -> bool {
        self.active_tasks.contains_key(region)
    }
}

/// Build and populate one region on the calling thread.
pub fn generate_region_sync(
    generator: &TreeGenerator,
    table: &BiomeDatabase,
    source: &dyn RegionSource,
    region: RegionKey,
) -> GeneratedRegion {
    let start = Instant::now();
    let mut world = source.build(region);
    let bounds = world.bounds();
    let seed = generator.provider().world_seed();

    let report = {
        let mut ctx = WorldContext::new(&mut world, seed, bounds);
        generator.generate_region(&mut ctx, table, region)
    };
    generator.provider().evict(region);

    GeneratedRegion {
        region,
        world,
        report,
        generation_time_us: start.elapsed().as_micros() as u64,
    }
}
