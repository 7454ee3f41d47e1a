//! Arena: the bounded space and its fixed-capacity body store
//!
//! The arena is the only owner of the bodies. Phases borrow the store
//! mutably one at a time; renderers only ever receive copied views.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{ConfigError, SimConfig};
use crate::metrics::SimMetrics;
use crate::sim::body::{Body, CircleView};
use crate::sim::systems::collision::{self, CollisionOutcome};
use crate::sim::systems::motion;
use crate::sim::systems::population::{self, FreedSlots};
use crate::sim::SimError;

pub struct Arena {
    config: SimConfig,
    bodies: Vec<Body>,
    freed: FreedSlots,
    rng: StdRng,
    /// Bounded worker pool for the parallel phases
    pool: rayon::ThreadPool,
    metrics: Arc<SimMetrics>,
}

impl Arena {
    /// Validate `config` and spawn `config.capacity` random bodies
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = seeded_rng(config.seed);
        let bodies: Vec<Body> = (0..config.capacity)
            .map(|_| population::spawn_body(&mut rng, &config))
            .collect();

        info!(
            "Arena {}x{} populated with {} bodies (seed: {:?})",
            config.width, config.height, config.capacity, config.seed
        );

        Self::assemble(config, bodies, rng)
    }

    /// Build an arena from explicit bodies. Capacity becomes `bodies.len()`.
    pub fn with_bodies(mut config: SimConfig, bodies: Vec<Body>) -> Result<Self, SimError> {
        config.capacity = bodies.len();
        config.validate()?;

        for (index, body) in bodies.iter().enumerate() {
            if body.radius < config.min_radius || body.radius > config.max_radius {
                return Err(ConfigError::BodyRadiusOutOfBounds {
                    index,
                    radius: body.radius,
                    min: config.min_radius,
                    max: config.max_radius,
                }
                .into());
            }
        }

        let rng = seeded_rng(config.seed);
        Self::assemble(config, bodies, rng)
    }

    fn assemble(config: SimConfig, bodies: Vec<Body>, rng: StdRng) -> Result<Self, SimError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("arena-worker-{}", i))
            .build()?;
        debug!("Worker pool ready with {} threads", pool.current_num_threads());

        let metrics = Arc::new(SimMetrics::new());
        metrics
            .live_bodies
            .store(bodies.iter().filter(|b| b.alive).count() as u64, Ordering::Relaxed);

        Ok(Self {
            freed: FreedSlots::new(bodies.len()),
            config,
            bodies,
            rng,
            pool,
            metrics,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<SimMetrics> {
        &self.metrics
    }

    /// All slots, live or dead, in index order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to the slots. The store itself cannot grow or shrink.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn capacity(&self) -> usize {
        self.bodies.len()
    }

    pub fn live_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.alive).count()
    }

    /// Slots freed this tick and waiting for the recycle pass
    pub fn pending_recycles(&self) -> usize {
        self.freed.len()
    }

    /// Motion phase: advance all live bodies on the worker pool
    pub fn integrate(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        let bodies = &mut self.bodies;
        self.pool.install(|| motion::integrate(bodies, width, height));
    }

    /// Collision phase: broad phase on the worker pool, then serial apply
    pub fn resolve_collisions(&mut self) -> CollisionOutcome {
        let config = &self.config;
        let bodies = &mut self.bodies;
        let freed = &mut self.freed;
        let outcome = self
            .pool
            .install(|| collision::resolve_collisions(bodies, config, freed));

        SimMetrics::add(&self.metrics.collisions, outcome.contacts as u64);
        SimMetrics::add(&self.metrics.degenerate_pairs, outcome.degenerate as u64);
        SimMetrics::add(&self.metrics.growth_events, outcome.growths as u64);
        SimMetrics::add(&self.metrics.skipped_growths, outcome.skipped_growths as u64);
        outcome
    }

    /// Re-initialize every slot freed by growth events
    pub fn recycle_pending(&mut self) -> usize {
        let recycled =
            population::recycle_pending(&mut self.bodies, &mut self.freed, &self.config, &mut self.rng);
        SimMetrics::add(&self.metrics.recycles, recycled as u64);
        recycled
    }

    /// Draw fresh velocities for all live bodies
    pub fn reset_velocities(&mut self) -> usize {
        let reset = population::reset_velocities(&mut self.bodies, &self.config, &mut self.rng);
        SimMetrics::add(&self.metrics.velocity_resets, 1);
        debug!("Reset velocities of {} bodies", reset);
        reset
    }

    /// Copy the live bodies into `out`, in index order
    pub fn snapshot_into(&self, out: &mut Vec<CircleView>) {
        out.clear();
        out.extend(self.bodies.iter().filter(|b| b.alive).map(Body::view));
    }

    pub fn snapshot(&self) -> Vec<CircleView> {
        let mut out = Vec::with_capacity(self.bodies.len());
        self.snapshot_into(&mut out);
        out
    }

    /// Finish a tick's bookkeeping
    pub(crate) fn record_tick(&self) {
        self.metrics.ticks.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .live_bodies
            .store(self.live_count() as u64, Ordering::Relaxed);
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
