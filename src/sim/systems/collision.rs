//! Pairwise collision detection and resolution
//!
//! Runs in two passes. The broad phase fans the outer index out over the
//! worker pool and collects candidate pairs `(i, j)` with `i < j` in index
//! order; it only reads the store. The apply pass then walks the candidates
//! serially, so every pair's velocity exchange, counter updates, growth and
//! partner death happen as one critical section against the current state.
//! Candidates are gathered with the largest possible contact distance, so a
//! body that grows earlier in the pass still meets everything it now touches.

use rayon::prelude::*;
use tracing::debug;

use crate::config::SimConfig;
use crate::sim::body::Body;
use crate::sim::systems::population::FreedSlots;
use crate::util::vec2::Vec2;

/// What one resolution pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// Pairs in contact that exchanged velocities
    pub contacts: u32,
    /// Overlapping pairs skipped because their centers coincide
    pub degenerate: u32,
    /// Growth events (each one killed a partner)
    pub growths: u32,
    /// Growth events abandoned because the partner slot could not be claimed
    pub skipped_growths: u32,
}

/// Candidate pairs among live bodies whose centers are closer than `reach`.
///
/// Pairs come out ordered by `i`, then `j`, regardless of scheduling.
pub fn broad_phase(bodies: &[Body], reach: f32) -> Vec<(usize, usize)> {
    let reach_sq = reach * reach;
    let n = bodies.len();

    (0..n)
        .into_par_iter()
        .filter(|&i| bodies[i].alive)
        .flat_map_iter(|i| {
            let a = &bodies[i];
            ((i + 1)..n).filter_map(move |j| {
                let b = &bodies[j];
                (b.alive && a.position.distance_sq_to(b.position) < reach_sq).then_some((i, j))
            })
        })
        .collect()
}

/// Equal-mass elastic exchange along the contact normal.
///
/// Both velocities are rotated into the frame whose x-axis runs from `a` to
/// `b`, the normal components are swapped, and the result is rotated back.
/// Tangential components stay with their body. Returns `false` without
/// touching either body when the centers coincide.
pub fn exchange_velocities(a: &mut Body, b: &mut Body) -> bool {
    let Some(normal) = (b.position - a.position).normalized() else {
        return false;
    };

    let va = a.velocity.to_frame(normal);
    let vb = b.velocity.to_frame(normal);

    a.velocity = Vec2::new(vb.x, va.y).from_frame(normal);
    b.velocity = Vec2::new(va.x, vb.y).from_frame(normal);
    true
}

/// Resolve every contact among live bodies for this tick.
///
/// Consumed partners are marked dead and their slots queued in `freed`; they
/// are skipped by every later pair in the same pass.
pub fn resolve_collisions(
    bodies: &mut [Body],
    config: &SimConfig,
    freed: &mut FreedSlots,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let reach = 2.0 * config.max_radius as f32;

    for (i, j) in broad_phase(bodies, reach) {
        let (lo, hi) = bodies.split_at_mut(j);
        let (a, b) = (&mut lo[i], &mut hi[0]);

        if !a.alive || !b.alive || !a.overlaps(b) {
            continue;
        }
        if !exchange_velocities(a, b) {
            outcome.degenerate += 1;
            continue;
        }

        a.collision_count += 1;
        b.collision_count += 1;
        outcome.contacts += 1;

        apply_growth(a, i, b, j, config, freed, &mut outcome);
    }

    outcome
}

/// Grow one body of a colliding pair if it reached the threshold.
///
/// The lower index wins when both qualify; the higher index only grows when
/// the lower one is already at the radius cap.
fn apply_growth(
    a: &mut Body,
    i: usize,
    b: &mut Body,
    j: usize,
    config: &SimConfig,
    freed: &mut FreedSlots,
    outcome: &mut CollisionOutcome,
) {
    let ready = |body: &Body| {
        body.collision_count >= config.growth_threshold && body.radius < config.max_radius
    };

    let (grower, grower_index, victim, victim_index) = if ready(a) {
        (a, i, b, j)
    } else if ready(b) {
        (b, j, a, i)
    } else {
        return;
    };

    match freed.claim(victim_index) {
        Ok(()) => {
            grower.radius = grower.radius.saturating_add(config.growth_increment).min(config.max_radius);
            grower.collision_count = 0;
            victim.alive = false;
            outcome.growths += 1;
            debug!(
                "Body {} grew to radius {} consuming body {}",
                grower_index, grower.radius, victim_index
            );
        }
        Err(e) => {
            // Body keeps its pre-threshold state and may try again next contact
            outcome.skipped_growths += 1;
            debug!("Skipping growth of body {}: {}", grower_index, e);
        }
    }
}
