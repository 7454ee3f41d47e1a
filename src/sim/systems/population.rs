//! Population management: spawning, slot recycling and velocity resets
//!
//! The population never changes size. A body consumed by a growth event has
//! its slot queued here, and the recycle pass re-initializes it in place with
//! the same randomization used at start-up.

use bitvec::prelude::*;
use rand::Rng;
use smallvec::SmallVec;

use crate::config::SimConfig;
use crate::sim::body::{Body, Rgba};
use crate::util::vec2::Vec2;

/// A freed slot could not be claimed for recycling
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("slot {index} is not available for recycling")]
    SlotUnavailable { index: usize },
}

/// Slots freed by growth events, waiting for the recycle pass.
///
/// Each slot can be queued at most once; the bit set guards against a body
/// being consumed twice before it is re-initialized.
#[derive(Debug, Clone)]
pub struct FreedSlots {
    pending: BitVec,
    order: SmallVec<[usize; 8]>,
}

impl FreedSlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: bitvec![0; capacity],
            order: SmallVec::new(),
        }
    }

    /// Queue `index` for recycling
    pub fn claim(&mut self, index: usize) -> Result<(), SlotError> {
        if index >= self.pending.len() || self.is_pending(index) {
            return Err(SlotError::SlotUnavailable { index });
        }
        self.pending.set(index, true);
        self.order.push(index);
        Ok(())
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.get(index).map(|bit| *bit).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Take all queued slots in the order they were freed
    pub fn take(&mut self) -> SmallVec<[usize; 8]> {
        let order = std::mem::take(&mut self.order);
        for &index in &order {
            self.pending.set(index, false);
        }
        order
    }
}

/// Random per-axis velocity within `[-max_speed, max_speed]`
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, max_speed: f32) -> Vec2 {
    Vec2::new(
        rng.gen_range(-max_speed..=max_speed),
        rng.gen_range(-max_speed..=max_speed),
    )
}

/// Random position keeping a body of `radius` clear of every wall
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, config: &SimConfig, radius: i32) -> Vec2 {
    let r = radius as f32;
    Vec2::new(
        rng.gen_range(r..config.width - r),
        rng.gen_range(r..config.height - r),
    )
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgba {
    Rgba::opaque(rng.gen(), rng.gen(), rng.gen())
}

/// Create a fresh live body at base radius.
///
/// Used both for the initial population and for recycled slots.
pub fn spawn_body<R: Rng + ?Sized>(rng: &mut R, config: &SimConfig) -> Body {
    let position = random_position(rng, config, config.base_radius);
    let velocity = random_velocity(rng, config.max_speed);
    let color = random_color(rng);
    Body::new(position, velocity, config.base_radius, color)
}

/// Re-initialize the body at `index` as a freshly spawned one
pub fn recycle<R: Rng + ?Sized>(bodies: &mut [Body], index: usize, config: &SimConfig, rng: &mut R) {
    if let Some(slot) = bodies.get_mut(index) {
        *slot = spawn_body(rng, config);
    }
}

/// Recycle every queued slot. Returns how many were re-initialized.
pub fn recycle_pending<R: Rng + ?Sized>(
    bodies: &mut [Body],
    freed: &mut FreedSlots,
    config: &SimConfig,
    rng: &mut R,
) -> usize {
    let slots = freed.take();
    for &index in &slots {
        recycle(bodies, index, config, rng);
        tracing::trace!("Recycled slot {}", index);
    }
    slots.len()
}

/// Give every live body a new random velocity from the spawn distribution.
/// Returns how many were reset.
pub fn reset_velocities<R: Rng + ?Sized>(bodies: &mut [Body], config: &SimConfig, rng: &mut R) -> usize {
    let mut count = 0;
    for body in bodies.iter_mut().filter(|b| b.alive) {
        body.velocity = random_velocity(rng, config.max_speed);
        count += 1;
    }
    count
}
