//! Simulation counters
//!
//! Lock-free counters updated from the tick phases (including the parallel
//! broad phase) and folded into the end-of-run report. Exposition is
//! Prometheus-style text only; there is no HTTP endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters for one simulation run
#[derive(Debug, Default)]
pub struct SimMetrics {
    /// Completed ticks
    pub ticks: AtomicU64,
    /// Pairs that were in contact and exchanged velocities
    pub collisions: AtomicU64,
    /// Contacts skipped because both centers coincided
    pub degenerate_pairs: AtomicU64,
    /// Growth events (each one kills exactly one partner)
    pub growth_events: AtomicU64,
    /// Growth events skipped because the partner slot could not be claimed
    pub skipped_growths: AtomicU64,
    /// Slots re-initialized by the recycle pass
    pub recycles: AtomicU64,
    /// Periodic velocity resets performed
    pub velocity_resets: AtomicU64,
    /// Live bodies at the end of the last tick
    pub live_bodies: AtomicU64,
}

/// Plain copy of [`SimMetrics`] at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub collisions: u64,
    pub degenerate_pairs: u64,
    pub growth_events: u64,
    pub skipped_growths: u64,
    pub recycles: u64,
    pub velocity_resets: u64,
    pub live_bodies: u64,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(counter: &AtomicU64, n: u64) {
        if n > 0 {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            degenerate_pairs: self.degenerate_pairs.load(Ordering::Relaxed),
            growth_events: self.growth_events.load(Ordering::Relaxed),
            skipped_growths: self.skipped_growths.load(Ordering::Relaxed),
            recycles: self.recycles.load(Ordering::Relaxed),
            velocity_resets: self.velocity_resets.load(Ordering::Relaxed),
            live_bodies: self.live_bodies.load(Ordering::Relaxed),
        }
    }

    /// Prometheus text exposition of the current values
    pub fn render_text(&self) -> String {
        let snap = self.snapshot();
        let mut output = String::with_capacity(1024);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!("bubble_arena_ticks_total", "Completed ticks", "counter", snap.ticks);
        metric!("bubble_arena_collisions_total", "Resolved pair contacts", "counter", snap.collisions);
        metric!("bubble_arena_degenerate_pairs_total", "Contacts skipped for coincident centers", "counter",
            snap.degenerate_pairs);
        metric!("bubble_arena_growth_events_total", "Growth events", "counter", snap.growth_events);
        metric!("bubble_arena_skipped_growths_total", "Growth events skipped for lack of a slot", "counter",
            snap.skipped_growths);
        metric!("bubble_arena_recycles_total", "Recycled body slots", "counter", snap.recycles);
        metric!("bubble_arena_velocity_resets_total", "Periodic velocity resets", "counter",
            snap.velocity_resets);
        metric!("bubble_arena_live_bodies", "Live bodies after the last tick", "gauge", snap.live_bodies);

        output
    }
}
