//! Frame timing and performance status
//!
//! Aggregates per-frame rates and per-phase durations for the end-of-run
//! report, and keeps a rolling window of recent frames to classify how much
//! of the frame budget the simulation is using.

use std::collections::VecDeque;
use std::time::Duration;

use crate::sim::constants::timing::STATUS_WINDOW;

/// Phases of a tick, timed separately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Recycle,
    Motion,
    Collision,
    Reset,
    Draw,
}

const PHASES: usize = 5;

impl Phase {
    fn index(self) -> usize {
        self as usize
    }
}

/// Performance status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceStatus {
    /// Under 30% of the frame budget
    Excellent,
    /// Under 70% of the frame budget
    Good,
    /// Under 90% of the frame budget
    Warning,
    /// At or over 90% of the frame budget
    Critical,
}

impl PerformanceStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, PerformanceStatus::Warning | PerformanceStatus::Critical)
    }
}

/// Frame statistics for one run
#[derive(Debug, Clone)]
pub struct FrameStats {
    frames: u64,
    /// Frames long enough to yield a rate sample
    rate_samples: u64,
    min_rate: f64,
    max_rate: f64,
    rate_sum: f64,
    phase_totals: [Duration; PHASES],
    /// Rolling window of recent frame durations
    recent: VecDeque<Duration>,
    target_frame: Duration,
    status: PerformanceStatus,
}

impl FrameStats {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frames: 0,
            rate_samples: 0,
            min_rate: f64::INFINITY,
            max_rate: 0.0,
            rate_sum: 0.0,
            phase_totals: [Duration::ZERO; PHASES],
            recent: VecDeque::with_capacity(STATUS_WINDOW),
            target_frame: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            status: PerformanceStatus::Excellent,
        }
    }

    /// Add time spent in one phase of the current frame
    pub fn record_phase(&mut self, phase: Phase, duration: Duration) {
        self.phase_totals[phase.index()] += duration;
    }

    /// Close a frame of the given total duration.
    ///
    /// Zero-length frames count as frames but yield no rate sample.
    pub fn record_frame(&mut self, duration: Duration) {
        self.frames += 1;

        let secs = duration.as_secs_f64();
        if secs > 0.0 {
            let rate = 1.0 / secs;
            self.rate_samples += 1;
            self.rate_sum += rate;
            self.min_rate = self.min_rate.min(rate);
            self.max_rate = self.max_rate.max(rate);
        }

        self.recent.push_back(duration);
        while self.recent.len() > STATUS_WINDOW {
            self.recent.pop_front();
        }
        self.update_status();
    }

    fn update_status(&mut self) {
        if self.recent.len() < 10 {
            return;
        }

        let ratio = self.recent_average().as_secs_f64() / self.target_frame.as_secs_f64();
        self.status = if ratio < 0.3 {
            PerformanceStatus::Excellent
        } else if ratio < 0.7 {
            PerformanceStatus::Good
        } else if ratio < 0.9 {
            PerformanceStatus::Warning
        } else {
            PerformanceStatus::Critical
        };
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Lowest per-frame rate, or 0 when no rate was sampled
    pub fn min_fps(&self) -> f64 {
        if self.rate_samples == 0 {
            0.0
        } else {
            self.min_rate
        }
    }

    pub fn max_fps(&self) -> f64 {
        self.max_rate
    }

    /// Mean of the per-frame rate samples
    pub fn avg_fps(&self) -> f64 {
        if self.rate_samples == 0 {
            0.0
        } else {
            self.rate_sum / self.rate_samples as f64
        }
    }

    /// Mean time per frame spent in `phase`
    pub fn avg_phase(&self, phase: Phase) -> Duration {
        if self.frames == 0 {
            return Duration::ZERO;
        }
        let total = self.phase_totals[phase.index()];
        Duration::from_nanos((total.as_nanos() / self.frames as u128) as u64)
    }

    /// Average frame duration over the rolling window
    pub fn recent_average(&self) -> Duration {
        if self.recent.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.recent.iter().sum();
        sum / self.recent.len() as u32
    }

    pub fn status(&self) -> PerformanceStatus {
        self.status
    }

    /// Budget usage as percentage (0-100+) over the rolling window
    pub fn budget_usage_percent(&self) -> f64 {
        self.recent_average().as_secs_f64() / self.target_frame.as_secs_f64() * 100.0
    }

    pub fn status_message(&self) -> String {
        format!(
            "{:?} - {:.1}% budget, {:.2} fps avg",
            self.status,
            self.budget_usage_percent(),
            self.avg_fps()
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(crate::sim::constants::timing::TARGET_FPS)
    }
}
