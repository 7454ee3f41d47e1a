//! End-of-run statistics report and its sinks

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::metrics::MetricsSnapshot;
use crate::sim::performance::{FrameStats, Phase};

/// Aggregated timing statistics for a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub frames: u64,
    pub min_fps: f64,
    pub max_fps: f64,
    pub avg_fps: f64,
    pub avg_recycle_ms: f64,
    pub avg_motion_ms: f64,
    pub avg_collision_ms: f64,
    pub avg_reset_ms: f64,
    pub avg_draw_ms: f64,
    pub elapsed_ms: f64,
    pub metrics: MetricsSnapshot,
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl StatsReport {
    pub fn from_stats(stats: &FrameStats, elapsed: Duration, metrics: MetricsSnapshot) -> Self {
        Self {
            frames: stats.frames(),
            min_fps: stats.min_fps(),
            max_fps: stats.max_fps(),
            avg_fps: stats.avg_fps(),
            avg_recycle_ms: millis(stats.avg_phase(Phase::Recycle)),
            avg_motion_ms: millis(stats.avg_phase(Phase::Motion)),
            avg_collision_ms: millis(stats.avg_phase(Phase::Collision)),
            avg_reset_ms: millis(stats.avg_phase(Phase::Reset)),
            avg_draw_ms: millis(stats.avg_phase(Phase::Draw)),
            elapsed_ms: millis(elapsed),
            metrics,
        }
    }

    /// `key: value` lines
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(512);
        // Writing to a String cannot fail
        let _ = writeln!(out, "frames: {}", self.frames);
        let _ = writeln!(out, "min_fps: {:.2}", self.min_fps);
        let _ = writeln!(out, "max_fps: {:.2}", self.max_fps);
        let _ = writeln!(out, "avg_fps: {:.2}", self.avg_fps);
        let _ = writeln!(out, "avg_recycle_ms: {:.4}", self.avg_recycle_ms);
        let _ = writeln!(out, "avg_motion_ms: {:.4}", self.avg_motion_ms);
        let _ = writeln!(out, "avg_collision_ms: {:.4}", self.avg_collision_ms);
        let _ = writeln!(out, "avg_reset_ms: {:.4}", self.avg_reset_ms);
        let _ = writeln!(out, "avg_draw_ms: {:.4}", self.avg_draw_ms);
        let _ = writeln!(out, "elapsed_ms: {:.1}", self.elapsed_ms);
        let m = &self.metrics;
        let _ = writeln!(out, "collisions: {}", m.collisions);
        let _ = writeln!(out, "degenerate_pairs: {}", m.degenerate_pairs);
        let _ = writeln!(out, "growth_events: {}", m.growth_events);
        let _ = writeln!(out, "skipped_growths: {}", m.skipped_growths);
        let _ = writeln!(out, "recycles: {}", m.recycles);
        let _ = writeln!(out, "velocity_resets: {}", m.velocity_resets);
        let _ = writeln!(out, "live_bodies: {}", m.live_bodies);
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report to `path`: JSON for `.json` files, text otherwise
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let body = if path.extension().is_some_and(|ext| ext == "json") {
            self.to_json()?
        } else {
            self.to_text()
        };
        std::fs::write(path, body)
    }
}

/// Destination for the end-of-run report
pub trait ReportSink: Send {
    fn emit(&mut self, report: &StatsReport) -> std::io::Result<()>;
}

/// Logs the report through `tracing`
#[derive(Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn emit(&mut self, report: &StatsReport) -> std::io::Result<()> {
        info!(
            "Run finished: {} frames, fps min {:.2} / max {:.2} / avg {:.2}, collision {:.3}ms, draw {:.3}ms",
            report.frames,
            report.min_fps,
            report.max_fps,
            report.avg_fps,
            report.avg_collision_ms,
            report.avg_draw_ms
        );
        info!(
            "Population: {} collisions, {} growth events, {} recycles, {} live",
            report.metrics.collisions,
            report.metrics.growth_events,
            report.metrics.recycles,
            report.metrics.live_bodies
        );
        Ok(())
    }
}

/// Writes the report to a file (and logs where it went)
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for FileSink {
    fn emit(&mut self, report: &StatsReport) -> std::io::Result<()> {
        report.write_to(&self.path)?;
        info!("Statistics written to {}", self.path.display());
        Ok(())
    }
}
