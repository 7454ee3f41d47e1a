//! Per-tick sequencing
//!
//! Each tick while `Running`: recycle freed slots, integrate motion, resolve
//! collisions, reset velocities when the interval has elapsed, hand the live
//! bodies to the renderer, then record the frame's timing. The stop condition
//! is only checked between ticks; `Stopped` is terminal.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::sim::arena::Arena;
use crate::sim::body::CircleView;
use crate::sim::clock::Clock;
use crate::sim::constants::timing::STATUS_LOG_INTERVAL;
use crate::sim::performance::{FrameStats, Phase};
use crate::sim::report::{LogSink, ReportSink, StatsReport};
use crate::sim::SimError;

/// Consumer of the per-frame live-body snapshot
pub trait Renderer {
    fn draw(&mut self, frame: &[CircleView]);
}

impl<F: FnMut(&[CircleView])> Renderer for F {
    fn draw(&mut self, frame: &[CircleView]) {
        self(frame)
    }
}

/// Renderer that discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _frame: &[CircleView]) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured run duration elapsed
    DurationElapsed,
    /// An external stop request arrived
    Signal,
    /// The driver was finished explicitly
    Finished,
}

/// Sending half of a stop request. Cloneable; `stop` is idempotent.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        // A full channel already carries a pending stop
        let _ = self.tx.try_send(());
    }
}

/// Receiving half, polled once per tick boundary
#[derive(Debug)]
pub struct StopSignal {
    rx: Receiver<()>,
    raised: bool,
}

impl StopSignal {
    /// Whether a stop was requested. Dropping every handle does not count as one.
    pub fn is_raised(&mut self) -> bool {
        if !self.raised {
            match self.rx.try_recv() {
                Ok(()) => self.raised = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }
        }
        self.raised
    }
}

pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = bounded(1);
    (StopHandle { tx }, StopSignal { rx, raised: false })
}

pub struct FrameDriver<C: Clock> {
    arena: Arena,
    clock: C,
    state: DriverState,
    stop_reason: Option<StopReason>,
    stop: Option<StopSignal>,
    sink: Box<dyn ReportSink>,
    stats: FrameStats,
    started_at: Duration,
    last_reset: Duration,
    frame: Vec<CircleView>,
    report: Option<StatsReport>,
    last_status_degraded: bool,
}

impl<C: Clock> FrameDriver<C> {
    /// Validate `config`, populate a new arena and start `Running`
    pub fn new(config: SimConfig, clock: C) -> Result<Self, SimError> {
        Ok(Self::with_arena(Arena::new(config)?, clock))
    }

    pub fn with_arena(arena: Arena, clock: C) -> Self {
        let now = clock.now();
        let stats = FrameStats::new(arena.config().target_fps);
        let frame = Vec::with_capacity(arena.capacity());
        Self {
            arena,
            clock,
            state: DriverState::Running,
            stop_reason: None,
            stop: None,
            sink: Box::new(LogSink),
            stats,
            started_at: now,
            last_reset: now,
            frame,
            report: None,
            last_status_degraded: false,
        }
    }

    pub fn with_stop_signal(mut self, signal: StopSignal) -> Self {
        self.stop = Some(signal);
        self
    }

    pub fn with_report_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Final report, available once stopped
    pub fn report(&self) -> Option<&StatsReport> {
        self.report.as_ref()
    }

    /// Run one tick if still running, then check the stop condition
    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> DriverState {
        if self.state == DriverState::Stopped {
            return DriverState::Stopped;
        }
        if let Some(reason) = self.stop_condition() {
            self.halt(reason);
            return self.state;
        }

        let frame_start = self.clock.now();

        let mark = self.clock.now();
        self.arena.recycle_pending();
        let mark = self.lap(Phase::Recycle, mark);

        self.arena.integrate();
        let mark = self.lap(Phase::Motion, mark);

        self.arena.resolve_collisions();
        let mark = self.lap(Phase::Collision, mark);

        if self.reset_due(mark) {
            self.arena.reset_velocities();
            self.last_reset = mark;
        }
        let mark = self.lap(Phase::Reset, mark);

        self.arena.snapshot_into(&mut self.frame);
        renderer.draw(&self.frame);
        let frame_end = self.lap(Phase::Draw, mark);

        self.stats.record_frame(frame_end.saturating_sub(frame_start));
        self.arena.record_tick();
        self.log_status();

        if let Some(reason) = self.stop_condition() {
            self.halt(reason);
        }
        self.state
    }

    /// Tick until stopped and return the final report
    pub fn run<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> StatsReport {
        info!("Frame driver running");
        while self.tick(renderer) == DriverState::Running {}
        self.finish()
    }

    /// Stop (if still running) and return the final report.
    ///
    /// The report is built and emitted exactly once.
    pub fn finish(&mut self) -> StatsReport {
        if self.state == DriverState::Running {
            self.halt(StopReason::Finished);
        }
        match &self.report {
            Some(report) => report.clone(),
            None => self.emit_report(),
        }
    }

    fn lap(&mut self, phase: Phase, since: Duration) -> Duration {
        let now = self.clock.now();
        self.stats.record_phase(phase, now.saturating_sub(since));
        now
    }

    fn reset_due(&self, now: Duration) -> bool {
        match self.arena.config().reset_interval() {
            Some(interval) => now.saturating_sub(self.last_reset) >= interval,
            None => false,
        }
    }

    fn stop_condition(&mut self) -> Option<StopReason> {
        if self.stop.as_mut().is_some_and(StopSignal::is_raised) {
            return Some(StopReason::Signal);
        }
        let elapsed = self.clock.now().saturating_sub(self.started_at);
        match self.arena.config().run_duration() {
            Some(limit) if elapsed >= limit => Some(StopReason::DurationElapsed),
            _ => None,
        }
    }

    fn halt(&mut self, reason: StopReason) {
        self.state = DriverState::Stopped;
        self.stop_reason = Some(reason);
        info!("Frame driver stopped ({:?}) after {} frames", reason, self.stats.frames());
        self.emit_report();
    }

    fn emit_report(&mut self) -> StatsReport {
        let elapsed = self.clock.now().saturating_sub(self.started_at);
        let report = StatsReport::from_stats(&self.stats, elapsed, self.arena.metrics().snapshot());
        if let Err(e) = self.sink.emit(&report) {
            warn!("Failed to emit statistics report: {}", e);
        }
        self.report = Some(report.clone());
        report
    }

    fn log_status(&mut self) {
        let degraded = self.stats.status().is_degraded();
        if degraded && !self.last_status_degraded {
            warn!("Frame budget degraded: {}", self.stats.status_message());
        }
        self.last_status_degraded = degraded;

        if self.stats.frames() % STATUS_LOG_INTERVAL == 0 {
            debug!(
                "Frame {}: {} live bodies, {}",
                self.stats.frames(),
                self.frame.len(),
                self.stats.status_message()
            );
        }
    }
}
