use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

use bubble_arena::config::SimConfig;
use bubble_arena::sim::body::CircleView;
use bubble_arena::sim::clock::SystemClock;
use bubble_arena::sim::report::FileSink;
use bubble_arena::sim::{stop_signal, DriverState, FrameDriver, Renderer};

/// Stand-in for a display: traces each frame it is handed
#[derive(Default)]
struct HeadlessRenderer {
    frames: u64,
}

impl Renderer for HeadlessRenderer {
    fn draw(&mut self, frame: &[CircleView]) {
        self.frames += 1;
        if let Some(largest) = frame.iter().map(|c| c.radius).max() {
            trace!("frame {}: {} circles, largest radius {}", self.frames, frame.len(), largest);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Bubble Arena v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::load_or_default();
    config.validate().context("invalid simulation configuration")?;
    info!(
        "Configuration loaded: {}x{} arena, {} bodies, target {} fps",
        config.width, config.height, config.capacity, config.target_fps
    );

    let frame_budget = Duration::from_secs_f64(1.0 / config.target_fps as f64);
    let report_path = config.report_path.clone();

    let (stop, signal) = stop_signal();
    let mut driver = FrameDriver::new(config, SystemClock::new())
        .context("failed to start simulation")?
        .with_stop_signal(signal);
    if let Some(path) = report_path {
        driver = driver.with_report_sink(Box::new(FileSink::new(path)));
    }

    // The frame loop is CPU-bound; keep it off the async workers
    let mut sim = tokio::task::spawn_blocking(move || {
        let mut renderer = HeadlessRenderer::default();
        loop {
            let started = Instant::now();
            if driver.tick(&mut renderer) == DriverState::Stopped {
                break;
            }
            if let Some(rest) = frame_budget.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        let report = driver.finish();
        debug!("Final counters:\n{}", driver.arena().metrics().render_text());
        report
    });

    // Shutdown signal handler
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    let report = tokio::select! {
        result = &mut sim => result.context("simulation thread panicked")?,
        _ = shutdown => {
            info!("Stopping at the next tick boundary...");
            stop.stop();
            sim.await.context("simulation thread panicked")?
        }
    };

    info!(
        "Simulation stopped after {} frames (avg {:.2} fps)",
        report.frames, report.avg_fps
    );
    Ok(())
}
