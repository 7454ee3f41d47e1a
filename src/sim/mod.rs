//! Simulation core: arena, per-tick systems and the frame driver

pub mod arena;
pub mod body;
pub mod clock;
pub mod constants;
pub mod driver;
pub mod performance;
pub mod report;
pub mod systems;

pub use arena::Arena;
pub use driver::{stop_signal, DriverState, FrameDriver, NullRenderer, Renderer, StopHandle};

use crate::config::ConfigError;

/// Errors that prevent a simulation from starting
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
