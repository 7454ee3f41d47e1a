use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sim::constants::{arena, body, growth, motion, timing};

/// Configuration violations. Any of these stops the simulation before the first tick.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("population capacity must be at least 1")]
    ZeroCapacity,
    #[error("arena dimensions must be positive and finite, got {width}x{height}")]
    InvalidArena { width: f32, height: f32 },
    #[error("min_radius must be positive, got {0}")]
    NonPositiveMinRadius(i32),
    #[error("min_radius ({min}) cannot exceed max_radius ({max})")]
    RadiusBounds { min: i32, max: i32 },
    #[error("base_radius {base} is outside [{min}, {max}]")]
    BaseRadiusOutOfBounds { base: i32, min: i32, max: i32 },
    #[error("body {index} has radius {radius} outside [{min}, {max}]")]
    BodyRadiusOutOfBounds { index: usize, radius: i32, min: i32, max: i32 },
    #[error("arena {width}x{height} cannot fit a body of radius {radius} clear of the walls")]
    ArenaTooSmall { width: f32, height: f32, radius: i32 },
    #[error("max_speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
    #[error("growth_threshold must be at least 1")]
    ZeroGrowthThreshold,
    #[error("growth_increment must be positive, got {0}")]
    NonPositiveGrowthIncrement(i32),
    #[error("target_fps must be at least 1")]
    ZeroTargetFps,
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Simulation configuration, supplied once at start-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Arena width in pixels
    pub width: f32,
    /// Arena height in pixels
    pub height: f32,
    /// Number of bodies (constant for the whole run)
    pub capacity: usize,
    /// Radius of newly spawned and recycled bodies
    pub base_radius: i32,
    /// Lower radius bound
    pub min_radius: i32,
    /// Upper radius bound; growth is clamped here
    pub max_radius: i32,
    /// Radius added per growth event
    pub growth_increment: i32,
    /// Collision count that triggers a growth event
    pub growth_threshold: u32,
    /// Per-axis velocity bound for spawns and resets
    pub max_speed: f32,
    /// Velocity reset period (None disables resets)
    pub reset_interval_ms: Option<u64>,
    /// Total run time (None runs until stopped)
    pub run_duration_ms: Option<u64>,
    /// RNG seed for deterministic replay (None seeds from entropy)
    pub seed: Option<u64>,
    /// Worker pool size (0 = one per core)
    pub worker_threads: usize,
    /// Frame budget for the performance status
    pub target_fps: u32,
    /// Where to write the end-of-run report (None logs it only)
    pub report_path: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: arena::WIDTH,
            height: arena::HEIGHT,
            capacity: body::CAPACITY,
            base_radius: body::BASE_RADIUS,
            min_radius: body::MIN_RADIUS,
            max_radius: body::MAX_RADIUS,
            growth_increment: growth::INCREMENT,
            growth_threshold: growth::THRESHOLD,
            max_speed: motion::MAX_SPEED,
            reset_interval_ms: Some(motion::RESET_INTERVAL_MS),
            run_duration_ms: None,
            seed: None,
            worker_threads: 0,
            target_fps: timing::TARGET_FPS,
            report_path: None,
        }
    }
}

impl SimConfig {
    /// Load config from an optional JSON file (`SIM_CONFIG`) and environment overrides
    pub fn load_or_default() -> Self {
        let mut config = match std::env::var("SIM_CONFIG") {
            Ok(path) => match Self::from_json_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("{}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        override_from_env("ARENA_WIDTH", &mut config.width);
        override_from_env("ARENA_HEIGHT", &mut config.height);
        override_from_env("POPULATION", &mut config.capacity);
        override_from_env("BASE_RADIUS", &mut config.base_radius);
        override_from_env("MAX_RADIUS", &mut config.max_radius);
        override_from_env("GROWTH_THRESHOLD", &mut config.growth_threshold);
        override_from_env("MAX_SPEED", &mut config.max_speed);
        override_from_env("WORKER_THREADS", &mut config.worker_threads);

        if let Some(ms) = parse_env::<u64>("RESET_INTERVAL_MS") {
            // 0 disables resets
            config.reset_interval_ms = (ms > 0).then_some(ms);
        }
        if let Some(ms) = parse_env::<u64>("RUN_DURATION_MS") {
            config.run_duration_ms = (ms > 0).then_some(ms);
        }
        if let Some(seed) = parse_env::<u64>("SEED") {
            config.seed = Some(seed);
        }
        if let Ok(path) = std::env::var("REPORT_PATH") {
            config.report_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate configuration before the simulation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let dims_ok = |v: f32| v.is_finite() && v > 0.0;
        if !dims_ok(self.width) || !dims_ok(self.height) {
            return Err(ConfigError::InvalidArena {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_radius <= 0 {
            return Err(ConfigError::NonPositiveMinRadius(self.min_radius));
        }
        if self.min_radius > self.max_radius {
            return Err(ConfigError::RadiusBounds {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if self.base_radius < self.min_radius || self.base_radius > self.max_radius {
            return Err(ConfigError::BaseRadiusOutOfBounds {
                base: self.base_radius,
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        let diameter = 2.0 * self.base_radius as f32;
        if self.width <= diameter || self.height <= diameter {
            return Err(ConfigError::ArenaTooSmall {
                width: self.width,
                height: self.height,
                radius: self.base_radius,
            });
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.max_speed));
        }
        if self.growth_threshold == 0 {
            return Err(ConfigError::ZeroGrowthThreshold);
        }
        if self.growth_increment <= 0 {
            return Err(ConfigError::NonPositiveGrowthIncrement(self.growth_increment));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroTargetFps);
        }
        Ok(())
    }

    pub fn reset_interval(&self) -> Option<Duration> {
        self.reset_interval_ms.map(Duration::from_millis)
    }

    pub fn run_duration(&self) -> Option<Duration> {
        self.run_duration_ms.map(Duration::from_millis)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Some(parsed) = parse_env(key) {
        *slot = parsed;
    }
}
