//! Default simulation tunables, grouped by concern
//!
//! These seed [`crate::config::SimConfig::default`]; the simulation itself only
//! reads the configuration record.

/// Arena dimensions (pixels)
pub mod arena {
    /// Arena width
    pub const WIDTH: f32 = 640.0;
    /// Arena height
    pub const HEIGHT: f32 = 480.0;
}

/// Population and body sizing
pub mod body {
    /// Number of bodies in the arena
    pub const CAPACITY: usize = 100;
    /// Radius of a freshly spawned body
    pub const BASE_RADIUS: i32 = 10;
    /// Smallest radius a body may have
    pub const MIN_RADIUS: i32 = 10;
    /// Largest radius a body may grow to
    pub const MAX_RADIUS: i32 = 40;
    /// Alpha channel of every spawned color (opaque)
    pub const OPAQUE: u8 = 255;
}

/// Motion constants
pub mod motion {
    /// Per-axis speed bound, in pixels per tick
    pub const MAX_SPEED: f32 = 3.0;
    /// Velocity reset period in milliseconds
    pub const RESET_INTERVAL_MS: u64 = 5_000;
}

/// Growth/merge policy
pub mod growth {
    /// Collisions needed before a body grows
    pub const THRESHOLD: u32 = 10;
    /// Radius gained per growth event
    pub const INCREMENT: i32 = 2;
}

/// Frame timing
pub mod timing {
    /// Target frame rate used for the performance budget
    pub const TARGET_FPS: u32 = 60;
    /// Rolling window of frame samples used for performance status
    pub const STATUS_WINDOW: usize = 120;
    /// Ticks between periodic status log lines
    pub const STATUS_LOG_INTERVAL: u64 = 600;
}
