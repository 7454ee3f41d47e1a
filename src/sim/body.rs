//! Body state and the read-only views handed to renderers

use serde::{Deserialize, Serialize};

use crate::util::vec2::Vec2;

/// RGBA color, fixed at spawn time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, crate::sim::constants::body::OPAQUE)
    }
}

/// A simulated circle.
///
/// Bodies live in the arena's fixed-capacity store and are re-initialized in
/// place when their slot is recycled, never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center, arena-local
    pub position: Vec2,
    /// Displacement per tick
    pub velocity: Vec2,
    /// Current radius, within the configured bounds
    pub radius: i32,
    pub color: Rgba,
    /// Qualifying collisions since the last growth event
    pub collision_count: u32,
    /// Dead bodies are skipped by physics and rendering until recycled
    pub alive: bool,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, radius: i32, color: Rgba) -> Self {
        Self {
            position,
            velocity,
            radius,
            color,
            collision_count: 0,
            alive: true,
        }
    }

    #[inline]
    pub fn radius_f32(&self) -> f32 {
        self.radius as f32
    }

    /// Whether this body's disc overlaps `other`'s (strictly closer than the radius sum)
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        let reach = self.radius_f32() + other.radius_f32();
        self.position.distance_sq_to(other.position) < reach * reach
    }

    /// Renderer row for this body
    pub fn view(&self) -> CircleView {
        CircleView {
            position: self.position,
            radius: self.radius,
            color: self.color,
        }
    }
}

/// Immutable per-frame snapshot row: everything a renderer needs to draw one live body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleView {
    pub position: Vec2,
    pub radius: i32,
    pub color: Rgba,
}
