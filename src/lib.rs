//! Bubble Arena Simulation Library
//!
//! A real-time 2D particle simulation: circular bodies drift through a
//! walled arena, exchange velocities elastically on contact, and grow by
//! absorbing the bodies they keep colliding with. Absorbed slots are
//! recycled so the population stays constant.
//!
//! The frame driver sequences each tick and hands the live bodies to a
//! caller-supplied [`sim::Renderer`]; this crate does no drawing itself.

pub mod config;
pub mod metrics;
pub mod sim;
pub mod util;
