//! Pixel particle bursts
//!
//! Click-triggered swirls of short-lived square particles. Forces are tuned
//! for feel, per 60 Hz reference frame, and scaled by the real frame time.

pub mod color;
pub mod config;
pub mod field;
pub mod particle;

pub use color::Rgba;
pub use config::{BurstConfig, BurstOptions, DEFAULT_PALETTE};
pub use field::ParticleField;
pub use particle::{Particle, REFERENCE_FRAME_MS};
