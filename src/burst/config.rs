//! Burst configuration
//!
//! `BurstConfig` is the complete, process-wide set of tuning values.
//! `BurstOptions` carries per-invocation overrides; any field left as `None`
//! falls back to the base config.

use serde::{Deserialize, Serialize};

use super::color::Rgba;
use crate::error::{FxError, Result};

/// Default burst palette (cyan, purple, green, amber, red, rose)
pub const DEFAULT_PALETTE: [Rgba; 6] = [
    Rgba::rgb(0x00, 0xe5, 0xff),
    Rgba::rgb(0xa8, 0x55, 0xf7),
    Rgba::rgb(0x22, 0xc5, 0x5e),
    Rgba::rgb(0xf5, 0x9e, 0x0b),
    Rgba::rgb(0xef, 0x44, 0x44),
    Rgba::rgb(0xf4, 0x3f, 0x5e),
];

/// Fully-resolved burst parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Particles per burst (non-positive spawns nothing)
    pub count: i32,
    /// Base pixel size
    pub size: f32,
    /// Base initial speed (pixels per reference frame)
    pub speed: f32,
    /// Mean lifespan in milliseconds
    pub life: f32,
    /// Downward acceleration per reference frame
    pub gravity: f32,
    pub palette: Vec<Rgba>,

    /// Tangential force around the spawn point
    pub swirl: bool,
    pub swirl_strength: f32,

    /// Outward kick, extinguished within the first 30% of life
    pub radial_impulse: f32,
    /// Brake on the outward velocity component, 0 (none) to 1 (full)
    pub radial_damp: f32,

    /// Per-particle speed multiplier range
    pub speed_var: [f32; 2],
    /// Per-particle kick multiplier range
    pub radial_impulse_var: [f32; 2],
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 40,
            size: 4.0,
            speed: 0.9,
            life: 400.0,
            gravity: 0.02,
            palette: DEFAULT_PALETTE.to_vec(),

            swirl: true,
            swirl_strength: 0.85,

            radial_impulse: 0.6,
            radial_damp: 0.7,

            speed_var: [0.7, 1.4],
            radial_impulse_var: [0.8, 1.3],
        }
    }
}

impl BurstConfig {
    /// Particle count with non-positive values clamped to zero
    pub fn particle_count(&self) -> usize {
        self.count.max(0) as usize
    }

    /// Reject configurations a burst cannot be drawn from
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(FxError::EmptyPalette);
        }

        for (field, value) in [
            ("size", self.size),
            ("speed", self.speed),
            ("life", self.life),
            ("swirl_strength", self.swirl_strength),
            ("radial_impulse", self.radial_impulse),
            ("radial_damp", self.radial_damp),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FxError::InvalidValue { field, value });
            }
        }
        if !self.gravity.is_finite() {
            return Err(FxError::InvalidValue {
                field: "gravity",
                value: self.gravity,
            });
        }

        for (field, [min, max]) in [
            ("speed_var", self.speed_var),
            ("radial_impulse_var", self.radial_impulse_var),
        ] {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(FxError::InvalidRange { field, min, max });
            }
        }

        Ok(())
    }

    /// Apply per-invocation overrides on top of this config
    pub fn with_options(&self, options: &BurstOptions) -> BurstConfig {
        BurstConfig {
            count: options.count.unwrap_or(self.count),
            size: options.size.unwrap_or(self.size),
            speed: options.speed.unwrap_or(self.speed),
            life: options.life.unwrap_or(self.life),
            gravity: options.gravity.unwrap_or(self.gravity),
            palette: options
                .palette
                .clone()
                .unwrap_or_else(|| self.palette.clone()),
            swirl: options.swirl.unwrap_or(self.swirl),
            swirl_strength: options.swirl_strength.unwrap_or(self.swirl_strength),
            radial_impulse: options.radial_impulse.unwrap_or(self.radial_impulse),
            radial_damp: options.radial_damp.unwrap_or(self.radial_damp),
            speed_var: options.speed_var.unwrap_or(self.speed_var),
            radial_impulse_var: options
                .radial_impulse_var
                .unwrap_or(self.radial_impulse_var),
        }
    }
}

/// Per-invocation overrides; unknown JSON keys are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<Rgba>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swirl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swirl_strength: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radial_impulse: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radial_damp: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_var: Option<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radial_impulse_var: Option<[f32; 2]>,
}

impl BurstOptions {
    /// Overrides used by the site's click layer: a tighter, faster swirl
    pub fn site_defaults() -> Self {
        Self {
            count: Some(40),
            size: Some(4.0),
            speed: Some(1.1),
            swirl: Some(true),
            swirl_strength: Some(0.85),
            radial_impulse: Some(0.9),
            ..Default::default()
        }
    }
}
