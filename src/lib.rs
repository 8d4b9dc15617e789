//! Retro FX - pixel bursts and RPG-style scene transitions
//!
//! Core modules:
//! - `burst`: Click particle bursts (spawn, physics, fade)
//! - `transition`: Tri-phase scene transition with a failsafe timer
//! - `navigation`: Route changes gated on the transition
//! - `stage`: Frame-loop composition of the effects
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted effect preferences

pub mod burst;
pub mod error;
pub mod navigation;
pub mod renderer;
pub mod settings;
pub mod stage;
pub mod transition;

pub use burst::{BurstConfig, BurstOptions, ParticleField, Rgba};
pub use error::{FxError, Result};
pub use navigation::Navigator;
pub use settings::{FxSettings, QualityPreset};
pub use stage::FxStage;
pub use transition::{SceneTransition, TransitionConfig, TransitionMode, TransitionPhase};

/// Host integration constants
pub mod consts {
    /// Canvas element the effects draw into
    pub const CANVAS_ID: &str = "fx-canvas";
    /// Attribute marking in-page navigation links
    pub const NAV_ATTRIBUTE: &str = "data-nav";
    /// Timer tick interval while frames may be throttled (ms)
    pub const TIMER_TICK_MS: i32 = 100;
}
