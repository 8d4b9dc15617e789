//! RPG-style scene transition
//!
//! A tri-phase overlay (entering → flashing → exiting) used to gate page
//! navigation. The state machine is library-agnostic: any renderer can drive
//! it through `advance` or signal phases itself with `complete_phase`.

pub mod mode;
pub mod scene;
pub mod timer;
pub mod visuals;

pub use mode::{TransitionMode, TransitionPhase};
pub use scene::{
    Callback, FAILSAFE_MS, RetriggerPolicy, SceneTransition, SessionEnd, TransitionConfig,
    TransitionStats,
};
pub use timer::FailsafeTimer;
