//! Transition modes and phases

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Visual style of a transition, fixed for the whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Horizontal strips wiping in a cascade
    Bars,
    /// Circular clip growing from the center
    Iris,
    /// Mosaic of cells popping in diagonally
    Checker,
}

impl TransitionMode {
    pub const ALL: [TransitionMode; 3] = [
        TransitionMode::Bars,
        TransitionMode::Iris,
        TransitionMode::Checker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionMode::Bars => "bars",
            TransitionMode::Iris => "iris",
            TransitionMode::Checker => "checker",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bars" => Some(TransitionMode::Bars),
            "iris" => Some(TransitionMode::Iris),
            "checker" | "mosaic" => Some(TransitionMode::Checker),
            _ => None,
        }
    }

    /// Pick uniformly from `pool`, falling back to every mode when it is empty
    pub fn choose(pool: &[TransitionMode], rng: &mut impl Rng) -> TransitionMode {
        let pool = if pool.is_empty() { &Self::ALL[..] } else { pool };
        pool[rng.random_range(0..pool.len())]
    }
}

/// Stage of an active session; strictly Entering → Flashing → Exiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransitionPhase {
    Entering,
    Flashing,
    Exiting,
}

impl TransitionPhase {
    /// Following phase, `None` after Exiting (session ends)
    pub fn next(self) -> Option<TransitionPhase> {
        match self {
            TransitionPhase::Entering => Some(TransitionPhase::Flashing),
            TransitionPhase::Flashing => Some(TransitionPhase::Exiting),
            TransitionPhase::Exiting => None,
        }
    }
}
