//! Navigation gate
//!
//! Routes change only after the scene transition says so, or after an
//! independent fallback delay, whichever comes first. The fallback does not
//! rely on the transition's own failsafe.

use std::cell::Cell;
use std::rc::Rc;

use crate::transition::SceneTransition;

/// Default fallback before navigating without the transition (ms).
///
/// Longer than the transition failsafe, so it only decides when the
/// transition never ran at all.
pub const FALLBACK_MS: f32 = 1400.0;

/// A route change waiting on its transition
#[derive(Debug)]
struct PendingNavigation {
    target: String,
    remaining_ms: f32,
    signalled: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub struct Navigator {
    current: String,
    fallback_ms: f32,
    pending: Option<PendingNavigation>,
}

impl Navigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
            fallback_ms: FALLBACK_MS,
            pending: None,
        }
    }

    pub fn with_fallback(mut self, fallback_ms: f32) -> Self {
        self.fallback_ms = fallback_ms.max(0.0);
        self
    }

    /// Route that is currently shown
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Route waiting to be released, if any
    pub fn pending_target(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.target.as_str())
    }

    /// Request a route change behind the transition.
    ///
    /// Returns the route right away when there is no transition to wait for.
    /// Requesting the current route only replays the transition.
    pub fn go(&mut self, target: &str, transition: Option<&mut SceneTransition>) -> Option<String> {
        if target == self.current {
            if let Some(t) = transition {
                t.play(None);
            }
            return None;
        }

        let Some(transition) = transition else {
            log::info!("Navigating to {} (no transition)", target);
            self.pending = None;
            self.current = target.to_string();
            return Some(self.current.clone());
        };

        if let Some(prev) = self.pending.take() {
            log::debug!("Navigation to {} replaced by {}", prev.target, target);
        }

        let signalled = Rc::new(Cell::new(false));
        let flag = signalled.clone();
        self.pending = Some(PendingNavigation {
            target: target.to_string(),
            remaining_ms: self.fallback_ms,
            signalled,
        });
        transition.play(Some(Box::new(move || flag.set(true))));
        None
    }

    /// Advance the fallback clock; yields a route at most once per request
    pub fn tick(&mut self, dt: f32) -> Option<String> {
        let pending = self.pending.as_mut()?;
        if dt.is_finite() && dt > 0.0 {
            pending.remaining_ms -= dt;
        }

        let by_transition = pending.signalled.get();
        if !by_transition && pending.remaining_ms > 0.0 {
            return None;
        }

        let pending = self.pending.take()?;
        if by_transition {
            log::info!("Navigating to {}", pending.target);
        } else {
            log::warn!(
                "Transition did not finish within {:.0} ms, navigating to {} anyway",
                self.fallback_ms,
                pending.target
            );
        }
        self.current = pending.target;
        Some(self.current.clone())
    }
}
