//! Scene transition state machine
//!
//! idle → entering → flashing → exiting → idle. Each `play` opens a session
//! whose completion callback runs exactly once: on normal completion, when
//! the failsafe fires, or when a retrigger supersedes it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::mode::{TransitionMode, TransitionPhase};
use super::timer::FailsafeTimer;
use super::visuals::{self, OverlayLayout};
use crate::error::{FxError, Result};
use crate::renderer::Canvas;

/// Completion callback for one session
pub type Callback = Box<dyn FnOnce()>;

/// Default upper bound on a session (ms)
pub const FAILSAFE_MS: f32 = 1200.0;

/// What `play` does while a session is already running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetriggerPolicy {
    /// Finish the running session (its callback fires now) and start over
    #[default]
    Restart,
    /// Keep the running session; the new trigger's callback fires now
    Ignore,
}

/// Transition tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Pool to draw the mode from; empty means every mode
    pub modes: Vec<TransitionMode>,
    /// Hard upper bound on a session (ms)
    pub failsafe_ms: f32,
    pub enter_ms: f32,
    pub flash_ms: f32,
    pub exit_ms: f32,
    /// Draw the flash overlay (off under reduced motion)
    pub flash: bool,
    pub retrigger: RetriggerPolicy,
    pub bar_count: u32,
    pub checker_cols: u32,
    pub checker_rows: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            modes: TransitionMode::ALL.to_vec(),
            failsafe_ms: FAILSAFE_MS,
            enter_ms: 480.0,
            flash_ms: 180.0,
            exit_ms: 420.0,
            flash: true,
            retrigger: RetriggerPolicy::Restart,
            bar_count: 9,
            checker_cols: 10,
            checker_rows: 6,
        }
    }
}

impl TransitionConfig {
    pub fn phase_ms(&self, phase: TransitionPhase) -> f32 {
        match phase {
            TransitionPhase::Entering => self.enter_ms,
            TransitionPhase::Flashing => self.flash_ms,
            TransitionPhase::Exiting => self.exit_ms,
        }
    }

    /// Time a session needs when nothing stalls
    pub fn sequence_ms(&self) -> f32 {
        self.enter_ms + self.flash_ms + self.exit_ms
    }

    pub fn layout(&self) -> OverlayLayout {
        OverlayLayout {
            bar_count: self.bar_count,
            checker_cols: self.checker_cols,
            checker_rows: self.checker_rows,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("failsafe_ms", self.failsafe_ms),
            ("enter_ms", self.enter_ms),
            ("flash_ms", self.flash_ms),
            ("exit_ms", self.exit_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FxError::InvalidValue { field, value });
            }
        }
        if self.sequence_ms() > self.failsafe_ms {
            log::warn!(
                "Transition sequence ({:.0} ms) outlasts the failsafe ({:.0} ms); sessions will be cut short",
                self.sequence_ms(),
                self.failsafe_ms
            );
        }
        Ok(())
    }
}

/// How a session came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Failsafe,
    Superseded,
}

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionStats {
    pub started: u64,
    pub completed: u64,
    pub failsafe: u64,
    pub superseded: u64,
}

/// Full-screen overlay transition with a single `play` trigger
pub struct SceneTransition {
    config: TransitionConfig,
    rng: Pcg32,
    /// Transition clock (ms); advanced by the host
    clock_ms: f64,
    active: bool,
    phase: TransitionPhase,
    mode: TransitionMode,
    /// Time spent in the current phase (ms)
    phase_elapsed: f32,
    pending: Option<Callback>,
    failsafe: FailsafeTimer,
    stats: TransitionStats,
}

impl std::fmt::Debug for SceneTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneTransition")
            .field("active", &self.active)
            .field("phase", &self.phase)
            .field("mode", &self.mode)
            .field("phase_elapsed", &self.phase_elapsed)
            .field("pending", &self.pending.is_some())
            .field("failsafe", &self.failsafe)
            .finish()
    }
}

impl SceneTransition {
    pub fn new(config: TransitionConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: 0.0,
            active: false,
            phase: TransitionPhase::Entering,
            mode: TransitionMode::Bars,
            phase_elapsed: 0.0,
            pending: None,
            failsafe: FailsafeTimer::default(),
            stats: TransitionStats::default(),
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Replace the tuning; takes effect from the next session
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current phase; `Entering` while idle
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Mode of the current (or last) session
    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    pub fn now_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn failsafe(&self) -> &FailsafeTimer {
        &self.failsafe
    }

    pub fn stats(&self) -> TransitionStats {
        self.stats
    }

    /// Share of the current phase that has elapsed, in [0, 1]
    pub fn phase_progress(&self) -> f32 {
        let duration = self.config.phase_ms(self.phase);
        if duration <= 0.0 {
            1.0
        } else {
            (self.phase_elapsed / duration).clamp(0.0, 1.0)
        }
    }

    /// Start a transition; `on_complete` runs exactly once when it ends
    pub fn play(&mut self, on_complete: Option<Callback>) {
        if self.active {
            match self.config.retrigger {
                RetriggerPolicy::Restart => {
                    log::debug!("Transition retriggered mid-flight, restarting");
                    self.end_session(SessionEnd::Superseded);
                }
                RetriggerPolicy::Ignore => {
                    log::debug!("Transition already running, retrigger ignored");
                    if let Some(cb) = on_complete {
                        cb();
                    }
                    return;
                }
            }
        }

        self.pending = on_complete;
        self.mode = TransitionMode::choose(&self.config.modes, &mut self.rng);
        self.phase = TransitionPhase::Entering;
        self.phase_elapsed = 0.0;
        self.active = true;
        self.failsafe
            .arm(self.clock_ms, self.config.failsafe_ms.max(0.0) as f64);
        self.stats.started += 1;

        log::debug!("Transition started ({})", self.mode.as_str());
    }

    /// Convenience for `play(Some(Box::new(f)))`
    pub fn play_then(&mut self, f: impl FnOnce() + 'static) {
        self.play(Some(Box::new(f)));
    }

    /// Advance the transition clock only, firing the failsafe when due.
    ///
    /// This is the host's timer queue: it runs even when no frames render.
    pub fn tick_timers(&mut self, dt: f32) {
        self.clock_ms += sanitize_dt(dt) as f64;
        if self.failsafe.fire_if_due(self.clock_ms) && self.active {
            log::debug!(
                "Transition failsafe fired in {:?} ({})",
                self.phase,
                self.mode.as_str()
            );
            self.end_session(SessionEnd::Failsafe);
        }
    }

    /// One rendered frame: timers first, then the phase visuals.
    ///
    /// At most one phase completes per frame so no phase is ever skipped.
    pub fn advance(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);
        self.tick_timers(dt);
        self.advance_visuals(dt);
    }

    /// Phase visuals only; the clock and failsafe are left to `tick_timers`.
    ///
    /// For hosts that drive timers from a separate clock than frames.
    pub fn advance_visuals(&mut self, dt: f32) {
        if !self.active {
            return;
        }

        self.phase_elapsed += sanitize_dt(dt);
        if self.phase_elapsed >= self.config.phase_ms(self.phase) {
            self.complete_phase();
        }
    }

    /// Signal that the current phase's visuals finished; no-op while idle
    pub fn complete_phase(&mut self) {
        if !self.active {
            return;
        }
        match self.phase.next() {
            Some(next) => {
                log::debug!("Transition phase {:?} -> {:?}", self.phase, next);
                self.phase = next;
                self.phase_elapsed = 0.0;
            }
            None => self.end_session(SessionEnd::Completed),
        }
    }

    /// End any running session now, as the failsafe would (unmount)
    pub fn force_complete(&mut self) {
        if self.active {
            self.end_session(SessionEnd::Failsafe);
        }
    }

    fn end_session(&mut self, end: SessionEnd) {
        self.failsafe.cancel();
        self.active = false;
        self.phase = TransitionPhase::Entering;
        self.phase_elapsed = 0.0;

        match end {
            SessionEnd::Completed => self.stats.completed += 1,
            SessionEnd::Failsafe => self.stats.failsafe += 1,
            SessionEnd::Superseded => self.stats.superseded += 1,
        }

        if let Some(cb) = self.pending.take() {
            cb();
        }
    }

    /// Draw the overlay for the current phase; nothing while idle
    pub fn render(&self, canvas: &mut Canvas) {
        if !self.active {
            return;
        }
        visuals::draw(
            canvas,
            self.mode,
            self.phase,
            self.phase_progress(),
            &self.config.layout(),
            self.config.flash,
        );
    }
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.max(0.0) } else { 0.0 }
}
