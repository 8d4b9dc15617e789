//! Frame-loop composition of the effects
//!
//! One stage per mounted page: a particle field under a scene transition,
//! both drawn into one canvas, plus the navigation gate that waits on the
//! transition.

use glam::Vec2;

use crate::burst::{BurstOptions, ParticleField, REFERENCE_FRAME_MS};
use crate::error::Result;
use crate::navigation::Navigator;
use crate::renderer::Canvas;
use crate::settings::FxSettings;
use crate::transition::{Callback, SceneTransition, TransitionConfig};

/// Longest frame the particle simulation integrates in one step (ms)
pub const MAX_FRAME_MS: f32 = 100.0;

#[derive(Debug)]
pub struct FxStage {
    field: ParticleField,
    transition: SceneTransition,
    navigator: Navigator,
    canvas: Canvas,
    burst: BurstOptions,
    transitions_enabled: bool,
    /// Timestamp of the previous frame (particles, phase visuals)
    last_frame: Option<f64>,
    /// Timestamp the transition clock and navigation fallback have reached
    last_timer: Option<f64>,
}

/// Transition tuning from settings, or the defaults when it cannot run
fn checked_transition(settings: &FxSettings) -> TransitionConfig {
    let config = settings.effective_transition();
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("Ignoring transition settings ({}), using defaults", e);
            TransitionConfig {
                flash: config.flash,
                ..TransitionConfig::default()
            }
        }
    }
}

impl FxStage {
    pub fn new(settings: &FxSettings, route: &str, width: u32, height: u32, seed: u64) -> Self {
        let mut field = ParticleField::new(settings.effective_burst_config(), seed);
        field.set_max_particles(Some(settings.max_particles()));
        let transition = SceneTransition::new(checked_transition(settings), seed.wrapping_add(1));

        Self {
            field,
            transition,
            navigator: Navigator::new(route),
            canvas: Canvas::new(width, height),
            burst: settings.effective_burst(),
            transitions_enabled: settings.transitions,
            last_frame: None,
            last_timer: None,
        }
    }

    /// Swap in new preferences; running particles and sessions keep going
    pub fn apply_settings(&mut self, settings: &FxSettings) {
        self.field.set_config(settings.effective_burst_config());
        self.field.set_max_particles(Some(settings.max_particles()));
        self.transition.set_config(checked_transition(settings));
        self.burst = settings.effective_burst();
        self.transitions_enabled = settings.transitions;
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn transition(&self) -> &SceneTransition {
        &self.transition
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Track the viewport; clears the canvas
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
    }

    /// Burst at a pointer position (viewport pixels)
    pub fn click(&mut self, x: f32, y: f32) -> Result<usize> {
        self.field.spawn(Vec2::new(x, y), &self.burst)
    }

    /// Play the transition without navigating
    pub fn play(&mut self, on_complete: Option<Callback>) {
        self.transition.play(on_complete);
    }

    /// Request a route change; returns the route when it applies immediately
    pub fn navigate(&mut self, route: &str) -> Option<String> {
        let transition = self.transitions_enabled.then_some(&mut self.transition);
        self.navigator.go(route, transition)
    }

    /// Bring the transition clock and navigation fallback up to `now_ms`.
    ///
    /// Frames and timer ticks share this clock, so time is never counted
    /// twice or lost when both run.
    fn sync_timers(&mut self, now_ms: f64) -> Option<String> {
        let dt = match self.last_timer {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_timer = Some(self.last_timer.map_or(now_ms, |last| last.max(now_ms)));
        self.transition.tick_timers(dt);
        self.navigator.tick(dt)
    }

    /// Timers only, for when frames are not being delivered (hidden tab)
    pub fn tick_timers(&mut self, now_ms: f64) -> Option<String> {
        self.sync_timers(now_ms)
    }

    /// One display frame; returns a route the navigator released, if any
    pub fn frame(&mut self, now_ms: f64) -> Option<String> {
        let dt = match self.last_frame {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => REFERENCE_FRAME_MS,
        };
        self.last_frame = Some(now_ms);

        self.canvas.clear();
        self.field.advance(dt.min(MAX_FRAME_MS));
        let route = self.sync_timers(now_ms);
        self.transition.advance_visuals(dt);
        // A phase completing this frame may release the route now
        let route = route.or_else(|| self.navigator.tick(0.0));

        self.field.render(&mut self.canvas);
        self.transition.render(&mut self.canvas);
        route
    }

    /// Unmount: drop particles and end any session (its callback still runs)
    pub fn teardown(&mut self) -> Option<String> {
        self.field.clear();
        self.transition.force_complete();
        self.canvas.clear();
        self.navigator.tick(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionPhase;

    fn stage() -> FxStage {
        FxStage::new(&FxSettings::default(), "/", 800, 600, 42)
    }

    fn run(stage: &mut FxStage, start: f64, frames: usize) -> (f64, Vec<String>) {
        let mut now = start;
        let mut routes = Vec::new();
        for _ in 0..frames {
            now += REFERENCE_FRAME_MS as f64;
            routes.extend(stage.frame(now));
        }
        (now, routes)
    }

    #[test]
    fn test_click_spawns_and_particles_fade_out() {
        let mut stage = stage();
        assert_eq!(stage.click(100.0, 100.0).unwrap(), 40);
        stage.frame(0.0);
        assert!(!stage.canvas().is_empty());

        run(&mut stage, 0.0, 60);
        assert!(stage.field().is_empty());
        assert!(stage.canvas().is_empty());
    }

    #[test]
    fn test_navigation_waits_for_transition() {
        let mut stage = stage();
        assert_eq!(stage.navigate("/projects"), None);
        assert!(stage.transition().is_active());

        let (_, routes) = run(&mut stage, 0.0, 30);
        assert!(routes.is_empty());
        assert_ne!(stage.transition().phase(), TransitionPhase::Entering);

        let (_, routes) = run(&mut stage, 500.0, 60);
        assert_eq!(routes, vec!["/projects".to_string()]);
        assert_eq!(stage.navigator().current(), "/projects");
    }

    #[test]
    fn test_transitions_disabled_navigates_at_once() {
        let settings = FxSettings {
            transitions: false,
            ..Default::default()
        };
        let mut stage = FxStage::new(&settings, "/", 800, 600, 1);
        assert_eq!(stage.navigate("/about"), Some("/about".to_string()));
        assert!(!stage.transition().is_active());
    }

    #[test]
    fn test_hidden_tab_still_navigates() {
        let mut stage = stage();
        stage.frame(0.0);
        stage.navigate("/about");
        // No frames, only timer ticks
        assert_eq!(stage.tick_timers(600.0), None);
        assert_eq!(stage.tick_timers(1300.0), Some("/about".to_string()));
        assert!(!stage.transition().is_active());
    }

    #[test]
    fn test_zero_viewport_skips_rendering() {
        let mut stage = stage();
        stage.resize(0, 0);
        stage.click(10.0, 10.0).unwrap();
        stage.play(None);
        stage.frame(0.0);
        assert!(stage.canvas().is_empty());
        assert_eq!(stage.field().len(), 40);

        stage.resize(640, 480);
        stage.frame(16.0);
        assert!(!stage.canvas().is_empty());
    }

    #[test]
    fn test_teardown_releases_pending_route() {
        let mut stage = stage();
        stage.click(5.0, 5.0).unwrap();
        stage.navigate("/projects");
        assert_eq!(stage.teardown(), Some("/projects".to_string()));
        assert!(stage.field().is_empty());
        assert!(!stage.transition().is_active());
    }

    #[test]
    fn test_particles_off_spawns_nothing() {
        let settings = FxSettings {
            particles: false,
            ..Default::default()
        };
        let mut stage = FxStage::new(&settings, "/", 800, 600, 1);
        assert_eq!(stage.click(10.0, 10.0).unwrap(), 0);
        assert!(stage.field().is_empty());
    }

    #[test]
    fn test_timer_ticks_do_not_steal_frame_time() {
        let mut frames_only = stage();
        let mut with_ticks = stage();
        for s in [&mut frames_only, &mut with_ticks] {
            s.click(50.0, 50.0).unwrap();
            s.play(None);
        }

        let mut next_tick = 100.0;
        for k in 1..=90 {
            let now = k as f64 * REFERENCE_FRAME_MS as f64;
            while next_tick < now {
                with_ticks.tick_timers(next_tick);
                next_tick += 100.0;
            }
            frames_only.frame(now);
            with_ticks.frame(now);

            if k == 12 {
                let age = |s: &FxStage| s.field().particles()[0].age;
                assert_eq!(age(&frames_only), age(&with_ticks));
            }
        }

        for s in [&frames_only, &with_ticks] {
            let stats = s.transition().stats();
            assert_eq!(stats.completed, 1);
            assert_eq!(stats.failsafe, 0);
        }
    }

    #[test]
    fn test_unusable_transition_settings_fall_back() {
        let json = r#"{"transition": {"enter_ms": -5, "flash": false}}"#;
        let settings = FxSettings::from_json(json).unwrap();
        let mut stage = FxStage::new(&settings, "/", 800, 600, 3);
        let defaults = TransitionConfig::default();
        assert_eq!(stage.transition().config().enter_ms, defaults.enter_ms);
        assert!(!stage.transition().config().flash);

        let mut stalled = FxSettings::default();
        stalled.transition.exit_ms = f32::NAN;
        stage.apply_settings(&stalled);
        assert_eq!(stage.transition().config().exit_ms, defaults.exit_ms);

        stage.play(None);
        run(&mut stage, 0.0, 80);
        assert_eq!(stage.transition().stats().completed, 1);
        assert_eq!(stage.transition().stats().failsafe, 0);
    }
}
