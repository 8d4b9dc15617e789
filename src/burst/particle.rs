//! Burst particle and its per-frame force integration

use glam::Vec2;

use super::color::Rgba;
use super::config::BurstConfig;

/// Reference frame duration (ms); forces are tuned per 60 Hz frame
pub const REFERENCE_FRAME_MS: f32 = 16.67;

/// Share of a particle's life over which the radial kick dies out
pub const KICK_WINDOW: f32 = 0.30;

/// Fade rate; alpha hits zero at 80% of life
pub const FADE_RATE: f32 = 1.25;

/// Swirl falloff per pixel of distance from the origin
const SWIRL_FALLOFF: f32 = 0.02;

/// Floor for the origin distance so the radial frame stays defined
const MIN_DIST: f32 = 1e-6;

/// Forces a particle inherits from the burst that spawned it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    pub gravity: f32,
    /// Tangential strength, `None` when swirl is disabled
    pub swirl: Option<f32>,
    pub radial_impulse: bool,
    pub radial_damp: f32,
}

impl From<&BurstConfig> for Forces {
    fn from(config: &BurstConfig) -> Self {
        Self {
            gravity: config.gravity,
            swirl: config.swirl.then_some(config.swirl_strength),
            radial_impulse: config.radial_impulse > 0.0,
            radial_damp: config.radial_damp,
        }
    }
}

/// A single pixel particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Spawn point; radial and tangential directions are measured from here
    pub origin: Vec2,
    /// Elapsed time (ms)
    pub age: f32,
    /// Total time to live (ms)
    pub lifespan: f32,
    pub size: u32,
    pub color: Rgba,
    /// Radial impulse multiplier
    pub kick: f32,
    /// Per-axis velocity retention applied every frame
    pub drag: Vec2,
    /// Render alpha from the last advance
    pub alpha: f32,
    pub forces: Forces,
}

impl Particle {
    /// Whether the particle has used up its lifespan
    #[inline]
    pub fn expired(&self) -> bool {
        self.age >= self.lifespan
    }

    /// Unit vector from origin to the particle and the distance it was measured over
    pub fn radial_frame(&self) -> (Vec2, f32) {
        let offset = self.pos - self.origin;
        let dist = offset.length().max(MIN_DIST);
        (offset / dist, dist)
    }

    /// Age the particle by `dt` ms and integrate one step.
    ///
    /// Returns false once the particle has expired; expired particles are
    /// not integrated.
    pub fn step(&mut self, dt: f32, t_scale: f32) -> bool {
        self.age += dt;
        if self.expired() {
            return false;
        }

        self.vel.y += self.forces.gravity * t_scale;

        let (radial, dist) = self.radial_frame();
        let tangent = radial.perp();

        if let Some(strength) = self.forces.swirl {
            let swirl = strength / (1.0 + dist * SWIRL_FALLOFF);
            self.vel += tangent * swirl * t_scale;
        }

        if self.forces.radial_impulse {
            let decay = (1.0 - self.age / (self.lifespan * KICK_WINDOW)).max(0.0);
            self.vel += radial * self.kick * decay * t_scale;
        }

        if self.forces.radial_damp > 0.0 {
            self.vel = damp_radial(self.vel, radial, self.forces.radial_damp * t_scale);
        }

        self.pos += self.vel * t_scale;
        self.vel *= self.drag;

        self.alpha = fade_alpha(self.age, self.lifespan);
        true
    }
}

/// Shrink the component of `vel` along `radial` by `damp` (clamped to [0, 1]).
///
/// Only the delta is applied, so the tangential component is untouched and the
/// radial component never changes sign.
pub fn damp_radial(vel: Vec2, radial: Vec2, damp: f32) -> Vec2 {
    let v_rad = vel.dot(radial);
    let v_rad_after = v_rad * (1.0 - damp).max(0.0);
    vel + radial * (v_rad_after - v_rad)
}

/// Alpha for a particle `age` ms into a `lifespan` ms life
#[inline]
pub fn fade_alpha(age: f32, lifespan: f32) -> f32 {
    (1.0 - (age / lifespan) * FADE_RATE).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_at(pos: Vec2, vel: Vec2) -> Particle {
        Particle {
            pos,
            vel,
            origin: Vec2::ZERO,
            age: 0.0,
            lifespan: 400.0,
            size: 4,
            color: Rgba::WHITE,
            kick: 0.0,
            drag: Vec2::ONE,
            alpha: 1.0,
            forces: Forces {
                gravity: 0.0,
                swirl: None,
                radial_impulse: false,
                radial_damp: 0.0,
            },
        }
    }

    #[test]
    fn test_particle_expires() {
        let mut p = particle_at(Vec2::new(5.0, 0.0), Vec2::new(1.0, 0.0));
        assert!(p.step(399.0, 1.0));
        let pos = p.pos;
        assert!(!p.step(1.0, 1.0), "particle should expire at age == lifespan");
        assert_eq!(p.pos, pos, "expired particle must not be integrated");
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut p = particle_at(Vec2::new(5.0, 0.0), Vec2::ZERO);
        p.forces.gravity = 0.5;
        p.step(REFERENCE_FRAME_MS, 1.0);
        assert!((p.vel.y - 0.5).abs() < 1e-6);
        assert!(p.pos.y > 0.0, "screen y grows downward");
    }

    #[test]
    fn test_swirl_is_tangential() {
        let mut p = particle_at(Vec2::new(10.0, 0.0), Vec2::ZERO);
        p.forces.swirl = Some(1.2);
        p.step(REFERENCE_FRAME_MS, 1.0);
        // Tangent of +x is +y; strength decays as 1 / (1 + 10 * 0.02)
        assert!(p.vel.x.abs() < 1e-6);
        assert!((p.vel.y - 1.2 / 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_kick_decays_within_window() {
        let mut early = particle_at(Vec2::new(1.0, 0.0), Vec2::ZERO);
        early.forces.radial_impulse = true;
        early.kick = 1.0;
        early.step(10.0, 1.0);
        assert!(early.vel.x > 0.9);

        let mut late = particle_at(Vec2::new(1.0, 0.0), Vec2::ZERO);
        late.forces.radial_impulse = true;
        late.kick = 1.0;
        late.age = 130.0;
        late.step(10.0, 1.0);
        assert_eq!(late.vel.x, 0.0, "kick is gone after 30% of life");
    }

    #[test]
    fn test_damp_radial_keeps_tangential() {
        let radial = Vec2::X;
        let damped = damp_radial(Vec2::new(2.0, 3.0), radial, 0.5);
        assert!((damped.x - 1.0).abs() < 1e-6);
        assert!((damped.y - 3.0).abs() < 1e-6);

        // Over-damping clamps at zero rather than reversing
        let clamped = damp_radial(Vec2::new(2.0, 3.0), radial, 4.0);
        assert!(clamped.x.abs() < 1e-6);
        assert!((clamped.y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_fade_alpha() {
        assert_eq!(fade_alpha(0.0, 400.0), 1.0);
        assert!((fade_alpha(200.0, 400.0) - 0.375).abs() < 1e-6);
        assert_eq!(fade_alpha(320.0, 400.0), 0.0);
        assert_eq!(fade_alpha(390.0, 400.0), 0.0);
    }
}
