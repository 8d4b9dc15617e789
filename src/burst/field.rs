//! Particle field: owns every live burst particle
//!
//! One field per mounted view. The host calls `advance` once per frame with
//! the elapsed milliseconds, then `render` into the frame's canvas.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::config::{BurstConfig, BurstOptions};
use super::particle::{Forces, Particle, REFERENCE_FRAME_MS};
use crate::error::Result;
use crate::renderer::Canvas;

/// Per-particle drag range (velocity retained per frame)
const DRAG_MIN: f32 = 0.994;
const DRAG_MAX: f32 = 0.997;

/// Smallest particle footprint in pixels
pub const MIN_PARTICLE_SIZE: u32 = 3;

/// Owner of the live particle set
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: BurstConfig,
    particles: Vec<Particle>,
    rng: Pcg32,
    /// Live particle cap; oldest particles are evicted past it
    max_particles: Option<usize>,
}

impl ParticleField {
    /// Create a field with the given base config and RNG seed
    pub fn new(config: BurstConfig, seed: u64) -> Self {
        Self {
            config,
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            max_particles: None,
        }
    }

    /// Limit the number of live particles (`None` for unbounded)
    pub fn set_max_particles(&mut self, max: Option<usize>) {
        self.max_particles = max;
        self.enforce_cap();
    }

    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BurstConfig) {
        self.config = config;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawn one burst at `origin`, with `options` layered over the base config.
    ///
    /// Returns the number of particles added.
    pub fn spawn(&mut self, origin: Vec2, options: &BurstOptions) -> Result<usize> {
        let config = self.config.with_options(options);
        self.spawn_with(origin, &config)
    }

    /// Spawn one burst from a fully-resolved config
    pub fn spawn_with(&mut self, origin: Vec2, config: &BurstConfig) -> Result<usize> {
        config.validate()?;

        // Never spawn what the cap would evict straight away
        let count = match self.max_particles {
            Some(max) => config.particle_count().min(max),
            None => config.particle_count(),
        };
        if count == 0 {
            return Ok(0);
        }
        let forces = Forces::from(config);
        self.particles.reserve(count);

        for _ in 0..count {
            let particle = self.make_particle(origin, config, forces);
            self.particles.push(particle);
        }
        self.enforce_cap();

        log::debug!(
            "Burst of {} at ({:.0}, {:.0}), {} live",
            count,
            origin.x,
            origin.y,
            self.particles.len()
        );
        Ok(count)
    }

    fn make_particle(&mut self, origin: Vec2, config: &BurstConfig, forces: Forces) -> Particle {
        let rng = &mut self.rng;

        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = config.speed * random_in(rng, config.speed_var);
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;

        let size = ((config.size * random_in(rng, [0.8, 1.2])).round() as u32).max(MIN_PARTICLE_SIZE);
        let lifespan = config.life * random_in(rng, [0.85, 1.25]);
        let color = config.palette[rng.random_range(0..config.palette.len())];
        let kick = config.radial_impulse * random_in(rng, config.radial_impulse_var);
        let drag = Vec2::new(
            random_in(rng, [DRAG_MIN, DRAG_MAX]),
            random_in(rng, [DRAG_MIN, DRAG_MAX]),
        );

        Particle {
            pos: origin,
            vel,
            origin,
            age: 0.0,
            lifespan,
            size,
            color,
            kick,
            drag,
            alpha: 1.0,
            forces,
        }
    }

    fn enforce_cap(&mut self) {
        if let Some(max) = self.max_particles {
            if self.particles.len() > max {
                // Oldest particles sit at the front
                let excess = self.particles.len() - max;
                self.particles.drain(..excess);
            }
        }
    }

    /// Advance every particle by `dt` ms; expired particles are removed immediately
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let t_scale = dt / REFERENCE_FRAME_MS;
        self.particles.retain_mut(|p| p.step(dt, t_scale));
    }

    /// Draw live particles as hard-edged squares
    pub fn render(&self, canvas: &mut Canvas) {
        if !canvas.is_ready() {
            return;
        }
        for p in &self.particles {
            if p.expired() {
                continue;
            }
            let size = p.size as f32;
            canvas.fill_rect(
                p.pos.x.trunc(),
                p.pos.y.trunc(),
                size,
                size,
                p.color.to_f32(p.alpha),
            );
        }
    }

    /// Drop every particle (unmount)
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// Uniform sample from `[min, max)`; degenerate ranges return `min`
fn random_in(rng: &mut Pcg32, [min, max]: [f32; 2]) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burst::color::Rgba;
    use crate::error::FxError;

    fn white_burst(count: i32) -> BurstOptions {
        BurstOptions {
            count: Some(count),
            palette: Some(vec![Rgba::parse("#fff").unwrap()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_five_white_particles() {
        let mut field = ParticleField::new(BurstConfig::default(), 7);
        let added = field.spawn(Vec2::new(100.0, 100.0), &white_burst(5)).unwrap();

        assert_eq!(added, 5);
        assert_eq!(field.len(), 5);
        for p in field.particles() {
            assert_eq!(p.color, Rgba::WHITE);
            assert_eq!(p.origin, Vec2::new(100.0, 100.0));
            assert_eq!(p.pos, p.origin);
            assert!(p.size >= MIN_PARTICLE_SIZE);
            assert!((DRAG_MIN..=DRAG_MAX).contains(&p.drag.x));
            assert!((DRAG_MIN..=DRAG_MAX).contains(&p.drag.y));
        }
    }

    #[test]
    fn test_spawn_empty_palette_fails_fast() {
        let mut field = ParticleField::new(BurstConfig::default(), 7);
        let options = BurstOptions {
            palette: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(field.spawn(Vec2::ZERO, &options), Err(FxError::EmptyPalette));
        assert!(field.is_empty());
    }

    #[test]
    fn test_spawn_negative_count_adds_nothing() {
        let mut field = ParticleField::new(BurstConfig::default(), 7);
        assert_eq!(field.spawn(Vec2::ZERO, &white_burst(-4)).unwrap(), 0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_tiny_size_floors_at_three() {
        let mut field = ParticleField::new(BurstConfig::default(), 3);
        let options = BurstOptions {
            size: Some(0.5),
            ..white_burst(20)
        };
        field.spawn(Vec2::ZERO, &options).unwrap();
        assert!(field.particles().iter().all(|p| p.size == MIN_PARTICLE_SIZE));
    }

    #[test]
    fn test_particles_removed_after_lifespan() {
        let mut field = ParticleField::new(BurstConfig::default(), 11);
        let options = BurstOptions {
            life: Some(100.0),
            ..white_burst(10)
        };
        field.spawn(Vec2::new(50.0, 50.0), &options).unwrap();

        // Max lifespan is 100 * 1.25
        for _ in 0..7 {
            field.advance(REFERENCE_FRAME_MS);
        }
        assert!(field.particles().iter().all(|p| p.age < p.lifespan));
        for _ in 0..2 {
            field.advance(REFERENCE_FRAME_MS);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn test_advance_ignores_bad_dt() {
        let mut field = ParticleField::new(BurstConfig::default(), 1);
        field.spawn(Vec2::ZERO, &white_burst(3)).unwrap();
        field.advance(-50.0);
        field.advance(f32::NAN);
        assert!(field.particles().iter().all(|p| p.age == 0.0));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut field = ParticleField::new(BurstConfig::default(), 5);
        field.set_max_particles(Some(8));
        field.spawn(Vec2::ZERO, &white_burst(5)).unwrap();
        field.spawn(Vec2::new(10.0, 10.0), &white_burst(5)).unwrap();
        assert_eq!(field.len(), 8);
        let from_first = field
            .particles()
            .iter()
            .filter(|p| p.origin == Vec2::ZERO)
            .count();
        assert_eq!(from_first, 3);
    }

    #[test]
    fn test_zero_cap_spawns_nothing() {
        let mut field = ParticleField::new(BurstConfig::default(), 6);
        field.set_max_particles(Some(0));
        assert_eq!(field.spawn(Vec2::ZERO, &white_burst(5)).unwrap(), 0);
        assert!(field.is_empty());

        // A burst larger than the cap only adds what fits
        field.set_max_particles(Some(3));
        assert_eq!(field.spawn(Vec2::ZERO, &white_burst(5)).unwrap(), 3);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_render_skips_missing_surface() {
        let mut field = ParticleField::new(BurstConfig::default(), 9);
        field.spawn(Vec2::new(20.0, 20.0), &white_burst(4)).unwrap();

        let mut hidden = Canvas::new(0, 0);
        field.render(&mut hidden);
        assert!(hidden.is_empty());

        let mut canvas = Canvas::new(200, 200);
        field.render(&mut canvas);
        assert_eq!(canvas.vertices().len(), 4 * 6);
    }

    #[test]
    fn test_same_seed_same_burst() {
        let mut a = ParticleField::new(BurstConfig::default(), 42);
        let mut b = ParticleField::new(BurstConfig::default(), 42);
        a.spawn(Vec2::new(5.0, 5.0), &BurstOptions::default()).unwrap();
        b.spawn(Vec2::new(5.0, 5.0), &BurstOptions::default()).unwrap();
        for _ in 0..10 {
            a.advance(REFERENCE_FRAME_MS);
            b.advance(REFERENCE_FRAME_MS);
        }
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.pos, pb.pos);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn spawn_adds_exactly_count(count in 0i32..200, seed in any::<u64>()) {
                let mut field = ParticleField::new(BurstConfig::default(), seed);
                let added = field.spawn(Vec2::new(100.0, 100.0), &white_burst(count)).unwrap();
                prop_assert_eq!(added, count as usize);
                prop_assert_eq!(field.len(), count as usize);
                prop_assert!(field.particles().iter().all(|p| p.size >= MIN_PARTICLE_SIZE));
            }

            #[test]
            fn age_is_monotonic_until_removal(
                seed in any::<u64>(),
                dts in prop::collection::vec(0.0f32..60.0, 1..40),
            ) {
                let mut field = ParticleField::new(BurstConfig::default(), seed);
                field.spawn(Vec2::new(300.0, 200.0), &white_burst(10)).unwrap();

                for dt in dts {
                    let before: Vec<f32> = field.particles().iter().map(|p| p.age).collect();
                    let lifespans: Vec<f32> = field.particles().iter().map(|p| p.lifespan).collect();
                    field.advance(dt);

                    let survivors = before
                        .iter()
                        .zip(&lifespans)
                        .filter(|(age, life)| **age + dt < **life)
                        .count();
                    prop_assert_eq!(field.len(), survivors);
                    for p in field.particles() {
                        prop_assert!(p.age < p.lifespan);
                        prop_assert!(p.alpha >= 0.0 && p.alpha <= 1.0);
                    }
                }
            }
        }
    }
}
