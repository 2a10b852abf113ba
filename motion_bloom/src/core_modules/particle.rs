// THEORY:
// A `Particle` is the visual residue of one motion sample. It is born at the
// canvas point where motion was seen, circles that point on a small orbit,
// slides by a constant drift, and fades out over a few dozen frames.
//
// Lifecycle:
// - **Birth**: `spawn` draws every shape parameter from an injected
//   `ParticleRandom`, so tests can pin them down and a seeded run is repeatable.
// - **Life**: each `tick` advances the orbit angle and recomputes the position
//   from the fixed origin. The position is never integrated, so orbit and drift
//   do not accumulate error.
// - **Death**: alpha drops by `fade_speed` per tick and is floored at zero. A
//   particle at zero alpha is terminal and never comes back.

use crate::core_modules::ambient::Color;
use crate::core_modules::canvas::Canvas;
use crate::core_modules::drawing_area::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::ops::Range;

pub const MAX_ALPHA: f64 = 255.0;
/// Particles never render above this fraction of their own alpha.
pub const RENDER_ALPHA_SCALE: f64 = 0.7;

pub const ORBIT_RADIUS: Range<f64> = 2.0..6.0;
pub const ANGULAR_SPEED: Range<f64> = 0.08..0.15;
pub const SIZE: Range<f64> = 5.0..9.0;
pub const FADE_SPEED: Range<f64> = 5.0..8.0;
pub const DRIFT_MAGNITUDE: Range<f64> = 0.3..0.7;

/// Source of the uniform draws a particle needs at spawn time.
pub trait ParticleRandom {
    /// A value in `[min, max)`; returns `min` for an empty range.
    fn uniform(&mut self, min: f64, max: f64) -> f64;

    /// A direction on the unit circle.
    fn unit_vector(&mut self) -> Point {
        let angle = self.uniform(0.0, TAU);
        Point::new(angle.cos(), angle.sin())
    }
}

/// `ParticleRandom` backed by a `StdRng`, optionally seeded.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ParticleRandom for RandomSource {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }
}

/// Shape parameters fixed at birth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    pub angle: f64,
    pub orbit_radius: f64,
    pub angular_speed: f64,
    pub size: f64,
    pub fade_speed: f64,
    pub drift: Point,
}

impl ParticleParams {
    pub fn random(rng: &mut impl ParticleRandom) -> Self {
        let angle = rng.uniform(0.0, TAU);
        let orbit_radius = rng.uniform(ORBIT_RADIUS.start, ORBIT_RADIUS.end);
        let angular_speed = rng.uniform(ANGULAR_SPEED.start, ANGULAR_SPEED.end);
        let size = rng.uniform(SIZE.start, SIZE.end);
        let fade_speed = rng.uniform(FADE_SPEED.start, FADE_SPEED.end);
        let direction = rng.unit_vector();
        let magnitude = rng.uniform(DRIFT_MAGNITUDE.start, DRIFT_MAGNITUDE.end);
        Self {
            angle,
            orbit_radius,
            angular_speed,
            size,
            fade_speed,
            drift: Point::new(direction.x * magnitude, direction.y * magnitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    origin: Point,
    pub position: Point,
    pub angle: f64,
    pub angular_speed: f64,
    pub orbit_radius: f64,
    pub drift: Point,
    pub size: f64,
    pub alpha: f64,
    pub fade_speed: f64,
}

impl Particle {
    pub fn spawn(origin: Point, rng: &mut impl ParticleRandom) -> Self {
        Self::with_params(origin, ParticleParams::random(rng))
    }

    pub fn with_params(origin: Point, params: ParticleParams) -> Self {
        Self {
            origin,
            position: origin,
            angle: params.angle,
            angular_speed: params.angular_speed,
            orbit_radius: params.orbit_radius,
            drift: params.drift,
            size: params.size,
            alpha: MAX_ALPHA,
            fade_speed: params.fade_speed,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn tick(&mut self) {
        self.angle += self.angular_speed;
        let orbit = Point::new(
            self.angle.cos() * self.orbit_radius,
            self.angle.sin() * self.orbit_radius,
        );
        self.position = self.origin + orbit + self.drift;
        self.alpha = (self.alpha - self.fade_speed).max(0.0);
    }

    pub fn render(&self, canvas: &mut dyn Canvas, tint: Color) {
        canvas.fill_circle(self.position, self.size, tint.with_alpha(self.alpha * RENDER_ALPHA_SCALE));
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }
}
