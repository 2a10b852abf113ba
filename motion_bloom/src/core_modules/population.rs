// THEORY:
// The `ParticlePopulation` owns every live particle. It is not a
// tracker: particles have no identity, never match up with earlier motion, and
// never interact. Each frame it only runs the lifecycle.
//
// Key architectural principles:
// 1.  **Persistence**: Particles carry over between frames until they fade out.
//     The visible trail behind a moving hand is simply the older particles
//     still dying where the hand used to be.
// 2.  **Birth**: One particle per mapped motion sample, appended to the set.
// 3.  **Advance then Prune**: Every particle, new or old, is ticked and drawn,
//     then the dead ones are dropped in the same pass. A particle whose alpha
//     hits zero this frame is drawn once, invisibly, and is gone before the
//     next frame starts.
//
// With no motion the population can only shrink, and it empties within
// `ceil(255 / 5) = 51` frames because 5 is the slowest fade.

use crate::core_modules::ambient::Color;
use crate::core_modules::canvas::Canvas;
use crate::core_modules::drawing_area::Point;
use crate::core_modules::particle::{Particle, ParticleRandom};

#[derive(Debug, Default)]
pub struct ParticlePopulation {
    particles: Vec<Particle>,
}

impl ParticlePopulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Adds an already-built particle.
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Spawns one particle at every point and returns how many were added.
    pub fn spawn_at<I>(&mut self, points: I, rng: &mut impl ParticleRandom) -> usize
    where
        I: IntoIterator<Item = Point>,
    {
        let before = self.particles.len();
        self.particles
            .extend(points.into_iter().map(|point| Particle::spawn(point, &mut *rng)));
        self.particles.len() - before
    }

    /// Ticks and renders every particle, then drops the dead ones.
    /// Returns the number removed.
    pub fn advance(&mut self, canvas: &mut dyn Canvas, tint: Color) -> usize {
        let before = self.particles.len();
        self.particles.retain_mut(|particle| {
            particle.tick();
            particle.render(canvas, tint);
            !particle.is_dead()
        });
        before - self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
