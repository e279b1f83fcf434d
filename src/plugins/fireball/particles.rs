//! Particle state touched by gameplay: emitter budget and the attractor affector.
//!
//! Rendering is not our concern; particles here are plain data that the affector pushes
//! around so the trail bends back toward (or away from) its fireball.

use bevy::prelude::*;
use rand::Rng;

use crate::common::rng::DeterministicRng;

/// Below this squared distance a positive attractor swallows the particle.
const ATTRACTOR_EPS: f32 = 1e-2;
/// Jitter applied when a particle sits exactly on a repelling attractor.
const REPEL_JITTER: f32 = 0.1;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ParticleEmitter {
    pub enabled: bool,
    pub max_particles: f32,
    pub spawn_rate_max: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub energy: f32,
}

/// Particle → emitter link.
#[derive(Component, Debug, Clone, Copy)]
pub struct EmittedBy(pub Entity);

/// Point forces around an entity. Positive strength attracts, negative repels.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AttractorAffector {
    /// Entity whose position the attractor offsets are relative to.
    pub origin: Entity,
    pub attractors: Vec<(Vec3, f32)>,
}

impl AttractorAffector {
    /// Accelerate `particle` for `delta` seconds given the origin's position.
    ///
    /// Force falls off with the square of the distance. A particle that reaches an
    /// attracting point loses all its energy.
    pub fn accelerate(&self, origin: Vec3, particle: &mut Particle, rng: &mut impl Rng, delta: f32) {
        for &(offset, strength) in &self.attractors {
            let mut displacement = origin + offset - particle.position;
            let mut distance_sq = displacement.length_squared();

            let acceleration = if strength > 0.0 {
                if distance_sq < ATTRACTOR_EPS {
                    particle.energy = 0.0;
                    continue;
                }
                displacement.normalize() / distance_sq * strength
            } else if strength < 0.0 {
                if distance_sq == 0.0 {
                    displacement = Vec3::new(
                        rng.gen_range(-REPEL_JITTER..REPEL_JITTER),
                        rng.gen_range(-REPEL_JITTER..REPEL_JITTER),
                        rng.gen_range(-REPEL_JITTER..REPEL_JITTER),
                    );
                    distance_sq = displacement.length_squared();
                    if distance_sq == 0.0 {
                        continue;
                    }
                }
                -displacement.normalize() / distance_sq * -strength
            } else {
                continue;
            };

            particle.velocity += acceleration * delta;
        }
    }
}

pub fn apply_attractor_forces(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    q_affectors: Query<&AttractorAffector>,
    q_origins: Query<&Transform>,
    mut q_particles: Query<(&mut Particle, &EmittedBy)>,
) {
    let delta = time.delta_secs();

    for (mut particle, emitted_by) in &mut q_particles {
        let Ok(affector) = q_affectors.get(emitted_by.0) else {
            continue;
        };
        let Ok(origin) = q_origins.get(affector.origin) else {
            continue;
        };

        affector.accelerate(origin.translation, &mut particle, &mut rng.rng, delta);
        let velocity = particle.velocity;
        particle.position += velocity * delta;
    }
}
