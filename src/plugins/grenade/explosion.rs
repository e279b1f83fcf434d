//! Chain explosions through the block grid.
//!
//! A blast samples `max_range` random directions and walks `blast_steps` cells along
//! each. Destructible blocks on the way take the blast's damage; explosive blocks
//! detonate in turn, centred on their own cell with their own config.
//!
//! Every block detonates at most once per blast: the detonated list is threaded through
//! the recursion and a block already in it only takes damage. With a finite grid this
//! bounds the recursion depth by the number of explosive blocks.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::rng::DeterministicRng;
use crate::common::tunables::Tunables;
use crate::plugins::health::inflict_damage;
use crate::plugins::world::{block_at, cell_of};

use super::ExplosionConfig;

pub const EXPLOSION_SOUNDS: [&str; 5] = [
    "sounds/explode1.ogg",
    "sounds/explode2.ogg",
    "sounds/explode3.ogg",
    "sounds/explode4.ogg",
    "sounds/explode5.ogg",
];

/// Source of blast randomness.
pub trait BlastSampler {
    /// A unit direction.
    fn direction(&mut self) -> Vec3;
    /// An index in `0..count`.
    fn sound(&mut self, count: usize) -> usize;
}

/// Sampler backed by a ChaCha stream forked from the world's `DeterministicRng`.
pub struct RngSampler {
    rng: ChaCha8Rng,
}

impl RngSampler {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Fork a stream off the world RNG. Advances the world RNG by one draw.
    pub fn fork(world: &mut World) -> Self {
        let seed = world.get_resource_or_init::<DeterministicRng>().rng.r#gen::<u64>();
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl BlastSampler for RngSampler {
    fn direction(&mut self) -> Vec3 {
        // Rejection-sample the unit ball, then project onto the sphere.
        loop {
            let candidate = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            let length_sq = candidate.length_squared();
            if length_sq > 1e-6 && length_sq <= 1.0 {
                return candidate / length_sq.sqrt();
            }
        }
    }

    fn sound(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.rng.gen_range(0..count)
    }
}

/// Smoke left behind by a blast.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplosionEffect {
    pub sound: &'static str,
}

#[derive(Component, Debug, Deref, DerefMut)]
pub struct EffectLifetime(pub Timer);

/// What one (possibly chained) blast did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExplosionReport {
    /// Explosive blocks set off by the blast, in detonation order.
    pub detonated: Vec<Entity>,
    /// Damage applications to blocks, across the whole chain.
    pub blocks_damaged: u32,
    pub effects: Vec<Entity>,
}

/// Detonate a blast at `center`.
///
/// `instigator` is the block that exploded, if any; it takes damage like any other
/// block but never re-detonates itself.
pub fn detonate(
    world: &mut World,
    center: Vec3,
    config: &ExplosionConfig,
    instigator: Option<Entity>,
    sampler: &mut impl BlastSampler,
) -> ExplosionReport {
    let mut report = ExplosionReport::default();
    propagate(world, center, config, instigator, sampler, &mut report);
    info!(
        "explosion at {center}: {} chained, {} block hits",
        report.detonated.len(),
        report.blocks_damaged
    );
    report
}

fn propagate(
    world: &mut World,
    center: Vec3,
    config: &ExplosionConfig,
    instigator: Option<Entity>,
    sampler: &mut impl BlastSampler,
    report: &mut ExplosionReport,
) {
    let effect = spawn_effect(world, center, sampler);
    report.effects.push(effect);

    let steps = world.get_resource::<Tunables>().map_or(4, |t| t.blast_steps);

    for _ in 0..config.max_range {
        let direction = sampler.direction();

        for step in 0..steps {
            let cell = cell_of(center + direction * step as f32);
            let Some(block) = block_at(world, cell) else {
                continue;
            };
            if !block.destructible {
                continue;
            }

            let chain = world.get::<ExplosionConfig>(block.entity).copied();
            match chain {
                Some(next)
                    if instigator != Some(block.entity)
                        && !report.detonated.contains(&block.entity) =>
                {
                    report.detonated.push(block.entity);
                    propagate(world, cell.as_vec3(), &next, Some(block.entity), sampler, report);
                }
                _ => {
                    inflict_damage(
                        world,
                        block.entity,
                        config.damage_amount,
                        config.damage_type,
                        instigator,
                    );
                    report.blocks_damaged += 1;
                }
            }
        }
    }
}

fn spawn_effect(world: &mut World, center: Vec3, sampler: &mut impl BlastSampler) -> Entity {
    let sound = EXPLOSION_SOUNDS[sampler.sound(EXPLOSION_SOUNDS.len()) % EXPLOSION_SOUNDS.len()];
    let lifetime = world
        .get_resource::<Tunables>()
        .map_or(2.0, |t| t.effect_lifetime);

    world
        .spawn((
            Name::new("ExplosionEffect"),
            ExplosionEffect { sound },
            EffectLifetime(Timer::from_seconds(lifetime, TimerMode::Once)),
            Transform::from_translation(center),
        ))
        .id()
}

pub fn expire_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut EffectLifetime)>,
) {
    for (e, mut lifetime) in &mut q {
        lifetime.tick(time.delta());
        if lifetime.is_finished() {
            commands.entity(e).despawn();
        }
    }
}
