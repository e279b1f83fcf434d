//! Fireball archetype: a projectile whose own health is its damage budget.
//!
//! A fireball hitting something trades health with the target: it deals its current
//! health as damage, and loses exactly what the target lost. Surviving fireballs keep
//! flying with a thinner trail; the default resolver never sees the hit.

pub mod particles;

use std::num::NonZeroU32;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::health::{inflict_damage, DamageOutcome, DamageType, Health};
use crate::plugins::projectiles::components::{MaxDistance, ProjectileAction};
use crate::plugins::projectiles::hit::{HitHandlerAppExt, HitPriority, HitPropagation, HitTarget};
use crate::plugins::projectiles::messages::ProjectileFired;

use particles::{AttractorAffector, ParticleEmitter};

const FIREBALL_RANGE: NonZeroU32 = NonZeroU32::new(64).expect("non-zero literal");

/// Marker for the fireball archetype.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Fireball;

pub fn fireball_action() -> ProjectileAction {
    ProjectileAction {
        icon_scale: 0.5,
        initial_orientation: Vec3::Z,
        initial_velocity: 12.0,
        max_distance: MaxDistance::Limited(FIREBALL_RANGE),
        damage_amount: 0,
        projectiles_per_second: 2.0,
        damage_type: DamageType::Fire,
        ..default()
    }
}

/// A fireball item with `health` points of damage to spend.
pub fn fireball_bundle(health: i32) -> impl Bundle {
    (
        Name::new("Fireball"),
        Fireball,
        fireball_action(),
        Health::full(health),
        ParticleEmitter {
            enabled: false,
            max_particles: 50.0,
            spawn_rate_max: 20.0,
        },
    )
}

pub fn plugin(app: &mut App) {
    app.add_observer(on_fireball_fired);
    app.add_hit_handler(HitPriority::Normal, fireball_hit_handler);
    app.add_systems(
        Update,
        particles::apply_attractor_forces.run_if(in_state(GameState::InGame)),
    );
}

/// Observer: light the trail and hide the item mesh once the fireball leaves the hand.
pub fn on_fireball_fired(
    fired: On<ProjectileFired>,
    mut commands: Commands,
    mut q_emitter: Query<&mut ParticleEmitter, With<Fireball>>,
) {
    let Ok(mut emitter) = q_emitter.get_mut(fired.entity) else {
        return;
    };
    emitter.enabled = true;

    let backwards = -fired.direction.normalize_or_zero();
    commands
        .entity(fired.entity)
        .insert(AttractorAffector {
            origin: fired.entity,
            attractors: vec![(Vec3::ZERO, -0.1), (backwards * 0.1, -0.3)],
        })
        .remove::<Mesh3d>();
}

/// Symmetric damage exchange between a fireball and whatever it hit.
///
/// The target takes the archetype's damage type. The recoil is `Direct` so the fireball's
/// own armour can never make it lose less than the target did.
pub fn fireball_hit_handler(In(hit): In<HitTarget>, world: &mut World) -> HitPropagation {
    let Some((fireball, damage_type)) = world
        .get_entity(hit.projectile)
        .ok()
        .filter(|projectile| projectile.contains::<Fireball>())
        .and_then(|projectile| {
            let health = projectile.get::<Health>().copied()?;
            let damage_type = projectile
                .get::<ProjectileAction>()
                .map_or(DamageType::Fire, |action| action.damage_type);
            Some((health, damage_type))
        })
    else {
        return HitPropagation::Continue;
    };

    let before = world.get::<Health>(hit.target).map_or(0, |health| health.current);
    let after = match inflict_damage(
        world,
        hit.target,
        fireball.current,
        damage_type,
        Some(hit.projectile),
    ) {
        DamageOutcome::Applied { remaining, .. } => remaining,
        DamageOutcome::Destroyed { .. } => 0,
        DamageOutcome::Immune | DamageOutcome::Missing => before,
    };
    let lost = (before - after).max(0);

    let recoil = inflict_damage(
        world,
        hit.projectile,
        lost,
        DamageType::Direct,
        Some(hit.target),
    );

    if matches!(recoil, DamageOutcome::Applied { .. }) {
        thin_trail(world, hit.projectile, lost, fireball.max);
    }

    HitPropagation::Consumed
}

/// Reduce the emitter budget in proportion to health lost.
fn thin_trail(world: &mut World, fireball: Entity, lost: i32, max_health: i32) {
    if max_health <= 0 {
        return;
    }
    let Some(mut emitter) = world.get_mut::<ParticleEmitter>(fireball) else {
        return;
    };
    let fraction = lost as f32 / max_health as f32;
    emitter.max_particles = (emitter.max_particles - fraction * emitter.spawn_rate_max).max(0.0);
}
