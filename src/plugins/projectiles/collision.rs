//! Default hit resolution, registered at `HitPriority::Low`.
//!
//! Archetype handlers (fireball, grenade) sit in a higher band and consume the hit, so
//! this only runs for plain projectiles.

use bevy::prelude::*;

use crate::plugins::health::inflict_damage;

use super::components::ProjectileAction;
use super::disposal::deactivate_projectile;
use super::hit::{HitPropagation, HitTarget};

/// Damage the target with the archetype's damage, then recycle or destroy the projectile.
pub fn default_hit_handler(In(hit): In<HitTarget>, world: &mut World) -> HitPropagation {
    let Some(action) = world.get::<ProjectileAction>(hit.projectile).cloned() else {
        return HitPropagation::Continue;
    };

    inflict_damage(
        world,
        hit.target,
        action.damage_amount,
        action.damage_type,
        Some(hit.projectile),
    );
    deactivate_projectile(world, hit.projectile);

    HitPropagation::Consumed
}
