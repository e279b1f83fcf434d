//! Grenade archetype: explodes on the first thing it hits.

pub mod explosion;

use std::num::NonZeroU32;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::health::DamageType;
use crate::plugins::projectiles::components::{MaxDistance, ProjectileAction};
use crate::plugins::projectiles::hit::{HitHandlerAppExt, HitPriority, HitPropagation, HitTarget};
use crate::plugins::world::Block;

use explosion::{detonate, RngSampler};

const GRENADE_RANGE: NonZeroU32 = NonZeroU32::new(32).expect("non-zero literal");

/// Marker for the grenade archetype.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Grenade;

/// Blast parameters. Carried by grenades and by explosive blocks.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplosionConfig {
    /// Number of blast directions sampled.
    pub max_range: u32,
    pub damage_amount: i32,
    pub damage_type: DamageType,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            max_range: 64,
            damage_amount: 1000,
            damage_type: DamageType::Explosive,
        }
    }
}

pub fn grenade_action() -> ProjectileAction {
    ProjectileAction {
        icon_scale: 0.4,
        affected_by_gravity: true,
        initial_velocity: 10.0,
        max_distance: MaxDistance::Limited(GRENADE_RANGE),
        damage_amount: 0,
        projectiles_per_second: 1.0,
        damage_type: DamageType::Explosive,
        ..default()
    }
}

pub fn grenade_bundle() -> impl Bundle {
    (
        Name::new("Grenade"),
        Grenade,
        grenade_action(),
        ExplosionConfig::default(),
    )
}

pub fn plugin(app: &mut App) {
    app.add_hit_handler(HitPriority::Normal, grenade_hit_handler);
    app.add_systems(
        Update,
        explosion::expire_effects.run_if(in_state(GameState::InGame)),
    );
}

/// Blow up where the grenade struck and remove it.
pub fn grenade_hit_handler(In(hit): In<HitTarget>, world: &mut World) -> HitPropagation {
    let config = {
        let Ok(grenade) = world.get_entity(hit.projectile) else {
            return HitPropagation::Continue;
        };
        if !grenade.contains::<Grenade>() {
            return HitPropagation::Continue;
        }
        grenade.get::<ExplosionConfig>().copied().unwrap_or_default()
    };

    let center = blast_center(world, &hit);

    world.despawn(hit.projectile);
    let mut sampler = RngSampler::fork(world);
    detonate(world, center, &config, None, &mut sampler);

    HitPropagation::Consumed
}

/// Struck blocks explode from their cell origin, like chained blocks do; anything else
/// from its transform, or the hit point when it has none.
fn blast_center(world: &World, hit: &HitTarget) -> Vec3 {
    let Ok(target) = world.get_entity(hit.target) else {
        return hit.hit_point;
    };
    if let Some(block) = target.get::<Block>() {
        return block.cell.as_vec3();
    }
    target
        .get::<Transform>()
        .map_or(hit.hit_point, |tf| tf.translation)
}
