//! Health plugin: the damage pipeline every projectile hit goes through.
//!
//! Damage is applied synchronously against `&mut World` so callers can snapshot a
//! target's health before and after (the fireball recoil depends on this) and so that
//! a destroyed entity is gone by the time the call returns.
//!
//! ```text
//! inflict_damage(target, amount, type)
//!   ├─ no Health, destructible Block → gains Health { durability } (lazy damageability)
//!   ├─ no Health otherwise           → Immune (indestructible)
//!   ├─ Armour                        → absorbs a flat amount (not for Direct damage)
//!   └─ current <= 0                  → remove from BlockGrid, despawn, EntityDestroyed
//! ```

use bevy::prelude::*;

use crate::plugins::world::{Block, BlockGrid};

/// Classification of damage. Armour ignores `Direct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DamageType {
    #[default]
    Physical,
    Direct,
    Explosive,
    Fire,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }
}

/// Flat damage reduction per hit.
#[derive(Component, Debug, Clone, Copy)]
pub struct Armour {
    pub absorb: i32,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: i32,
    pub damage_type: DamageType,
    pub instigator: Option<Entity>,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct EntityDestroyed {
    pub entity: Entity,
    pub cause: DamageType,
}

/// What a single damage application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Applied { dealt: i32, remaining: i32 },
    Destroyed { dealt: i32 },
    /// Target has no health and cannot acquire any.
    Immune,
    /// Target handle no longer refers to a live entity.
    Missing,
}

pub fn plugin(app: &mut App) {
    app.add_message::<DamageDealt>()
        .add_message::<EntityDestroyed>();
}

/// Apply `amount` of `damage_type` to `target`.
///
/// Zero amounts are valid and are how callers probe whether a target can take damage
/// at all: a destructible block acquires `Health` on its first damage event.
pub fn inflict_damage(
    world: &mut World,
    target: Entity,
    amount: i32,
    damage_type: DamageType,
    instigator: Option<Entity>,
) -> DamageOutcome {
    let (dealt, remaining) = {
        let Ok(mut entity) = world.get_entity_mut(target) else {
            return DamageOutcome::Missing;
        };

        if !entity.contains::<Health>() {
            match entity.get::<Block>().copied() {
                Some(block) if block.destructible => {
                    entity.insert(Health::full(block.durability));
                }
                _ => return DamageOutcome::Immune,
            }
        }

        let absorbed = match (damage_type, entity.get::<Armour>()) {
            (DamageType::Direct, _) | (_, None) => 0,
            (_, Some(armour)) => armour.absorb.max(0),
        };
        let dealt = (amount - absorbed).max(0);

        let Some(mut health) = entity.get_mut::<Health>() else {
            return DamageOutcome::Immune;
        };
        health.current -= dealt;
        (dealt, health.current)
    };

    world.write_message(DamageDealt {
        target,
        amount: dealt,
        damage_type,
        instigator,
    });

    if remaining > 0 {
        return DamageOutcome::Applied { dealt, remaining };
    }

    destroy(world, target, damage_type);
    DamageOutcome::Destroyed { dealt }
}

fn destroy(world: &mut World, entity: Entity, cause: DamageType) {
    if let Some(cell) = world.get::<Block>(entity).map(|block| block.cell) {
        world.resource_mut::<BlockGrid>().remove(cell);
    }
    if world.despawn(entity) {
        debug!("{entity} destroyed by {cause:?} damage");
        world.write_message(EntityDestroyed { entity, cause });
    }
}
