//! Terminal transition of a spent projectile.
//!
//! Reusable projectiles are recycled: motion removed, entity left where it stopped as a
//! dropped item. Everything else is despawned.

use bevy::prelude::*;

use super::components::{DroppedItem, ProjectileAction, ProjectileMotion};
use super::messages::{Disposal, DropItemAtLocation, ProjectileDeactivated};

/// Recycle or destroy `entity` according to its archetype. No-op for a missing entity
/// or a reusable one that is not in flight.
pub fn deactivate_projectile(world: &mut World, entity: Entity) -> Option<Disposal> {
    let (reusable, in_flight, location) = {
        let projectile = world.get_entity(entity).ok()?;
        (
            projectile
                .get::<ProjectileAction>()
                .is_some_and(|action| action.reusable),
            projectile.contains::<ProjectileMotion>(),
            projectile
                .get::<Transform>()
                .map_or(Vec3::ZERO, |tf| tf.translation),
        )
    };

    let disposal = if reusable {
        if !in_flight {
            return None;
        }
        world
            .entity_mut(entity)
            .remove::<ProjectileMotion>()
            .insert(DroppedItem);
        world.write_message(DropItemAtLocation {
            item: entity,
            location,
        });
        Disposal::Recycled
    } else {
        world.despawn(entity);
        Disposal::Destroyed
    };

    debug!("projectile {entity} deactivated: {disposal:?}");
    world.write_message(ProjectileDeactivated { entity, disposal });
    Some(disposal)
}
