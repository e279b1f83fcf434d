//! Per-tick flight: exhaustion check → ray cast → hit dispatch → integration.
//!
//! ```text
//!             ┌──────────── FLYING ─────────────┐
//!             │ ray cast over this tick's step  │
//!             └──┬──────────────┬───────────────┘
//!      exhausted │      hit     │ miss / survived hit
//!                v              v                 │
//!           TERMINAL     dispatch HitTarget ──────┘ integrate
//!      (recycled|destroyed)  handlers decide disposal
//! ```
//!
//! This runs as an exclusive system. Hit handlers run synchronously in the middle of an
//! entity's step and may despawn it, its target, or any other projectile, so nothing is
//! cached across a dispatch: every entity is re-fetched before use.

use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::health::{inflict_damage, Health};

use super::components::{ProjectileAction, ProjectileMotion};
use super::disposal::deactivate_projectile;
use super::hit::{dispatch_hit, HitTarget};
use super::messages::ProjectileUpdated;
use super::orientation::align_rotation;
use super::raycast::{ProjectileRaycast, RayImpact, RayRequest};

/// What one simulation step did to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightStep {
    /// Entity gone or no longer in flight before the step started.
    Skipped,
    /// Flight-distance cap reached; recycled or destroyed.
    Exhausted,
    /// Struck something that cannot take damage; recycled or destroyed.
    Blocked,
    /// A hit handler ended the flight (despawned it or removed its motion).
    Stopped,
    /// Moved (possibly after a hit it survived).
    Advanced,
}

/// Advance every in-flight projectile by the current tick's delta.
pub fn simulate_projectiles(world: &mut World) {
    let delta = world.resource::<Time>().delta_secs();
    let in_flight: Vec<Entity> = world
        .query_filtered::<Entity, With<ProjectileMotion>>()
        .iter(world)
        .collect();

    for entity in in_flight {
        step_projectile(world, entity, delta);
    }
}

/// Advance a single projectile by `delta` seconds.
pub fn step_projectile(world: &mut World, entity: Entity, delta: f32) -> FlightStep {
    let Some((action, mut motion, position)) = flight_state(world, entity) else {
        return FlightStep::Skipped;
    };
    let tunables = world.resource::<Tunables>().clone();

    if action.max_distance.is_exhausted(motion.distance_travelled) {
        deactivate_projectile(world, entity);
        return FlightStep::Exhausted;
    }

    motion.direction = motion.current_velocity.normalize_or_zero();

    let mut displacement = motion.current_velocity.length() * delta;
    if let Some(remaining) = action.max_distance.remaining(motion.distance_travelled) {
        displacement = displacement.min(remaining);
    }

    if let Ok(direction) = Dir3::new(motion.current_velocity) {
        let request = RayRequest {
            origin: position,
            direction,
            max_distance: displacement + tunables.ray_epsilon,
            ignore: entity,
        };

        if let Some(impact) = cast(world, request) {
            if !world.entity(impact.entity).contains::<Health>() {
                // Some targets only become damageable once something damages them.
                inflict_damage(world, impact.entity, 0, action.damage_type, Some(entity));
                let damageable = world
                    .get_entity(impact.entity)
                    .is_ok_and(|target| target.contains::<Health>());
                if !damageable {
                    deactivate_projectile(world, entity);
                    return FlightStep::Blocked;
                }
            }

            {
                let mut projectile = world.entity_mut(entity);
                if let Some(mut tf) = projectile.get_mut::<Transform>() {
                    tf.translation = impact.point;
                }
                projectile.insert(motion);
            }

            dispatch_hit(
                world,
                HitTarget {
                    target: impact.entity,
                    projectile: entity,
                    origin: Vec3::ZERO,
                    direction: motion.direction,
                    hit_point: impact.point,
                    hit_normal: impact.normal,
                },
            );

            // Handlers may have despawned us, grounded us, or changed our velocity.
            match world.get::<ProjectileMotion>(entity) {
                Some(current) => motion = *current,
                None => return FlightStep::Stopped,
            }
        }
    }

    integrate(world, entity, &action, &tunables, motion, position, displacement, delta);
    FlightStep::Advanced
}

fn flight_state(world: &World, entity: Entity) -> Option<(ProjectileAction, ProjectileMotion, Vec3)> {
    let projectile = world.get_entity(entity).ok()?;
    let motion = *projectile.get::<ProjectileMotion>()?;
    let action = projectile.get::<ProjectileAction>()?.clone();
    let position = projectile
        .get::<Transform>()
        .map_or(Vec3::ZERO, |tf| tf.translation);
    Some((action, motion, position))
}

/// Run the configured ray cast; a stale target handle counts as a miss.
fn cast(world: &mut World, request: RayRequest) -> Option<RayImpact> {
    let raycast = world.get_resource::<ProjectileRaycast>()?.0;
    let impact = match world.run_system_with(raycast, request) {
        Ok(impact) => impact?,
        Err(err) => {
            warn!("projectile ray cast failed: {err}");
            return None;
        }
    };
    world.get_entity(impact.entity).is_ok().then_some(impact)
}

#[allow(clippy::too_many_arguments)]
fn integrate(
    world: &mut World,
    entity: Entity,
    action: &ProjectileAction,
    tunables: &Tunables,
    mut motion: ProjectileMotion,
    start: Vec3,
    displacement: f32,
    delta: f32,
) {
    let position = start + motion.current_velocity * delta;
    let rotation = align_rotation(action.initial_orientation, motion.current_velocity);
    motion.distance_travelled += displacement;

    if action.affected_by_gravity && motion.current_velocity.y.abs() < tunables.terminal_velocity {
        motion.current_velocity.y =
            (motion.current_velocity.y - tunables.gravity * delta).max(-tunables.terminal_velocity);
    }

    {
        let mut projectile = world.entity_mut(entity);
        let scale = projectile.get::<Transform>().map_or(Vec3::ONE, |tf| tf.scale);
        projectile.insert((
            Transform {
                translation: position,
                rotation,
                scale,
            },
            motion,
        ));
    }

    world.write_message(ProjectileUpdated {
        entity,
        position,
        velocity: motion.current_velocity,
    });
}
