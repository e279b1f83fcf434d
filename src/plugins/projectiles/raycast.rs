//! Ray casts for projectile hit detection.
//!
//! The simulator never talks to avian directly: it runs whatever system is stored in
//! `ProjectileRaycast`. The plugin installs `physics_ray_cast`; tests swap in scripted
//! casters without running the physics pipeline.

use avian3d::prelude::*;
use bevy::ecs::system::SystemId;
use bevy::prelude::*;

use crate::common::layers::PROJECTILE_TARGETS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayRequest {
    pub origin: Vec3,
    pub direction: Dir3,
    pub max_distance: f32,
    /// The projectile itself.
    pub ignore: Entity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayImpact {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
}

pub type RaycastSystem = SystemId<In<RayRequest>, Option<RayImpact>>;

#[derive(Resource, Clone, Copy, Debug)]
pub struct ProjectileRaycast(pub RaycastSystem);

impl FromWorld for ProjectileRaycast {
    fn from_world(world: &mut World) -> Self {
        Self(world.register_system(physics_ray_cast))
    }
}

/// Closest solid hit among world terrain, default objects and characters.
pub fn physics_ray_cast(In(request): In<RayRequest>, spatial: SpatialQuery) -> Option<RayImpact> {
    let filter = SpatialQueryFilter::from_mask(PROJECTILE_TARGETS)
        .with_excluded_entities([request.ignore]);

    let hit = spatial.cast_ray(
        request.origin,
        request.direction,
        request.max_distance,
        true,
        &filter,
    )?;

    Some(RayImpact {
        entity: hit.entity,
        point: request.origin + request.direction * hit.distance,
        normal: hit.normal,
    })
}
