//! Test helpers.
//!
//! Most gameplay code here takes `&mut World` directly, so unit tests build a bare `World`
//! with the resources and message buffers the code under test writes to, then call the
//! functions or run systems once.

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::common::rng::DeterministicRng;
use crate::common::tunables::Tunables;
use crate::plugins::health::{DamageDealt, EntityDestroyed};
use crate::plugins::projectiles::messages::{
    ActivateItem, DropItemAtLocation, ProjectileDeactivated, ProjectileUpdated,
};
use crate::plugins::projectiles::hit::HitHandlers;
use crate::plugins::world::BlockGrid;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A world carrying every resource and message buffer the gameplay code touches,
/// with no hit handlers registered.
pub fn gameplay_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(DeterministicRng::new(7));
    world.init_resource::<BlockGrid>();
    world.init_resource::<HitHandlers>();
    world.init_resource::<Messages<ActivateItem>>();
    world.init_resource::<Messages<ProjectileUpdated>>();
    world.init_resource::<Messages<ProjectileDeactivated>>();
    world.init_resource::<Messages<DropItemAtLocation>>();
    world.init_resource::<Messages<DamageDealt>>();
    world.init_resource::<Messages<EntityDestroyed>>();
    world
}

/// Drain every message of type `M` currently buffered.
pub fn drain_messages<M: Message>(world: &mut World) -> Vec<M> {
    world.resource_mut::<Messages<M>>().drain().collect()
}
