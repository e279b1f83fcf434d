//! Signals in and out of the projectile pipeline.
//!
//! Intent comes in as a buffered `ActivateItem` message (producer → consumer, the launch
//! controller is the only reader). Firing is an entity event so archetype-specific
//! observers (fireball particles) can hook the same moment. Everything the simulator
//! reports to observers is a buffered message.

use bevy::prelude::*;

/// An instigator used an item. Only items carrying `ProjectileAction` react.
#[derive(Message, Clone, Copy, Debug)]
pub struct ActivateItem {
    pub item: Entity,
    pub instigator: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// A projectile left its owner's inventory and starts flying.
#[derive(EntityEvent, Clone, Copy, Debug)]
pub struct ProjectileFired {
    pub entity: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// A projectile moved this tick.
#[derive(Message, Clone, Copy, Debug)]
pub struct ProjectileUpdated {
    pub entity: Entity,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Terminal disposition of a spent projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposal {
    /// Motion removed, entity dropped as a pickup.
    Recycled,
    /// Entity despawned.
    Destroyed,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct ProjectileDeactivated {
    pub entity: Entity,
    pub disposal: Disposal,
}

/// An item entity was put on the ground at `location`.
#[derive(Message, Clone, Copy, Debug)]
pub struct DropItemAtLocation {
    pub item: Entity,
    pub location: Vec3,
}
