//! Collision layers.

use avian3d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Character,
    Projectile,
    Particle,
    Trigger,
}

/// Categories a projectile ray cast may stop at.
///
/// Particles and triggers never block a projectile.
pub const PROJECTILE_TARGETS: [Layer; 3] = [Layer::Default, Layer::World, Layer::Character];
