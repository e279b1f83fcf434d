//! Projectiles plugin: launch, ballistic flight, hit dispatch and disposal.
//!
//! # Data flow (big picture)
//! ```text
//!   Update schedule (variable dt)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (A) Producer: player::request_activation (or any other system)            │
//!│      - writes: ActivateItem message                                        │
//!│                                                                            │
//!│  (B) Consumer: launch::fire_on_activate                                    │
//!│      - reads: ActivateItem, Time, ProjectileAction                         │
//!│      - mutates: LaunchCooldown, Inventory (remove exactly one item)        │
//!│      - triggers: ProjectileFired                                           │
//!│                                                                            │
//!│  (C) Observers of ProjectileFired                                          │
//!│      - launch::on_projectile_fired: Transform + ProjectileMotion           │
//!│      - fireball::on_fireball_fired: emitter + attractor setup              │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedUpdate (fixed dt), exclusive
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (D) motion::simulate_projectiles                                          │
//!│      - exhaustion check → deactivate                                       │
//!│      - ray cast (ProjectileRaycast) over this tick's displacement          │
//!│      - hit: probe damageability, snap to hit point, dispatch_hit           │
//!│          HitHandlers in priority order, stop at first Consumed             │
//!│          (fireball / grenade at Normal, default at Low)                    │
//!│      - integrate position, orientation, distance, gravity                  │
//!│      - writes: ProjectileUpdated                                           │
//!└────────────────────────────────────────────────────────────────────────────┘
//!
//! Terminal transition (disposal::deactivate_projectile):
//!   reusable  → ProjectileMotion removed, DroppedItem, DropItemAtLocation
//!   otherwise → despawned
//! ```
//!
//! `ProjectileMotion` being present is what "in flight" means; nothing else tracks it.

pub mod collision;
pub mod components;
pub mod disposal;
pub mod hit;
pub mod launch;
pub mod messages;
pub mod motion;
pub mod orientation;
pub mod raycast;

use bevy::prelude::*;

use crate::common::state::GameState;

use hit::{HitHandlerAppExt, HitHandlers, HitPriority};

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<launch::LaunchCooldown>()
            .init_resource::<HitHandlers>()
            .init_resource::<raycast::ProjectileRaycast>();

        app.add_message::<messages::ActivateItem>()
            .add_message::<messages::ProjectileUpdated>()
            .add_message::<messages::ProjectileDeactivated>()
            .add_message::<messages::DropItemAtLocation>();

        app.add_observer(launch::on_projectile_fired);
        app.add_hit_handler(HitPriority::Low, collision::default_hit_handler);

        app.add_systems(
            Update,
            launch::fire_on_activate.run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedUpdate,
            motion::simulate_projectiles.run_if(in_state(GameState::InGame)),
        );
    }
}

#[cfg(test)]
mod tests;
