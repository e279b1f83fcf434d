//! Launch controller: activation intent → inventory removal → `ProjectileFired`.
//!
//! `fire_on_activate` is the single writer of `LaunchCooldown`, so the rate limiter is
//! checked and updated in one place within a tick and no second activation can slip
//! past the cap.

use bevy::prelude::*;

use crate::plugins::inventory::Inventory;

use super::components::{ProjectileAction, ProjectileMotion};
use super::messages::{ActivateItem, ProjectileFired};
use super::orientation::align_rotation;

/// Time of the last successful shot, shared by every launcher.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LaunchCooldown {
    last_fire: Option<f32>,
}

impl LaunchCooldown {
    #[inline]
    pub fn ready(&self, now: f32, action: &ProjectileAction) -> bool {
        self.last_fire
            .is_none_or(|last| now > last + action.fire_interval())
    }

    #[inline]
    pub fn record(&mut self, now: f32) {
        self.last_fire = Some(now);
    }

    pub fn last_fire(&self) -> Option<f32> {
        self.last_fire
    }
}

/// Consumer: turn `ActivateItem` messages into fired projectiles.
pub fn fire_on_activate(
    mut commands: Commands,
    mut reader: MessageReader<ActivateItem>,
    time: Res<Time>,
    mut cooldown: ResMut<LaunchCooldown>,
    q_action: Query<&ProjectileAction>,
    mut q_inventory: Query<&mut Inventory>,
) {
    let now = time.elapsed_secs();

    for activation in reader.read() {
        let Ok(action) = q_action.get(activation.item) else {
            continue;
        };
        if let Err(err) = action.validate() {
            warn!("refusing to fire {}: {err}", activation.item);
            continue;
        }
        if !cooldown.ready(now, action) {
            debug!("activation of {} rate limited", activation.item);
            continue;
        }

        let Ok(mut inventory) = q_inventory.get_mut(activation.instigator) else {
            debug!("instigator {} has no inventory", activation.instigator);
            continue;
        };
        let Some(slot) = inventory.slot_with_item(activation.item) else {
            debug!("{} is not in {}'s inventory", activation.item, activation.instigator);
            continue;
        };
        let fired = match inventory.remove_one(slot) {
            Ok(fired) => fired,
            Err(err) => {
                warn!("could not take projectile from slot {slot}: {err}");
                continue;
            }
        };

        cooldown.record(now);
        commands.trigger(ProjectileFired {
            entity: fired,
            origin: activation.origin,
            direction: activation.direction,
        });
    }
}

/// Observer: put a fired projectile in flight at the launch origin.
pub fn on_projectile_fired(
    fired: On<ProjectileFired>,
    mut commands: Commands,
    q_action: Query<&ProjectileAction>,
) {
    let Ok(action) = q_action.get(fired.entity) else {
        return;
    };

    let motion = ProjectileMotion::launched(fired.direction, action.initial_velocity);
    let transform = Transform::from_translation(fired.origin)
        .with_scale(Vec3::splat(action.icon_scale))
        .with_rotation(align_rotation(action.initial_orientation, motion.direction));

    commands.entity(fired.entity).insert((transform, motion));
}
