use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

/// Avian drives colliders and ray casts only; projectiles integrate their own ballistics.
pub fn plugin(app: &mut App) {
    let length_unit = app.world().resource::<Tunables>().length_unit;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(length_unit));
    app.insert_resource(Gravity(Vec3::ZERO));
}
