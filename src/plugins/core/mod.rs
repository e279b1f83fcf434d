//! Core plugin: shared resources and global settings.

use bevy::prelude::*;

use crate::common::rng::DeterministicRng;
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.init_resource::<DeterministicRng>();
    app.insert_resource(ClearColor(Color::srgb(0.45, 0.62, 0.85)));

    let rng = app.world().resource::<DeterministicRng>();
    info!("gameplay rng seeded with {}", rng.seed);
}
