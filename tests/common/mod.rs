//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `bevy_projectiles::game::configure_headless` to install gameplay plugins.

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

/// One fixed tick per `update()`.
pub const TICK: Duration = Duration::from_micros(15_625);

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    // avian3d's collider cache reads `AssetEvent<Mesh>`; `DefaultPlugins` registers it in the full app.
    app.init_asset::<Mesh>();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    bevy_projectiles::game::configure_headless(&mut app);
    // `App::run` would do this; tests drive `update()` directly, and avian registers
    // resources in `Plugin::finish`.
    app.finish();
    app.cleanup();
    app
}
