mod common;

use bevy::prelude::*;
use bevy_projectiles::plugins::inventory::Inventory;
use bevy_projectiles::plugins::player::Player;
use bevy_projectiles::plugins::projectiles::hit::HitHandlers;
use bevy_projectiles::plugins::world::BlockGrid;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn gameplay_is_wired() {
    let mut app = common::app_headless();
    app.update();

    // Default resolver plus the fireball and grenade handlers.
    assert_eq!(app.world().resource::<HitHandlers>().ordered().count(), 3);
    assert!(!app.world().resource::<BlockGrid>().is_empty());

    let stocked = app
        .world_mut()
        .query_filtered::<&Inventory, With<Player>>()
        .iter(app.world())
        .any(|inventory| inventory.held().is_some());
    assert!(stocked, "player should start with something to throw");
}
