//! Player plugin: the character that throws things.
//!
//! Pipeline:
//! - Update: sample keyboard into `PlayerInput`, turn a left click into `ActivateItem`
//!   for whatever the selected inventory slot holds
//! - FixedUpdate: apply velocity to the kinematic rigid body
//!
//! Input resources are optional so the plugin runs in headless apps without an input
//! plugin; there it simply never produces anything.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::fireball::fireball_bundle;
use crate::plugins::grenade::grenade_bundle;
use crate::plugins::health::Health;
use crate::plugins::inventory::Inventory;
use crate::plugins::projectiles::components::ProjectileAction;
use crate::plugins::projectiles::messages::ActivateItem;

/// Launch origin ahead of the player so shots clear its own collider.
const MUZZLE_OFFSET: f32 = 0.8;
const SLOT_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

#[derive(Component)]
pub struct Player;

#[derive(Resource, Default, Debug)]
struct PlayerInput {
    move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(Startup, spawn)
        .add_systems(
            Update,
            (gather_input, request_activation)
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(FixedUpdate, apply_movement);
}

fn spawn(mut commands: Commands) {
    let mut inventory = Inventory::with_slots(SLOT_KEYS.len());

    let arrow = ProjectileAction {
        reusable: true,
        affected_by_gravity: true,
        initial_velocity: 16.0,
        ..default()
    };
    let mut stock = |slot: usize, item: Entity| {
        if let Err(err) = inventory.push(slot, item) {
            warn!("could not stock player inventory: {err}");
        }
    };
    for _ in 0..8 {
        stock(0, commands.spawn((Name::new("Arrow"), arrow.clone())).id());
    }
    for _ in 0..3 {
        stock(1, commands.spawn(fireball_bundle(10)).id());
        stock(2, commands.spawn(grenade_bundle()).id());
    }

    let layers = CollisionLayers::new(
        Layer::Character,
        [Layer::World, Layer::Character, Layer::Default],
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        inventory,
        Health::full(20),
        Transform::from_xyz(0.0, 1.5, 0.0),
        RigidBody::Kinematic,
        Collider::capsule(0.4, 1.0),
        layers,
        LinearVelocity::ZERO,
    ));
}

fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut input: ResMut<PlayerInput>,
    mut q_inventory: Query<&mut Inventory, With<Player>>,
) {
    let Some(keys) = keys else {
        return;
    };

    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = axis.normalize_or_zero();

    if let Ok(mut inventory) = q_inventory.single_mut() {
        if let Some(slot) = SLOT_KEYS.iter().position(|key| keys.just_pressed(*key)) {
            if let Err(err) = inventory.select(slot) {
                warn!("could not select slot {slot}: {err}");
            }
        }
    }
}

/// Producer: a left click activates the held item in the facing direction.
fn request_activation(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    q_player: Query<(Entity, &Transform, &Inventory), With<Player>>,
    mut writer: MessageWriter<ActivateItem>,
) {
    let Some(buttons) = buttons else {
        return;
    };
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok((player, tf, inventory)) = q_player.single() else {
        return;
    };
    let Some(item) = inventory.held() else {
        debug!("nothing held in slot {}", inventory.selected());
        return;
    };

    let direction = tf.forward().as_vec3();
    writer.write(ActivateItem {
        item,
        instigator: player,
        origin: tf.translation + direction * MUZZLE_OFFSET,
        direction,
    });
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<&mut LinearVelocity, With<Player>>,
) {
    let Ok(mut vel) = q_player.single_mut() else {
        return;
    };
    // Walk on the ground plane; W is -Z (forward).
    vel.0 = Vec3::new(input.move_axis.x, 0.0, -input.move_axis.y) * tunables.player_speed;
}
