//! Camera plugin (render-only): a chase camera behind the player plus a sun.
//!
//! A system cannot hold `Query<&Transform>` and `Query<&mut Transform>` at once unless
//! Bevy can prove them disjoint (B0001), hence the `Without<...>` filters below.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::Player;

/// Camera position relative to the player.
const CHASE_OFFSET: Vec3 = Vec3::new(0.0, 4.0, 7.0);

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera).add_systems(
        PostUpdate,
        follow_player
            .before(TransformSystems::Propagate)
            .run_if(in_state(GameState::InGame)),
    );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera3d::default(),
        MainCamera { responsiveness: 5.0 },
        Transform::from_translation(CHASE_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn follow_player(
    time: Res<Time>,
    // Disjointness proof: Player entities are not MainCamera entities.
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let (Ok(tf_player), Ok((mut tf_cam, main_cam))) = (q_player.single(), q_cam.single_mut()) else {
        return;
    };

    let dt = time.delta_secs();
    let alpha = 1.0 - (-main_cam.responsiveness * dt).exp();
    let goal = tf_player.translation + CHASE_OFFSET;

    tf_cam.translation = tf_cam.translation.lerp(goal, alpha);
    tf_cam.look_at(tf_player.translation, Vec3::Y);
}
