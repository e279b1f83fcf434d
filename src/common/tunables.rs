//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Physics length unit handed to avian.
    pub length_unit: f32,
    /// Player walking speed (units/s).
    pub player_speed: f32,
    /// Vertical speed beyond which gravity stops accelerating a projectile.
    pub terminal_velocity: f32,
    /// Downward acceleration for projectiles affected by gravity (units/s²).
    pub gravity: f32,
    /// Added to every projectile ray cast so the cast includes its end point.
    pub ray_epsilon: f32,
    /// Block steps walked along each blast direction.
    pub blast_steps: u32,
    /// Seconds an explosion smoke effect stays alive.
    pub effect_lifetime: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            length_unit: 1.0,
            player_speed: 6.0,
            terminal_velocity: 40.0,
            gravity: 1.0,
            ray_epsilon: 0.01,
            blast_steps: 4,
            effect_lifetime: 2.0,
        }
    }
}
