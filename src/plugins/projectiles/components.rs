use std::num::NonZeroU32;

use bevy::prelude::*;
use thiserror::Error;

use crate::plugins::health::DamageType;

#[derive(Debug, Error, PartialEq)]
pub enum ProjectileConfigError {
    #[error("max distance must be -1 (unlimited) or positive, got {0}")]
    InvalidMaxDistance(i32),
    #[error("projectiles per second must be positive, got {0}")]
    InvalidFireRate(f32),
    #[error("initial orientation must be a non-zero vector")]
    ZeroOrientation,
}

const DEFAULT_MAX_DISTANCE: NonZeroU32 = NonZeroU32::new(24).expect("non-zero literal");

/// Flight-distance cap of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxDistance {
    Unlimited,
    Limited(NonZeroU32),
}

impl MaxDistance {
    /// Raw value meaning "no cap" in archetype data.
    pub const UNLIMITED_RAW: i32 = -1;

    pub fn from_raw(raw: i32) -> Result<Self, ProjectileConfigError> {
        if raw == Self::UNLIMITED_RAW {
            return Ok(Self::Unlimited);
        }
        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self::Limited)
            .ok_or(ProjectileConfigError::InvalidMaxDistance(raw))
    }

    pub fn limited(distance: u32) -> Option<Self> {
        NonZeroU32::new(distance).map(Self::Limited)
    }

    /// Distance left before the cap, `None` when unlimited.
    #[inline]
    pub fn remaining(self, travelled: f32) -> Option<f32> {
        match self {
            Self::Unlimited => None,
            Self::Limited(max) => Some(max.get() as f32 - travelled),
        }
    }

    #[inline]
    pub fn is_exhausted(self, travelled: f32) -> bool {
        self.remaining(travelled).is_some_and(|left| left <= 0.0)
    }
}

/// Static configuration of a projectile archetype.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ProjectileAction {
    pub icon_scale: f32,
    /// Axis the item's icon faces at rest; rotated onto the flight direction.
    pub initial_orientation: Vec3,
    /// Spent projectiles are dropped as items instead of destroyed.
    pub reusable: bool,
    pub affected_by_gravity: bool,
    /// Declared by archetypes but not applied to motion.
    pub friction_coefficient: f32,
    pub initial_velocity: f32,
    pub max_distance: MaxDistance,
    pub damage_amount: i32,
    pub projectiles_per_second: f32,
    pub damage_type: DamageType,
}

impl Default for ProjectileAction {
    fn default() -> Self {
        Self {
            icon_scale: 1.0,
            initial_orientation: Vec3::Y,
            reusable: false,
            affected_by_gravity: false,
            friction_coefficient: 0.1,
            initial_velocity: 1.0,
            max_distance: MaxDistance::Limited(DEFAULT_MAX_DISTANCE),
            damage_amount: 3,
            projectiles_per_second: 1.0,
            damage_type: DamageType::Physical,
        }
    }
}

impl ProjectileAction {
    pub fn validate(&self) -> Result<(), ProjectileConfigError> {
        if !(self.projectiles_per_second > 0.0) {
            return Err(ProjectileConfigError::InvalidFireRate(self.projectiles_per_second));
        }
        if self.initial_orientation.length_squared() <= f32::EPSILON {
            return Err(ProjectileConfigError::ZeroOrientation);
        }
        Ok(())
    }

    /// Seconds that must pass between two shots.
    #[inline]
    pub fn fire_interval(&self) -> f32 {
        1.0 / self.projectiles_per_second
    }
}

/// Per-instance flight state. Present exactly while the projectile is airborne.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileMotion {
    pub current_velocity: Vec3,
    /// Normalised `current_velocity`, refreshed every tick.
    pub direction: Vec3,
    pub distance_travelled: f32,
}

impl ProjectileMotion {
    pub fn launched(direction: Vec3, speed: f32) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            current_velocity: direction * speed,
            direction,
            distance_travelled: 0.0,
        }
    }
}

/// Marker: a spent reusable projectile lying in the world as a pickup.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DroppedItem;
