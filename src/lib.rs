//! Library entry point.
//!
//! Projectile gameplay for a voxel world: launching items out of an inventory, ballistic
//! flight with ray-cast hit detection, priority-ordered hit handlers, and the fireball
//! and grenade archetypes built on top.
//!
//! Integration tests in `tests/` are compiled as separate crates.
//! A `lib.rs` gives them a stable public API surface to import.

pub mod game;
pub mod common;
pub mod plugins;
