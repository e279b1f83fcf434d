//! Projectile tests, deterministic and physics-free.
//!
//! Ray casts are scripted: `scripted_world` swaps `ProjectileRaycast` for a caster that
//! intersects `TestShape` entities analytically, so no avian pipeline has to run.

use std::time::Duration;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::test_utils::{drain_messages, gameplay_world, run_system_once};
use crate::common::tunables::Tunables;
use crate::plugins::health::{DamageType, Health};
use crate::plugins::inventory::Inventory;
use crate::plugins::world::{place_block, Block};

use super::collision::default_hit_handler;
use super::components::{DroppedItem, MaxDistance, ProjectileAction, ProjectileConfigError, ProjectileMotion};
use super::hit::{dispatch_hit, register_hit_handler, HitPriority, HitPropagation, HitTarget};
use super::launch::{fire_on_activate, on_projectile_fired, LaunchCooldown};
use super::messages::{ActivateItem, Disposal, DropItemAtLocation, ProjectileDeactivated, ProjectileUpdated};
use super::motion::{simulate_projectiles, step_projectile, FlightStep};
use super::raycast::{ProjectileRaycast, RayImpact, RayRequest};

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

/// Analytic collider for the scripted ray cast.
#[derive(Component, Clone, Copy)]
enum TestShape {
    Sphere(f32),
    /// Plane facing -Z at the entity's translation.z.
    WallZ,
}

fn scripted_cast(
    In(request): In<RayRequest>,
    q: Query<(Entity, &Transform, &TestShape)>,
) -> Option<RayImpact> {
    let dir = *request.direction;
    q.iter()
        .filter(|(entity, ..)| *entity != request.ignore)
        .filter_map(|(entity, tf, shape)| {
            let distance = match *shape {
                TestShape::Sphere(radius) => {
                    let oc = request.origin - tf.translation;
                    let b = oc.dot(dir);
                    let disc = b * b - (oc.length_squared() - radius * radius);
                    if disc < 0.0 {
                        return None;
                    }
                    -b - disc.sqrt()
                }
                TestShape::WallZ => {
                    if dir.z <= 0.0 {
                        return None;
                    }
                    (tf.translation.z - request.origin.z) / dir.z
                }
            };
            (0.0..=request.max_distance).contains(&distance).then(|| {
                let point = request.origin + dir * distance;
                let normal = match *shape {
                    TestShape::Sphere(_) => (point - tf.translation).normalize_or_zero(),
                    TestShape::WallZ => Vec3::NEG_Z,
                };
                (distance, RayImpact { entity, point, normal })
            })
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, impact)| impact)
}

fn scripted_world() -> World {
    let mut world = gameplay_world();
    let caster = world.register_system(scripted_cast);
    world.insert_resource(ProjectileRaycast(caster));
    world.insert_resource(Time::<()>::default());
    world
}

fn with_default_handler(mut world: World) -> World {
    register_hit_handler(&mut world, HitPriority::Low, default_hit_handler);
    world
}

fn spawn_projectile(world: &mut World, action: ProjectileAction, at: Vec3, velocity: Vec3) -> Entity {
    world
        .spawn((
            action,
            Transform::from_translation(at),
            ProjectileMotion {
                current_velocity: velocity,
                direction: velocity.normalize_or_zero(),
                distance_travelled: 0.0,
            },
        ))
        .id()
}

fn limited(distance: u32) -> MaxDistance {
    MaxDistance::limited(distance).unwrap()
}

fn motion(world: &World, entity: Entity) -> ProjectileMotion {
    *world.get::<ProjectileMotion>(entity).expect("projectile in flight")
}

fn hit_on(target: Entity, projectile: Entity) -> HitTarget {
    HitTarget {
        target,
        projectile,
        origin: Vec3::ZERO,
        direction: Vec3::Z,
        hit_point: Vec3::ZERO,
        hit_normal: Vec3::NEG_Z,
    }
}

// --------------------------------------------------------------------------------------
// Configuration
// --------------------------------------------------------------------------------------

#[test]
fn max_distance_from_raw_values() {
    assert_eq!(MaxDistance::from_raw(-1), Ok(MaxDistance::Unlimited));
    assert_eq!(MaxDistance::from_raw(24), Ok(limited(24)));
    assert_eq!(MaxDistance::from_raw(0), Err(ProjectileConfigError::InvalidMaxDistance(0)));
    assert_eq!(MaxDistance::from_raw(-7), Err(ProjectileConfigError::InvalidMaxDistance(-7)));
}

#[test]
fn validate_rejects_broken_archetypes() {
    assert_eq!(ProjectileAction::default().validate(), Ok(()));

    let stalled = ProjectileAction { projectiles_per_second: 0.0, ..default() };
    assert_eq!(stalled.validate(), Err(ProjectileConfigError::InvalidFireRate(0.0)));

    let pointless = ProjectileAction { initial_orientation: Vec3::ZERO, ..default() };
    assert_eq!(pointless.validate(), Err(ProjectileConfigError::ZeroOrientation));
}

// --------------------------------------------------------------------------------------
// Launch
// --------------------------------------------------------------------------------------

#[test]
fn cooldown_is_strictly_after_the_interval() {
    let action = ProjectileAction { projectiles_per_second: 2.0, ..default() };
    let mut cooldown = LaunchCooldown::default();

    assert!(cooldown.ready(0.0, &action), "first shot is never limited");
    cooldown.record(1.0);
    assert!(!cooldown.ready(1.25, &action));
    assert!(!cooldown.ready(1.5, &action));
    assert!(cooldown.ready(1.51, &action));
}

fn launcher_world() -> (World, Entity, [Entity; 2]) {
    let mut world = scripted_world();
    world.init_resource::<LaunchCooldown>();
    world.add_observer(on_projectile_fired);

    let action = ProjectileAction { icon_scale: 0.25, initial_velocity: 4.0, ..default() };
    let items = [world.spawn(action.clone()).id(), world.spawn(action).id()];
    let mut inventory = Inventory::with_slots(2);
    for item in items {
        inventory.push(1, item).unwrap();
    }
    let player = world.spawn(inventory).id();
    (world, player, items)
}

#[test]
fn activation_fires_exactly_one_per_interval() {
    let (mut world, player, items) = launcher_world();

    for _ in 0..2 {
        world.write_message(ActivateItem {
            item: items[1],
            instigator: player,
            origin: Vec3::new(1.0, 2.0, 3.0),
            direction: Vec3::X * 5.0,
        });
    }
    run_system_once(&mut world, fire_on_activate);

    let inventory = world.get::<Inventory>(player).unwrap();
    assert_eq!(inventory.count(1), 1);
    assert_eq!(world.resource::<LaunchCooldown>().last_fire(), Some(0.0));

    let fired = world
        .query_filtered::<Entity, With<ProjectileMotion>>()
        .iter(&world)
        .collect::<Vec<_>>();
    assert_eq!(fired, vec![items[1]]);

    let flight = motion(&world, items[1]);
    assert_eq!(flight.direction, Vec3::X);
    assert_eq!(flight.current_velocity, Vec3::X * 4.0);
    assert_eq!(flight.distance_travelled, 0.0);

    let tf = world.get::<Transform>(items[1]).unwrap();
    assert_eq!(tf.translation, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(tf.scale, Vec3::splat(0.25));
    assert!((tf.rotation * Vec3::Y - Vec3::X).length() < 1e-5);
}

#[test]
fn activation_after_interval_fires_again() {
    let (mut world, player, items) = launcher_world();
    let activate = ActivateItem {
        item: items[1],
        instigator: player,
        origin: Vec3::ZERO,
        direction: Vec3::Z,
    };

    world.write_message(activate);
    run_system_once(&mut world, fire_on_activate);
    drain_messages::<ActivateItem>(&mut world);

    world.resource_mut::<Time>().advance_by(Duration::from_millis(1100));
    world.write_message(ActivateItem { item: items[0], ..activate });
    run_system_once(&mut world, fire_on_activate);

    assert_eq!(world.get::<Inventory>(player).unwrap().count(1), 0);
    assert!(world.get::<ProjectileMotion>(items[0]).is_some());
}

#[test]
fn activation_of_foreign_or_inert_items_is_ignored() {
    let (mut world, player, _) = launcher_world();
    let stranger = world.spawn(ProjectileAction::default()).id();
    let rock = world.spawn_empty().id();

    for item in [stranger, rock] {
        world.write_message(ActivateItem {
            item,
            instigator: player,
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        });
    }
    run_system_once(&mut world, fire_on_activate);

    assert_eq!(world.get::<Inventory>(player).unwrap().count(1), 2);
    assert_eq!(world.resource::<LaunchCooldown>().last_fire(), None);
    assert!(world.get::<ProjectileMotion>(stranger).is_none());
}

// --------------------------------------------------------------------------------------
// Flight
// --------------------------------------------------------------------------------------

#[test]
fn distance_is_monotonic_and_capped() {
    let mut world = scripted_world();
    let action = ProjectileAction { max_distance: limited(5), ..default() };
    let arrow = spawn_projectile(&mut world, action, Vec3::ZERO, Vec3::Z * 30.0);

    let mut last = 0.0;
    let mut steps = Vec::new();
    loop {
        let step = step_projectile(&mut world, arrow, 0.1);
        steps.push(step);
        if step != FlightStep::Advanced {
            break;
        }
        let travelled = motion(&world, arrow).distance_travelled;
        assert!(travelled >= last);
        assert!(travelled <= 5.0);
        last = travelled;
    }

    assert_eq!(steps, vec![FlightStep::Advanced, FlightStep::Advanced, FlightStep::Exhausted]);
    assert_eq!(last, 5.0);
    assert!(world.get_entity(arrow).is_err());
}

#[test]
fn exhausted_reusable_projectile_is_dropped() {
    let mut world = scripted_world();
    let action = ProjectileAction { reusable: true, max_distance: limited(1), ..default() };
    let arrow = spawn_projectile(&mut world, action, Vec3::ZERO, Vec3::X * 10.0);

    assert_eq!(step_projectile(&mut world, arrow, 0.5), FlightStep::Advanced);
    assert_eq!(step_projectile(&mut world, arrow, 0.5), FlightStep::Exhausted);

    assert!(world.get::<ProjectileMotion>(arrow).is_none());
    assert!(world.get::<DroppedItem>(arrow).is_some());
    let drops = drain_messages::<DropItemAtLocation>(&mut world);
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].item, arrow);
    assert_eq!(drops[0].location, Vec3::X * 5.0);
    let done = drain_messages::<ProjectileDeactivated>(&mut world);
    assert_eq!(done[0].disposal, Disposal::Recycled);

    assert_eq!(step_projectile(&mut world, arrow, 0.5), FlightStep::Skipped);
}

#[test]
fn hit_just_inside_the_ray_epsilon_counts() {
    let mut world = with_default_handler(scripted_world());
    let wall = world
        .spawn((TestShape::WallZ, Transform::from_xyz(0.0, 0.0, 1.005), Health::full(10)))
        .id();
    let arrow = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::ZERO, Vec3::Z * 10.0);

    assert_eq!(step_projectile(&mut world, arrow, 0.1), FlightStep::Stopped);
    assert_eq!(world.get::<Health>(wall).unwrap().current, 7);
    assert!(world.get_entity(arrow).is_err());
}

#[test]
fn target_beyond_the_epsilon_is_missed() {
    let mut world = with_default_handler(scripted_world());
    let wall = world
        .spawn((TestShape::WallZ, Transform::from_xyz(0.0, 0.0, 1.02), Health::full(10)))
        .id();
    let arrow = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::ZERO, Vec3::Z * 10.0);

    assert_eq!(step_projectile(&mut world, arrow, 0.1), FlightStep::Advanced);
    assert_eq!(world.get::<Health>(wall).unwrap().current, 10);
    let tf = world.get::<Transform>(arrow).unwrap();
    assert!((tf.translation - Vec3::Z).length() < 1e-6);

    let updates = drain_messages::<ProjectileUpdated>(&mut world);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].entity, arrow);
}

#[test]
fn bedrock_blocks_projectiles_without_damage() {
    let mut world = with_default_handler(scripted_world());
    let bedrock = place_block(&mut world, Block { cell: IVec3::new(0, 0, 1), destructible: false, durability: 0 });
    world.entity_mut(bedrock).insert(TestShape::WallZ).insert(Transform::from_xyz(0.5, 0.5, 1.0));
    let action = ProjectileAction { reusable: true, ..default() };
    let arrow = spawn_projectile(&mut world, action, Vec3::new(0.5, 0.5, 0.5), Vec3::Z * 10.0);

    assert_eq!(step_projectile(&mut world, arrow, 0.1), FlightStep::Blocked);
    assert!(world.get::<Health>(bedrock).is_none());
    assert!(world.get::<DroppedItem>(arrow).is_some());
    // Dropped where it was when the hit was detected.
    assert_eq!(drain_messages::<DropItemAtLocation>(&mut world)[0].location, Vec3::new(0.5, 0.5, 0.5));
}

#[test]
fn destructible_block_becomes_damageable_on_hit() {
    let mut world = with_default_handler(scripted_world());
    let dirt = place_block(&mut world, Block { cell: IVec3::new(0, 0, 1), destructible: true, durability: 10 });
    world.entity_mut(dirt).insert(TestShape::WallZ).insert(Transform::from_xyz(0.5, 0.5, 1.0));
    let arrow = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::new(0.5, 0.5, 0.5), Vec3::Z * 10.0);

    assert_eq!(step_projectile(&mut world, arrow, 0.1), FlightStep::Stopped);
    assert_eq!(world.get::<Health>(dirt), Some(&Health { current: 7, max: 10 }));
}

#[test]
fn gravity_never_pushes_past_terminal_velocity() {
    let mut world = scripted_world();
    world.insert_resource(Tunables { gravity: 30.0, ..default() });
    let terminal = world.resource::<Tunables>().terminal_velocity;
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let vy = rng.gen_range(-2.0 * terminal..2.0 * terminal);
        let delta = rng.gen_range(0.001..0.5);
        let action = ProjectileAction {
            affected_by_gravity: true,
            max_distance: MaxDistance::Unlimited,
            ..default()
        };
        let p = spawn_projectile(&mut world, action, Vec3::ZERO, Vec3::new(1.0, vy, 0.0));

        assert_eq!(step_projectile(&mut world, p, delta), FlightStep::Advanced);
        let after = motion(&world, p).current_velocity.y;
        if vy.abs() < terminal {
            assert!(after >= -terminal, "vy {vy} → {after}");
            assert!(after <= vy);
        } else {
            assert_eq!(after, vy);
        }
        world.despawn(p);
    }
}

#[test]
fn position_integrates_and_icon_turns_with_velocity() {
    let mut world = scripted_world();
    let action = ProjectileAction {
        initial_orientation: Vec3::Y,
        max_distance: MaxDistance::Unlimited,
        ..default()
    };
    let p = spawn_projectile(&mut world, action, Vec3::ONE, Vec3::new(0.0, 0.0, -4.0));
    world.get_mut::<Transform>(p).unwrap().scale = Vec3::splat(0.5);

    step_projectile(&mut world, p, 0.25);

    let tf = world.get::<Transform>(p).unwrap();
    assert!((tf.translation - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    assert!((tf.rotation * Vec3::Y - Vec3::NEG_Z).length() < 1e-5);
    assert_eq!(tf.scale, Vec3::splat(0.5));
    assert_eq!(motion(&world, p).distance_travelled, 1.0);
}

// --------------------------------------------------------------------------------------
// Hit dispatch
// --------------------------------------------------------------------------------------

#[derive(Resource, Default)]
struct Calls(Vec<&'static str>);

#[test]
fn dispatch_runs_in_priority_order_until_consumed() {
    let mut world = gameplay_world();
    world.init_resource::<Calls>();

    register_hit_handler(&mut world, HitPriority::Low, |_: In<HitTarget>, mut calls: ResMut<Calls>| {
        calls.0.push("low");
        HitPropagation::Consumed
    });
    register_hit_handler(&mut world, HitPriority::Normal, |_: In<HitTarget>, mut calls: ResMut<Calls>| {
        calls.0.push("normal");
        HitPropagation::Consumed
    });
    register_hit_handler(&mut world, HitPriority::Critical, |_: In<HitTarget>, mut calls: ResMut<Calls>| {
        calls.0.push("critical");
        HitPropagation::Continue
    });
    register_hit_handler(&mut world, HitPriority::Normal, |_: In<HitTarget>, mut calls: ResMut<Calls>| {
        calls.0.push("normal-late");
        HitPropagation::Consumed
    });

    let outcome = dispatch_hit(&mut world, hit_on(Entity::PLACEHOLDER, Entity::PLACEHOLDER));

    assert_eq!(outcome, HitPropagation::Consumed);
    assert_eq!(world.resource::<Calls>().0, vec!["critical", "normal"]);
}

#[test]
fn dispatch_without_consumer_continues() {
    let mut world = gameplay_world();
    world.init_resource::<Calls>();
    register_hit_handler(&mut world, HitPriority::Trivial, |_: In<HitTarget>, mut calls: ResMut<Calls>| {
        calls.0.push("trivial");
        HitPropagation::Continue
    });

    let outcome = dispatch_hit(&mut world, hit_on(Entity::PLACEHOLDER, Entity::PLACEHOLDER));
    assert_eq!(outcome, HitPropagation::Continue);
    assert_eq!(world.resource::<Calls>().0, vec!["trivial"]);
}

#[test]
fn default_handler_recycles_reusable_projectiles() {
    let mut world = with_default_handler(gameplay_world());
    let target = world.spawn(Health::full(10)).id();
    let action = ProjectileAction { reusable: true, damage_amount: 4, damage_type: DamageType::Fire, ..default() };
    let arrow = spawn_projectile(&mut world, action, Vec3::ZERO, Vec3::Z);

    assert_eq!(dispatch_hit(&mut world, hit_on(target, arrow)), HitPropagation::Consumed);

    assert_eq!(world.get::<Health>(target).unwrap().current, 6);
    assert!(world.get::<ProjectileMotion>(arrow).is_none());
    assert!(world.get::<DroppedItem>(arrow).is_some());
}

#[test]
fn survived_hit_keeps_flying_from_tick_start() {
    let mut world = scripted_world();
    register_hit_handler(&mut world, HitPriority::Normal, |_: In<HitTarget>| HitPropagation::Consumed);
    world.spawn((TestShape::Sphere(0.5), Transform::from_xyz(0.0, 0.0, 1.0), Health::full(10)));
    let arrow = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::ZERO, Vec3::Z * 10.0);

    assert_eq!(step_projectile(&mut world, arrow, 0.1), FlightStep::Advanced);
    let tf = world.get::<Transform>(arrow).unwrap();
    assert!((tf.translation - Vec3::Z).length() < 1e-6);
}

#[test]
fn handler_that_grounds_the_projectile_stops_it() {
    let mut world = scripted_world();
    register_hit_handler(&mut world, HitPriority::Normal, |In(hit): In<HitTarget>, mut commands: Commands| {
        commands.entity(hit.projectile).remove::<ProjectileMotion>();
        HitPropagation::Continue
    });
    world.spawn((TestShape::Sphere(0.5), Transform::from_xyz(0.0, 0.0, 1.0), Health::full(10)));
    let arrow = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::ZERO, Vec3::Z * 10.0);

    assert_eq!(step_projectile(&mut world, arrow, 0.1), FlightStep::Stopped);
    // Snapped to the hit point before the handler ran.
    let tf = world.get::<Transform>(arrow).unwrap();
    assert!((tf.translation - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
}

#[derive(Resource)]
struct Victim(Entity);

#[test]
fn projectiles_destroyed_mid_tick_are_skipped() {
    let mut world = scripted_world();
    register_hit_handler(&mut world, HitPriority::Normal, |_: In<HitTarget>, victim: Res<Victim>, mut commands: Commands| {
        commands.entity(victim.0).despawn();
        HitPropagation::Consumed
    });
    world.spawn((TestShape::Sphere(0.5), Transform::from_xyz(0.0, 0.0, 1.0), Health::full(10)));

    let shooter = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::ZERO, Vec3::Z * 10.0);
    let bystander = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::new(5.0, 0.0, 0.0), Vec3::X);
    // Whichever runs first, the bystander must not be stepped after the shooter's hit removed it.
    world.insert_resource(Victim(bystander));

    world.resource_mut::<Time>().advance_by(Duration::from_millis(100));
    simulate_projectiles(&mut world);

    assert!(world.get_entity(bystander).is_err());
    assert!(world.get_entity(shooter).is_ok());
}

#[test]
fn stale_ray_target_reads_as_miss() {
    let mut world = scripted_world();
    let ghost = world.spawn_empty().id();
    world.despawn(ghost);
    let caster = world.register_system(move |In(request): In<RayRequest>| {
        Some(RayImpact { entity: ghost, point: request.origin, normal: Vec3::NEG_Z })
    });
    world.insert_resource(ProjectileRaycast(caster));

    let arrow = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::ZERO, Vec3::Z * 10.0);
    assert_eq!(step_projectile(&mut world, arrow, 0.1), FlightStep::Advanced);
}

#[test]
fn stationary_projectile_neither_casts_nor_moves() {
    let mut world = scripted_world();
    world.spawn((TestShape::Sphere(5.0), Transform::default(), Health::full(10)));
    let p = spawn_projectile(&mut world, ProjectileAction::default(), Vec3::ZERO, Vec3::ZERO);

    assert_eq!(step_projectile(&mut world, p, 0.1), FlightStep::Advanced);
    assert_eq!(world.get::<Transform>(p).unwrap().translation, Vec3::ZERO);
}
