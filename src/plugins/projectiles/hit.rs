//! Hit-target dispatch.
//!
//! Handlers are one-shot systems registered with a priority band. A hit is offered to
//! them in band order and stops at the first handler that consumes it, so an archetype
//! handler at `Normal` fully replaces the `Low` default.
//!
//! Dispatch is synchronous: by the time `dispatch_hit` returns, every handler has run and
//! its commands are applied. Handlers may despawn the projectile, the target, or strip
//! the projectile's motion; callers must re-check before touching either again.

use bevy::ecs::system::SystemId;
use bevy::prelude::*;

/// Payload of a hit. `origin` is carried for observers but never filled in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTarget {
    pub target: Entity,
    pub projectile: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
}

/// Invocation order, highest band first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HitPriority {
    Critical,
    High,
    Normal,
    /// Overridable default behaviour lives here.
    Low,
    Trivial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitPropagation {
    Continue,
    Consumed,
}

pub type HitHandler = SystemId<In<HitTarget>, HitPropagation>;

/// Registered handlers, kept sorted by priority. Equal priorities run in registration order.
#[derive(Resource, Debug, Default)]
pub struct HitHandlers {
    handlers: Vec<(HitPriority, HitHandler)>,
}

impl HitHandlers {
    pub fn register(&mut self, priority: HitPriority, handler: HitHandler) {
        let at = self.handlers.partition_point(|(p, _)| *p <= priority);
        self.handlers.insert(at, (priority, handler));
    }

    pub fn ordered(&self) -> impl Iterator<Item = HitHandler> + '_ {
        self.handlers.iter().map(|(_, id)| *id)
    }
}

pub trait HitHandlerAppExt {
    fn add_hit_handler<M>(
        &mut self,
        priority: HitPriority,
        handler: impl IntoSystem<In<HitTarget>, HitPropagation, M> + 'static,
    ) -> &mut Self;
}

impl HitHandlerAppExt for App {
    fn add_hit_handler<M>(
        &mut self,
        priority: HitPriority,
        handler: impl IntoSystem<In<HitTarget>, HitPropagation, M> + 'static,
    ) -> &mut Self {
        register_hit_handler(self.world_mut(), priority, handler);
        self
    }
}

/// `World`-level registration, for tests and exclusive setup code.
pub fn register_hit_handler<M>(
    world: &mut World,
    priority: HitPriority,
    handler: impl IntoSystem<In<HitTarget>, HitPropagation, M> + 'static,
) -> HitHandler {
    let id = world.register_system(handler);
    world
        .get_resource_or_init::<HitHandlers>()
        .register(priority, id);
    id
}

/// Offer `hit` to every handler in priority order until one consumes it.
pub fn dispatch_hit(world: &mut World, hit: HitTarget) -> HitPropagation {
    let handlers: Vec<HitHandler> = match world.get_resource::<HitHandlers>() {
        Some(handlers) => handlers.ordered().collect(),
        None => return HitPropagation::Continue,
    };

    for id in handlers {
        match world.run_system_with(id, hit) {
            Ok(HitPropagation::Consumed) => return HitPropagation::Consumed,
            Ok(HitPropagation::Continue) => {}
            Err(err) => warn!("hit handler {id:?} failed: {err}"),
        }
    }
    HitPropagation::Continue
}
