// behavior.rs - Polymorphic per-entity behaviors
//
// Behaviors are trait objects stored per entity, at most one per concrete
// type. While an entity's behaviors run they are taken out of the world so
// each one can freely mutate the world (including its own entity). Anything
// assigned to the entity during that window is merged back afterwards.

use crate::define_component;
use crate::ecs::{Component, ComponentSet, Entity, System, SystemDescriptor, World, WorldError};
use crate::input::InputEvent;
use std::any::{Any, TypeId};

/// Upcast helper so `dyn Behavior` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Logic attached to a single entity.
pub trait Behavior: AsAny {
    /// Called once per frame.
    fn update(&mut self, world: &mut World, entity: Entity, dt: f32);

    /// Called for every input event routed through [`BehaviorSystem::dispatch`].
    fn handle_event(&mut self, _world: &mut World, _entity: Entity, _event: &InputEvent) {}

    /// Completed behaviors are dropped and never called again.
    fn is_complete(&self) -> bool {
        false
    }
}

fn downcast_ref<'a, B: Behavior>(behavior: &'a (dyn Behavior + 'static)) -> Option<&'a B> {
    <dyn Behavior as AsAny>::as_any(behavior).downcast_ref::<B>()
}

fn downcast_mut<'a, B: Behavior>(
    behavior: &'a mut (dyn Behavior + 'static),
) -> Option<&'a mut B> {
    <dyn Behavior as AsAny>::as_any_mut(behavior).downcast_mut::<B>()
}

/// The behaviors attached to one entity, in assignment order.
#[derive(Default)]
pub struct Behaviors {
    slots: Vec<(TypeId, Box<dyn Behavior>)>,
}

define_component!(Behaviors, 5, "Behaviors");

impl Behaviors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `behavior`, replacing any behavior of the same type. Returns `true`
    /// when one was replaced.
    pub fn insert<B: Behavior>(&mut self, behavior: B) -> bool {
        self.insert_boxed(TypeId::of::<B>(), Box::new(behavior))
    }

    fn insert_boxed(&mut self, type_id: TypeId, behavior: Box<dyn Behavior>) -> bool {
        match self.slots.iter_mut().find(|(id, _)| *id == type_id) {
            Some(slot) => {
                slot.1 = behavior;
                true
            }
            None => {
                self.slots.push((type_id, behavior));
                false
            }
        }
    }

    pub fn get<B: Behavior>(&self) -> Option<&B> {
        self.slots
            .iter()
            .find(|(id, _)| *id == TypeId::of::<B>())
            .and_then(|(_, behavior)| downcast_ref::<B>(&**behavior))
    }

    pub fn get_mut<B: Behavior>(&mut self) -> Option<&mut B> {
        self.slots
            .iter_mut()
            .find(|(id, _)| *id == TypeId::of::<B>())
            .and_then(|(_, behavior)| downcast_mut::<B>(&mut **behavior))
    }

    pub fn contains<B: Behavior>(&self) -> bool {
        self.slots.iter().any(|(id, _)| *id == TypeId::of::<B>())
    }

    pub fn remove<B: Behavior>(&mut self) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(id, _)| *id != TypeId::of::<B>());
        self.slots.len() != before
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop completed behaviors.
    fn prune(&mut self) {
        self.slots.retain(|(_, behavior)| !behavior.is_complete());
    }

    /// Fold in behaviors assigned while `self` was out of the world. Newer
    /// entries win.
    fn merge(&mut self, newer: Behaviors) {
        for (type_id, behavior) in newer.slots {
            self.insert_boxed(type_id, behavior);
        }
    }
}

/// Attach `behavior` to `entity`, replacing one of the same type, and return
/// it for further configuration.
pub fn assign_behavior<B: Behavior>(
    world: &mut World,
    entity: Entity,
    behavior: B,
) -> Result<&mut B, WorldError> {
    if !world.has::<Behaviors>(entity) {
        world.assign(entity, Behaviors::new())?;
    }
    let behaviors = world
        .get_mut::<Behaviors>(entity)
        .ok_or(WorldError::InvalidEntity { entity })?;
    behaviors.insert(behavior);
    behaviors
        .get_mut::<B>()
        .ok_or(WorldError::InvalidEntity { entity })
}

/// Look up the `B` attached to `entity`.
///
/// Returns `None` while the entity's own behaviors are running.
pub fn behavior<B: Behavior>(world: &World, entity: Entity) -> Option<&B> {
    world.get::<Behaviors>(entity)?.get::<B>()
}

pub fn behavior_mut<B: Behavior>(world: &mut World, entity: Entity) -> Option<&mut B> {
    world.get_mut::<Behaviors>(entity)?.get_mut::<B>()
}

/// Drives every entity's behaviors.
#[derive(Debug, Default, Clone, Copy)]
pub struct BehaviorSystem;

impl BehaviorSystem {
    /// Update every live behavior once.
    pub fn update(world: &mut World, dt: f32) {
        for entity in world.query(&ComponentSet::from([Behaviors::ID])) {
            Self::run_entity(world, entity, |behavior, world| {
                behavior.update(world, entity, dt);
            });
        }
    }

    /// Route an input event to every live behavior.
    pub fn dispatch(world: &mut World, event: &InputEvent) {
        for entity in world.query(&ComponentSet::from([Behaviors::ID])) {
            Self::run_entity(world, entity, |behavior, world| {
                behavior.handle_event(world, entity, event);
            });
        }
    }

    fn run_entity<F>(world: &mut World, entity: Entity, mut call: F)
    where
        F: FnMut(&mut dyn Behavior, &mut World),
    {
        let Ok(Some(mut running)) = world.remove::<Behaviors>(entity) else {
            return;
        };

        for (_, behavior) in running.slots.iter_mut() {
            if !world.is_alive(entity) {
                break;
            }
            if !behavior.is_complete() {
                call(&mut **behavior, world);
            }
        }

        if !world.is_alive(entity) {
            return;
        }

        running.prune();
        if let Ok(Some(added)) = world.remove::<Behaviors>(entity) {
            running.merge(added);
        }
        if running.is_empty() {
            tracing::trace!(%entity, "all behaviors complete");
            return;
        }
        if let Err(error) = world.assign(entity, running) {
            tracing::warn!(%entity, %error, "failed to restore behaviors");
        }
    }
}

impl System for BehaviorSystem {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("behaviors").writes([Behaviors::ID])
    }

    fn run(&mut self, world: &mut World, dt: f32) {
        Self::update(world, dt);
    }
}
