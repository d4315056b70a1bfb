// expires.rs - Lifetime countdown and last wishes

use crate::components::Expires;
use crate::ecs::{Component, ComponentSet, System, SystemDescriptor, World};

/// Counts down every [`Expires`] component and destroys entities whose time
/// has run out, running their last wish first.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpiresSystem;

impl ExpiresSystem {
    /// Advance all timers by `dt` seconds. Returns how many entities expired.
    ///
    /// The set of entities visited is fixed when the pass starts: entities
    /// spawned by a last wish are first counted down on the next call, and
    /// entities destroyed by an earlier last wish are skipped.
    pub fn update(world: &mut World, dt: f32) -> usize {
        let snapshot = world.query(&ComponentSet::from([Expires::ID]));
        let mut expired = 0;

        for entity in snapshot {
            let Some(expires) = world.get_mut::<Expires>(entity) else {
                continue;
            };
            expires.remaining -= dt;
            if !expires.is_expired() {
                continue;
            }

            // Taken out first so the wish can never run twice.
            if let Some(last_wish) = expires.last_wish.take() {
                tracing::trace!(%entity, "running last wish");
                last_wish(world, entity);
            }
            world.destroy(entity);
            expired += 1;
        }

        if expired > 0 {
            tracing::trace!(expired, "expiry pass finished");
        }
        expired
    }
}

impl System for ExpiresSystem {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("expires").writes([Expires::ID])
    }

    fn run(&mut self, world: &mut World, dt: f32) {
        Self::update(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Position;
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn last_wish_runs_once_before_destroy() {
        let mut world = World::new();
        let calls = Rc::new(Cell::new(0));
        let seen_position = Rc::new(Cell::new(None));

        let e = world.create();
        world.assign(e, Position(Vec2::new(3.0, 4.0))).unwrap();
        let (c, p) = (Rc::clone(&calls), Rc::clone(&seen_position));
        world
            .assign(
                e,
                Expires::new(1.0).with_last_wish(move |world, entity| {
                    c.set(c.get() + 1);
                    p.set(world.get::<Position>(entity).map(|pos| pos.0));
                }),
            )
            .unwrap();

        assert_eq!(ExpiresSystem::update(&mut world, 0.6), 0);
        assert!(world.is_alive(e));
        assert_eq!(ExpiresSystem::update(&mut world, 0.6), 1);
        assert_eq!(ExpiresSystem::update(&mut world, 0.6), 0);

        assert_eq!(calls.get(), 1);
        assert_eq!(seen_position.get(), Some(Vec2::new(3.0, 4.0)));
        assert!(!world.is_alive(e));
    }

    #[test]
    fn entity_without_last_wish_is_destroyed() {
        let mut world = World::new();
        let e = world.create();
        world.assign(e, Expires::new(0.5)).unwrap();
        ExpiresSystem::update(&mut world, 0.5);
        assert!(!world.is_alive(e));
    }

    #[test]
    fn last_wish_may_destroy_its_own_entity() {
        let mut world = World::new();
        let e = world.create();
        world
            .assign(
                e,
                Expires::new(0.1).with_last_wish(|world, entity| {
                    assert!(world.destroy(entity));
                }),
            )
            .unwrap();
        assert_eq!(ExpiresSystem::update(&mut world, 1.0), 1);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn spawned_entities_wait_for_next_pass() {
        let mut world = World::new();
        let parent = world.create();
        world
            .assign(
                parent,
                Expires::new(0.1).with_last_wish(|world, _| {
                    let child = world.create();
                    world.assign(child, Expires::new(0.1)).unwrap();
                }),
            )
            .unwrap();

        assert_eq!(ExpiresSystem::update(&mut world, 1.0), 1);
        assert_eq!(world.entity_count(), 1);
        let child = world.entities()[0];
        assert_eq!(world.get::<Expires>(child).map(|e| e.remaining), Some(0.1));

        assert_eq!(ExpiresSystem::update(&mut world, 1.0), 1);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn entity_destroyed_by_earlier_wish_is_skipped() {
        let mut world = World::new();
        let first = world.create();
        let second = world.create();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        world
            .assign(
                first,
                Expires::new(0.1).with_last_wish(move |world, _| {
                    world.destroy(second);
                }),
            )
            .unwrap();
        world
            .assign(second, Expires::new(0.1).with_last_wish(move |_, _| flag.set(true)))
            .unwrap();

        assert_eq!(ExpiresSystem::update(&mut world, 1.0), 1);
        assert!(!fired.get());
        assert_eq!(world.entity_count(), 0);
    }
}
