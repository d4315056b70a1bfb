//! Draw extraction
//!
//! The renderer is external. After the frame's systems have run it asks for
//! a flat list of [`DrawItem`]s built from the world.

use crate::components::{Circle, Color, PhysicsAttractor, Position, VerletBody};
use crate::ecs::{Component, ComponentSet, World};
use glam::Vec3;
use serde::Serialize;

/// Drawn size of a body that carries a [`PhysicsAttractor`].
pub const ATTRACTOR_SIZE: f32 = 8.0;
/// Drawn size of every other body.
pub const BODY_SIZE: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawItem {
    pub position: Vec3,
    pub radius: f32,
    pub color: Color,
    /// Radius of an outline ring drawn around the item, if any.
    pub ring: Option<f32>,
}

/// One solid circle per entity with both [`Position`] and [`Circle`].
pub fn collect_circles(world: &World) -> Vec<DrawItem> {
    world
        .query(&ComponentSet::from([Position::ID, Circle::ID]))
        .into_iter()
        .filter_map(|entity| {
            let position = world.get::<Position>(entity)?;
            let circle = world.get::<Circle>(entity)?;
            Some(DrawItem {
                position: position.0.extend(0.0),
                radius: circle.radius(),
                color: circle.color,
                ring: None,
            })
        })
        .collect()
}

/// One sphere per [`VerletBody`]; attractors are drawn small with their
/// falloff distance as a ring.
pub fn collect_bodies(world: &World) -> Vec<DrawItem> {
    world
        .query(&ComponentSet::from([VerletBody::ID]))
        .into_iter()
        .filter_map(|entity| {
            let body = world.get::<VerletBody>(entity)?;
            let attractor = world.get::<PhysicsAttractor>(entity);
            Some(DrawItem {
                position: body.position,
                radius: if attractor.is_some() { ATTRACTOR_SIZE } else { BODY_SIZE },
                color: Color::WHITE,
                ring: attractor.map(|a| a.distance_falloff),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn circles_need_position_and_shape() {
        let mut world = World::new();
        let drawn = world.create();
        world.assign(drawn, Position(Vec2::new(1.0, 2.0))).unwrap();
        world.assign(drawn, Circle::with_color(10.0, Color::gray(0.5))).unwrap();
        let hidden = world.create();
        world.assign(hidden, Position(Vec2::ZERO)).unwrap();

        let items = collect_circles(&world);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(items[0].radius, 5.0);
        assert_eq!(items[0].color, Color::gray(0.5));
    }

    #[test]
    fn attractors_are_small_with_ring() {
        let mut world = World::new();
        let well = world.create();
        world.assign(well, VerletBody::new(Vec3::ZERO)).unwrap();
        world.assign(well, PhysicsAttractor::default()).unwrap();
        let body = world.create();
        world.assign(body, VerletBody::new(Vec3::ONE)).unwrap();

        let items = collect_bodies(&world);
        assert_eq!(items.len(), 2);
        assert_eq!((items[0].radius, items[0].ring), (ATTRACTOR_SIZE, Some(160.0)));
        assert_eq!((items[1].radius, items[1].ring), (BODY_SIZE, None));
    }
}
