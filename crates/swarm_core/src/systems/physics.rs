// physics.rs - Gravity-well attraction and verlet integration

use crate::components::{PhysicsAttraction, PhysicsAttractor, VerletBody};
use crate::ecs::{Component, ComponentSet, Entity, System, SystemDescriptor, World};
use crate::math::EPSILON;
use glam::Vec3;
use rayon::prelude::*;

/// Acceleration (units/s²) produced by a unit-strength attractor on a
/// unit-strength subject sitting on top of it.
pub const ATTRACTION_SCALE: f32 = 1000.0;

/// Falloff weight in `(0, 1]`: 1 at distance 0, 0.5 at `distance == falloff`.
pub fn attraction_weight(distance: f32, falloff: f32) -> f32 {
    if falloff <= 0.0 {
        return 0.0;
    }
    falloff / (falloff + distance.max(0.0))
}

/// Acceleration pulling a subject at `subject` toward an attractor at `attractor_position`.
pub fn attraction_force(
    subject: Vec3,
    subject_strength: f32,
    attractor_position: Vec3,
    attractor: &PhysicsAttractor,
) -> Vec3 {
    let offset = attractor_position - subject;
    let distance = offset.length();
    if !distance.is_finite() || distance < EPSILON {
        return Vec3::ZERO;
    }
    let direction = offset / distance;
    direction
        * attraction_weight(distance, attractor.distance_falloff)
        * attractor.strength
        * subject_strength
        * ATTRACTION_SCALE
}

/// Accumulate attraction from every attractor into every attraction subject.
/// Returns the number of subjects updated.
pub fn apply_physics_attraction(world: &mut World) -> usize {
    let attractors: Vec<(Vec3, PhysicsAttractor)> = world
        .query(&ComponentSet::from([VerletBody::ID, PhysicsAttractor::ID]))
        .into_iter()
        .filter_map(|e| {
            let body = world.get::<VerletBody>(e)?;
            Some((body.position, *world.get::<PhysicsAttractor>(e)?))
        })
        .collect();
    let subjects: Vec<(Entity, Vec3, f32)> = world
        .query(&ComponentSet::from([VerletBody::ID, PhysicsAttraction::ID]))
        .into_iter()
        .filter_map(|e| {
            Some((
                e,
                world.get::<VerletBody>(e)?.position,
                world.get::<PhysicsAttraction>(e)?.strength,
            ))
        })
        .collect();

    if attractors.is_empty() {
        return 0;
    }

    let forces: Vec<(Entity, Vec3)> = subjects
        .par_iter()
        .map(|&(entity, position, strength)| {
            let total = attractors
                .iter()
                .map(|(at, attractor)| attraction_force(position, strength, *at, attractor))
                .fold(Vec3::ZERO, |acc, force| acc + force);
            (entity, total)
        })
        .collect();

    for &(entity, force) in &forces {
        if let Some(body) = world.get_mut::<VerletBody>(entity) {
            body.accelerate(force);
        }
    }
    forces.len()
}

/// Runs [`apply_physics_attraction`] as a scheduled system.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttractionSystem;

impl System for AttractionSystem {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("attraction")
            .reads([PhysicsAttractor::ID, PhysicsAttraction::ID])
            .writes([VerletBody::ID])
    }

    fn run(&mut self, world: &mut World, _dt: f32) {
        apply_physics_attraction(world);
    }
}

/// Integrates every [`VerletBody`].
#[derive(Debug, Default, Clone, Copy)]
pub struct VerletPhysicsSystem;

impl VerletPhysicsSystem {
    /// One verlet step for a single body.
    pub fn step(body: &mut VerletBody, dt: f32) {
        let velocity = (body.position - body.previous) * (1.0 - body.drag) + body.impulse * dt;
        let next = body.position + velocity + body.acceleration * dt * dt;
        body.previous = body.position;
        body.position = next;
        body.acceleration = Vec3::ZERO;
        body.impulse = Vec3::ZERO;
    }

    pub fn update(world: &mut World, dt: f32) {
        for entity in world.query(&ComponentSet::from([VerletBody::ID])) {
            if let Some(body) = world.get_mut::<VerletBody>(entity) {
                Self::step(body, dt);
            }
        }
    }
}

impl System for VerletPhysicsSystem {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("verlet").writes([VerletBody::ID])
    }

    fn run(&mut self, world: &mut World, dt: f32) {
        Self::update(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weight_is_one_at_zero_and_decreasing() {
        assert_relative_eq!(attraction_weight(0.0, 160.0), 1.0);
        assert_relative_eq!(attraction_weight(160.0, 160.0), 0.5);
        assert!(attraction_weight(10.0, 160.0) > attraction_weight(20.0, 160.0));
        assert_eq!(attraction_weight(5.0, 0.0), 0.0);
    }

    #[test]
    fn coincident_bodies_produce_no_force() {
        let force = attraction_force(Vec3::ONE, 1.0, Vec3::ONE, &PhysicsAttractor::default());
        assert_eq!(force, Vec3::ZERO);
    }

    #[test]
    fn nudge_moves_body_on_next_step() {
        let mut body = VerletBody::new(Vec3::ZERO);
        body.nudge(Vec3::new(60.0, 0.0, 0.0));
        VerletPhysicsSystem::step(&mut body, 1.0 / 60.0);
        assert_relative_eq!(body.position.x, 1.0, epsilon = 1e-5);
        assert_eq!(body.impulse, Vec3::ZERO);

        // keeps coasting without drag
        VerletPhysicsSystem::step(&mut body, 1.0 / 60.0);
        assert_relative_eq!(body.position.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn drag_bleeds_velocity() {
        let mut body = VerletBody::new(Vec3::ZERO).with_drag(0.5);
        body.previous = Vec3::new(-2.0, 0.0, 0.0);
        VerletPhysicsSystem::step(&mut body, 1.0 / 60.0);
        assert_relative_eq!(body.position.x, 1.0);
        assert_relative_eq!(body.velocity().x, 1.0);
    }

    #[test]
    fn subjects_accelerate_toward_attractors() {
        let mut world = World::new();
        let well = world.create();
        world.assign(well, VerletBody::new(Vec3::new(100.0, 0.0, 0.0))).unwrap();
        world.assign(well, PhysicsAttractor::default()).unwrap();

        let subject = world.create();
        world.assign(subject, VerletBody::new(Vec3::ZERO)).unwrap();
        world.assign(subject, PhysicsAttraction { strength: 0.5 }).unwrap();

        let bystander = world.create();
        world.assign(bystander, VerletBody::new(Vec3::ZERO)).unwrap();

        assert_eq!(apply_physics_attraction(&mut world), 1);
        let acceleration = world.get::<VerletBody>(subject).map(|b| b.acceleration).unwrap();
        let expected = attraction_weight(100.0, 160.0) * 0.5 * ATTRACTION_SCALE;
        assert_relative_eq!(acceleration.x, expected, epsilon = 1e-3);
        assert_relative_eq!(acceleration.y, 0.0);
        assert_eq!(world.get::<VerletBody>(bystander).map(|b| b.acceleration), Some(Vec3::ZERO));
        // attractors without PhysicsAttraction are not pulled
        assert_eq!(world.get::<VerletBody>(well).map(|b| b.acceleration), Some(Vec3::ZERO));
    }
}
