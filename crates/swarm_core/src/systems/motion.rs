// motion.rs - Free-function passes over moving dots

use crate::components::{Circle, Expires, Motion, Position};
use crate::ecs::{Component, ComponentSet, System, SystemDescriptor, World};
use crate::math::WorldBounds;

/// Scale each [`Motion`] speed by how much of the entity's lifetime remains.
pub fn slow_down_with_age(world: &mut World) {
    for entity in world.query(&ComponentSet::from([Motion::ID, Expires::ID])) {
        let Some(fraction) = world.get::<Expires>(entity).map(Expires::remaining_fraction) else {
            continue;
        };
        if let Some(motion) = world.get_mut::<Motion>(entity) {
            motion.speed = motion.launch_speed * fraction;
        }
    }
}

/// Move every [`Position`] along its [`Motion`].
pub fn apply_motion(world: &mut World, dt: f32) {
    for entity in world.query(&ComponentSet::from([Position::ID, Motion::ID])) {
        let Some(velocity) = world.get::<Motion>(entity).map(Motion::velocity) else {
            continue;
        };
        if let Some(position) = world.get_mut::<Position>(entity) {
            position.0 += velocity * dt;
        }
    }
}

/// Wrap every [`Position`] back into `bounds`.
pub fn border_wrap(world: &mut World, bounds: &WorldBounds) {
    for entity in world.query(&ComponentSet::from([Position::ID])) {
        if let Some(position) = world.get_mut::<Position>(entity) {
            position.0 = bounds.wrap(position.0);
        }
    }
}

/// Set each circle's alpha to the fraction of lifetime remaining.
pub fn fade_with_age(world: &mut World) {
    for entity in world.query(&ComponentSet::from([Circle::ID, Expires::ID])) {
        let Some(fraction) = world.get::<Expires>(entity).map(Expires::remaining_fraction) else {
            continue;
        };
        if let Some(circle) = world.get_mut::<Circle>(entity) {
            circle.color.a = fraction;
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SlowDownWithAge;

impl System for SlowDownWithAge {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("slow_down_with_age")
            .reads([Expires::ID])
            .writes([Motion::ID])
    }

    fn run(&mut self, world: &mut World, _dt: f32) {
        slow_down_with_age(world);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ApplyMotion;

impl System for ApplyMotion {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("apply_motion")
            .reads([Motion::ID])
            .writes([Position::ID])
    }

    fn run(&mut self, world: &mut World, dt: f32) {
        apply_motion(world, dt);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BorderWrap {
    pub bounds: WorldBounds,
}

impl BorderWrap {
    pub fn new(bounds: WorldBounds) -> Self {
        Self { bounds }
    }
}

impl System for BorderWrap {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("border_wrap").writes([Position::ID])
    }

    fn run(&mut self, world: &mut World, _dt: f32) {
        border_wrap(world, &self.bounds);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FadeWithAge;

impl System for FadeWithAge {
    fn descriptor(&self) -> SystemDescriptor {
        SystemDescriptor::new("fade_with_age")
            .reads([Expires::ID])
            .writes([Circle::ID])
    }

    fn run(&mut self, world: &mut World, _dt: f32) {
        fade_with_age(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    #[test]
    fn dots_slow_and_fade_with_age() {
        let mut world = World::new();
        let e = world.create();
        world.assign(e, Position(Vec2::ZERO)).unwrap();
        world.assign(e, Circle::new(10.0)).unwrap();
        world.assign(e, Motion::new(Vec2::X, 100.0)).unwrap();
        let mut expires = Expires::new(4.0);
        expires.remaining = 1.0;
        world.assign(e, expires).unwrap();

        slow_down_with_age(&mut world);
        fade_with_age(&mut world);

        assert_relative_eq!(world.get::<Motion>(e).unwrap().speed, 25.0);
        assert_relative_eq!(world.get::<Motion>(e).unwrap().launch_speed, 100.0);
        assert_relative_eq!(world.get::<Circle>(e).unwrap().color.a, 0.25);
    }

    #[test]
    fn motion_moves_then_wraps() {
        let mut world = World::new();
        let e = world.create();
        world.assign(e, Position(Vec2::new(650.0, 250.0))).unwrap();
        world.assign(e, Motion::new(Vec2::X, 60.0)).unwrap();

        apply_motion(&mut world, 0.5);
        assert_relative_eq!(world.get::<Position>(e).unwrap().0.x, 680.0);
        border_wrap(&mut world, &WorldBounds::default());
        assert_relative_eq!(world.get::<Position>(e).unwrap().0.x, 20.0, epsilon = 1e-4);
    }
}
