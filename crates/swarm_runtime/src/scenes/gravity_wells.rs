// gravity_wells.rs - Bodies orbiting attractors, one of which chases the pointer

use super::Scene;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swarm_core::components::{PhysicsAttraction, PhysicsAttractor, VerletBody};
use swarm_core::ecs::{Entity, Schedule, World, WorldError};
use swarm_core::glam::{Vec2, Vec3};
use swarm_core::input::InputEvent;
use swarm_core::render::{collect_bodies, DrawItem};
use swarm_core::systems::{
    assign_behavior, AttractionSystem, BehaviorSystem, MouseFollow, VerletPhysicsSystem,
};
use swarm_core::time::{ClockConfig, DeltaPolicy};
use swarm_services::Settings;

pub struct GravityWells {
    world: World,
    schedule: Schedule,
    rng: StdRng,
}

impl GravityWells {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut world = World::new();

        let mut schedule = Schedule::new();
        schedule.register(BehaviorSystem)?;
        schedule.register(AttractionSystem)?;
        schedule.register(VerletPhysicsSystem)?;

        let subject = world.create();
        world.assign(subject, PhysicsAttraction::default())?;
        world
            .assign(subject, VerletBody::new(settings.window.center().extend(0.0)).with_drag(0.05))?
            .nudge(Vec3::new(500.0, 0.0, -500.0));

        let fixed = world.create();
        world.assign(fixed, VerletBody::new(Vec3::new(320.0, 240.0, 100.0)))?;
        world.assign(fixed, PhysicsAttractor::default())?;

        let follower = world.create();
        world.assign(follower, VerletBody::new(Vec3::new(400.0, 500.0, -150.0)).with_drag(0.24))?;
        world.assign(follower, PhysicsAttractor::default())?;
        assign_behavior(&mut world, follower, MouseFollow::new(2.4))?;

        Ok(Self {
            world,
            schedule,
            rng: StdRng::seed_from_u64(settings.seed),
        })
    }

    fn add_body(&mut self, position: Vec2) -> Result<Entity, WorldError> {
        let drag = self.rng.gen_range(0.04..0.08);
        let body = self.world.create();
        self.world.assign(body, PhysicsAttraction { strength: 0.5 })?;
        self.world
            .assign(body, VerletBody::new(position.extend(0.0)).with_drag(drag))?;
        tracing::debug!(%body, ?position, drag, "body added");
        Ok(body)
    }
}

impl Scene for GravityWells {
    fn name(&self) -> &'static str {
        "gravity-wells"
    }

    fn world(&self) -> &World {
        &self.world
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn default_clock(&self) -> ClockConfig {
        ClockConfig {
            policy: DeltaPolicy::clamped(),
        }
    }

    fn handle_input(&mut self, event: &InputEvent) {
        BehaviorSystem::dispatch(&mut self.world, event);
        if let InputEvent::PointerDown { position } = *event {
            if let Err(error) = self.add_body(position) {
                tracing::warn!(%error, "failed to add body");
            }
        }
    }

    fn update(&mut self, dt: f32) {
        self.schedule.run(&mut self.world, dt);
    }

    fn draw(&self) -> Vec<DrawItem> {
        collect_bodies(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::ecs::{Component, SystemDependency};
    use swarm_core::render::{ATTRACTOR_SIZE, BODY_SIZE};
    use swarm_core::time::DEFAULT_STEP;

    fn scene() -> GravityWells {
        GravityWells::new(&Settings::default()).unwrap()
    }

    #[test]
    fn setup_places_subject_and_two_wells() {
        let scene = scene();
        let items = scene.draw();
        assert_eq!(items.len(), 3);
        assert_eq!(items.iter().filter(|i| i.radius == ATTRACTOR_SIZE).count(), 2);
        assert_eq!(items[0].radius, BODY_SIZE);
        assert_eq!(items[0].position, Vec3::new(330.0, 250.0, 0.0));
    }

    #[test]
    fn attraction_is_ordered_before_integration() {
        let scene = scene();
        let expected = SystemDependency {
            before: "attraction",
            after: "verlet",
            component: VerletBody::ID,
        };
        assert_eq!(scene.schedule().dependencies(), vec![expected]);
    }

    #[test]
    fn nudged_subject_moves_on_first_step() {
        let mut scene = scene();
        scene.update(DEFAULT_STEP);
        let subject = scene.world().entities()[0];
        let body = scene.world().get::<VerletBody>(subject).unwrap();
        assert!(body.position.x > 330.0);
        assert!(body.position.z < 0.0);
    }

    #[test]
    fn pointer_down_adds_weak_subject() {
        let mut scene = scene();
        scene.handle_input(&InputEvent::PointerDown { position: Vec2::new(50.0, 60.0) });
        let added = scene.world().entities()[3];

        let strength = scene.world().get::<PhysicsAttraction>(added).map(|a| a.strength);
        assert_eq!(strength, Some(0.5));
        let body = scene.world().get::<VerletBody>(added).unwrap();
        assert_eq!(body.position, Vec3::new(50.0, 60.0, 0.0));
        assert!((0.04..0.08).contains(&body.drag));
    }

    #[test]
    fn follower_tracks_pointer() {
        let mut scene = scene();
        let follower = scene.world().entities()[2];
        let before = scene.world().get::<VerletBody>(follower).unwrap().position;

        scene.handle_input(&InputEvent::PointerMove { position: Vec2::new(600.0, 500.0) });
        for _ in 0..10 {
            scene.update(DEFAULT_STEP);
        }
        let after = scene.world().get::<VerletBody>(follower).unwrap().position;
        assert!(after.x > before.x);
    }
}
