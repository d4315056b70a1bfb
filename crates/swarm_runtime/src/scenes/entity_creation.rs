// entity_creation.rs - Dots that drift, slow, and split when they expire
//
// Pointer-down places a gray scaffold that follows the drag. Releasing it
// launches a dot with the flick velocity. `C` toggles trail mode, where the
// renderer stops clearing and dots fade out instead.

use super::Scene;
use anyhow::{Context, Result};
use swarm_core::components::{Circle, Color, Position};
use swarm_core::ecs::{Entity, Schedule, SystemHandle, World, WorldError};
use swarm_core::glam::Vec2;
use swarm_core::input::{InputEvent, KeyCode};
use swarm_core::render::{collect_circles, DrawItem};
use swarm_core::spawn::DotSpawner;
use swarm_core::systems::{
    assign_behavior, ApplyMotion, BehaviorSystem, BorderWrap, DragTracker, ExpiresSystem,
    FadeWithAge, SlowDownWithAge,
};
use swarm_core::time::{ClockConfig, DeltaPolicy, DEFAULT_STEP};
use swarm_services::Settings;

const INITIAL_DIAMETER: f32 = 36.0;
const SCAFFOLD_DIAMETER: f32 = 49.0;

/// Marks the placeholder entity shown while a new dot is being dragged out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaffold;

swarm_core::define_component!(Scaffold, 100, "Scaffold");

pub struct EntityCreation {
    world: World,
    schedule: Schedule,
    fade: SystemHandle,
    clear: bool,
}

impl EntityCreation {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut world = World::new();
        world.insert_resource(DotSpawner::new(settings.spawn, settings.seed));

        let mut schedule = Schedule::new();
        schedule.register(ExpiresSystem)?;
        schedule.register(BehaviorSystem)?;
        schedule.register(SlowDownWithAge)?;
        schedule.register(ApplyMotion)?;
        schedule.register(BorderWrap::new(settings.window.bounds()))?;
        let fade = schedule.register(FadeWithAge)?;
        schedule.set_enabled(fade, false);

        DotSpawner::create_dot(&mut world, settings.window.center(), Vec2::X, INITIAL_DIAMETER)
            .context("initial dot rejected by spawner")?;

        Ok(Self {
            world,
            schedule,
            fade,
            clear: true,
        })
    }

    /// Whether the renderer clears between frames.
    pub fn is_clearing(&self) -> bool {
        self.clear
    }

    pub fn toggle_clear(&mut self) {
        self.clear = !self.clear;
        self.schedule.set_enabled(self.fade, !self.clear);
        tracing::info!(clear = self.clear, "clear mode toggled");
    }

    fn create_scaffold(&mut self, position: Vec2) -> Result<Entity, WorldError> {
        let world = &mut self.world;
        let scaffold = world.create();
        world.assign(scaffold, Position(position))?;
        world.assign(scaffold, Circle::with_color(SCAFFOLD_DIAMETER, Color::gray(0.5)))?;
        world.assign(scaffold, Scaffold)?;
        assign_behavior(world, scaffold, DragTracker::new(position))?.set_release_callback(
            |world, entity, release| {
                DotSpawner::create_dot(world, release.position, release.flick(), SCAFFOLD_DIAMETER);
                world.destroy(entity);
            },
        );
        Ok(scaffold)
    }
}

impl Scene for EntityCreation {
    fn name(&self) -> &'static str {
        "entity-creation"
    }

    fn world(&self) -> &World {
        &self.world
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn default_clock(&self) -> ClockConfig {
        ClockConfig {
            policy: DeltaPolicy::Fixed { step: DEFAULT_STEP },
        }
    }

    fn handle_input(&mut self, event: &InputEvent) {
        BehaviorSystem::dispatch(&mut self.world, event);
        match *event {
            InputEvent::PointerDown { position } => {
                if let Err(error) = self.create_scaffold(position) {
                    tracing::warn!(%error, "failed to create scaffold");
                }
            }
            InputEvent::Key { code: KeyCode::C } => self.toggle_clear(),
            _ => {}
        }
    }

    fn update(&mut self, dt: f32) {
        self.schedule.run(&mut self.world, dt);
    }

    fn draw(&self) -> Vec<DrawItem> {
        collect_circles(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::ecs::{Component, ComponentSet};
    use swarm_core::spawn::Dot;

    fn scene() -> EntityCreation {
        EntityCreation::new(&Settings::default()).unwrap()
    }

    fn dots(world: &World) -> Vec<Entity> {
        world.query(&ComponentSet::from([Dot::ID]))
    }

    #[test]
    fn starts_with_one_centered_dot() {
        let scene = scene();
        let dots = dots(scene.world());
        assert_eq!(dots.len(), 1);
        let position = scene.world().get::<Position>(dots[0]).unwrap().0;
        assert_eq!(position, Vec2::new(330.0, 250.0));
        assert_eq!(scene.world().get::<Circle>(dots[0]).unwrap().diameter, 36.0);
    }

    #[test]
    fn drag_release_launches_dot_and_removes_scaffold() {
        let mut scene = scene();
        scene.handle_input(&InputEvent::PointerDown { position: Vec2::new(100.0, 100.0) });
        let scaffolds = scene.world().query(&ComponentSet::from([Scaffold::ID]));
        assert_eq!(scaffolds.len(), 1);

        scene.handle_input(&InputEvent::PointerMove { position: Vec2::new(110.0, 100.0) });
        scene.handle_input(&InputEvent::PointerUp { position: Vec2::new(113.0, 104.0) });

        assert!(!scene.world().is_alive(scaffolds[0]));
        let dots = dots(scene.world());
        assert_eq!(dots.len(), 2);
        let launched = scene.world().get::<Dot>(dots[1]).unwrap();
        assert_eq!(launched.diameter, 49.0);
        assert_eq!(launched.launch_length, 5.0);
        assert!(launched.direction.abs_diff_eq(Vec2::new(0.6, 0.8), 1e-6));
    }

    #[test]
    fn key_c_toggles_fading() {
        let mut scene = scene();
        assert!(scene.is_clearing());
        scene.handle_input(&InputEvent::Key { code: KeyCode::C });
        assert!(!scene.is_clearing());
        assert!(scene.schedule().is_enabled(scene.fade));

        scene.update(DEFAULT_STEP);
        let dot = dots(scene.world())[0];
        assert!(scene.world().get::<Circle>(dot).unwrap().color.a < 1.0);

        scene.handle_input(&InputEvent::Key { code: KeyCode::C });
        assert!(!scene.schedule().is_enabled(scene.fade));
    }

    #[test]
    fn dots_stay_inside_window() {
        let mut scene = scene();
        for _ in 0..120 {
            scene.update(DEFAULT_STEP);
        }
        let bounds = Settings::default().window.bounds();
        for item in scene.draw() {
            assert!(bounds.contains(item.position.truncate()));
        }
    }
}
