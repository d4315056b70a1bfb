//! Stock behaviors: pointer following and drag tracking.

use crate::components::{Position, VerletBody};
use crate::ecs::{Entity, World};
use crate::input::InputEvent;
use crate::systems::behavior::Behavior;
use glam::{Vec2, Vec3};

/// Continuously pulls the entity's [`VerletBody`] toward the last pointer
/// position it was told about. Never completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseFollow {
    pub strength: f32,
    target: Option<Vec2>,
}

impl MouseFollow {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            target: None,
        }
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = Some(target);
    }
}

impl Behavior for MouseFollow {
    fn update(&mut self, world: &mut World, entity: Entity, _dt: f32) {
        let Some(target) = self.target else {
            return;
        };
        if let Some(body) = world.get_mut::<VerletBody>(entity) {
            let delta = Vec3::new(target.x, target.y, body.position.z) - body.position;
            body.nudge(delta * self.strength);
        }
    }

    fn handle_event(&mut self, _world: &mut World, _entity: Entity, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { position } | InputEvent::PointerMove { position } => {
                self.target = Some(position);
            }
            _ => {}
        }
    }
}

/// Where a drag started and ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    /// Pointer position at release.
    pub position: Vec2,
    /// Pointer position reported just before the release.
    pub previous: Vec2,
    /// Pointer position when the drag began.
    pub start: Vec2,
}

impl DragRelease {
    pub fn displacement(&self) -> Vec2 {
        self.position - self.start
    }

    /// Movement over the final pointer step.
    pub fn flick(&self) -> Vec2 {
        self.position - self.previous
    }
}

pub type ReleaseCallback = Box<dyn FnOnce(&mut World, Entity, DragRelease)>;

/// Moves the entity with the pointer until release, then reports the drag
/// once and completes.
pub struct DragTracker {
    start: Vec2,
    previous: Vec2,
    current: Vec2,
    on_release: Option<ReleaseCallback>,
    complete: bool,
}

impl DragTracker {
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            previous: start,
            current: start,
            on_release: None,
            complete: false,
        }
    }

    pub fn set_release_callback<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut World, Entity, DragRelease) + 'static,
    {
        self.on_release = Some(Box::new(callback));
        self
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn position(&self) -> Vec2 {
        self.current
    }

    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    fn move_to(&mut self, world: &mut World, entity: Entity, position: Vec2) {
        self.previous = self.current;
        self.current = position;
        if let Some(pos) = world.get_mut::<Position>(entity) {
            pos.0 = position;
        }
    }
}

impl Behavior for DragTracker {
    fn update(&mut self, _world: &mut World, _entity: Entity, _dt: f32) {}

    fn handle_event(&mut self, world: &mut World, entity: Entity, event: &InputEvent) {
        if self.complete {
            return;
        }
        match *event {
            InputEvent::PointerMove { position } => self.move_to(world, entity, position),
            InputEvent::PointerUp { position } => {
                self.move_to(world, entity, position);
                self.complete = true;
                let release = DragRelease {
                    position: self.current,
                    previous: self.previous,
                    start: self.start,
                };
                tracing::trace!(%entity, ?release, "drag released");
                if let Some(callback) = self.on_release.take() {
                    callback(world, entity, release);
                }
            }
            _ => {}
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}
