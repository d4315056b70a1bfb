// components.rs - Component kinds shared by the systems and sample scenes

use crate::define_component;
use crate::ecs::{Entity, World};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position in window coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

define_component!(Position, 1, "Position");

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(value: f32) -> Self {
        Self::rgba(value, value, value, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Filled circle shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub diameter: f32,
    pub color: Color,
}

impl Circle {
    pub fn new(diameter: f32) -> Self {
        Self {
            diameter,
            color: Color::WHITE,
        }
    }

    pub fn with_color(diameter: f32, color: Color) -> Self {
        Self { diameter, color }
    }

    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }
}

define_component!(Circle, 2, "Circle");

/// Straight-line motion. `speed` is in units per second; `launch_speed` keeps
/// the speed the entity started with so age-based slowdown has a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub direction: Vec2,
    pub speed: f32,
    pub launch_speed: f32,
}

impl Motion {
    pub fn new(direction: Vec2, speed: f32) -> Self {
        Self {
            direction,
            speed,
            launch_speed: speed,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }
}

define_component!(Motion, 3, "Motion");

/// Callback run once, just before an expiring entity is destroyed.
pub type LastWish = Box<dyn FnOnce(&mut World, Entity)>;

/// Time budget after which the entity is destroyed.
pub struct Expires {
    pub remaining: f32,
    pub lifetime: f32,
    pub last_wish: Option<LastWish>,
}

impl Expires {
    pub fn new(lifetime: f32) -> Self {
        Self {
            remaining: lifetime,
            lifetime,
            last_wish: None,
        }
    }

    pub fn with_last_wish<F>(mut self, last_wish: F) -> Self
    where
        F: FnOnce(&mut World, Entity) + 'static,
    {
        self.last_wish = Some(Box::new(last_wish));
        self
    }

    /// 0 at creation, 1 at expiry.
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.lifetime).clamp(0.0, 1.0)
    }

    /// 1 at creation, 0 at expiry.
    pub fn remaining_fraction(&self) -> f32 {
        1.0 - self.progress()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

impl fmt::Debug for Expires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expires")
            .field("remaining", &self.remaining)
            .field("lifetime", &self.lifetime)
            .field("last_wish", &self.last_wish.is_some())
            .finish()
    }
}

define_component!(Expires, 4, "Expires");

// Id 5 is `Behaviors`, declared next to the behavior system.

/// Verlet-integrated body in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerletBody {
    pub position: Vec3,
    pub previous: Vec3,
    pub acceleration: Vec3,
    pub impulse: Vec3,
    /// Fraction of velocity lost per step, in `[0, 1]`.
    pub drag: f32,
}

impl VerletBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            previous: position,
            acceleration: Vec3::ZERO,
            impulse: Vec3::ZERO,
            drag: 0.0,
        }
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag.clamp(0.0, 1.0);
        self
    }

    /// Queue an instantaneous velocity change (units per second) for the next step.
    pub fn nudge(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    pub fn accelerate(&mut self, acceleration: Vec3) {
        self.acceleration += acceleration;
    }

    /// Displacement covered during the last step.
    pub fn velocity(&self) -> Vec3 {
        self.position - self.previous
    }
}

define_component!(VerletBody, 6, "VerletBody");

/// Pulls attraction subjects toward this body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsAttractor {
    pub distance_falloff: f32,
    pub strength: f32,
}

impl Default for PhysicsAttractor {
    fn default() -> Self {
        Self {
            distance_falloff: 160.0,
            strength: 1.0,
        }
    }
}

define_component!(PhysicsAttractor, 7, "PhysicsAttractor");

/// Marks a body as affected by attractors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsAttraction {
    pub strength: f32,
}

impl Default for PhysicsAttraction {
    fn default() -> Self {
        Self { strength: 1.0 }
    }
}

define_component!(PhysicsAttraction, 8, "PhysicsAttraction");
