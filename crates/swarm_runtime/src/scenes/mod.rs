//! Sample scenes hosted by the runtime.

mod entity_creation;
mod gravity_wells;

pub use entity_creation::EntityCreation;
pub use gravity_wells::GravityWells;

use anyhow::Result;
use swarm_core::ecs::{Schedule, World};
use swarm_core::input::InputEvent;
use swarm_core::render::DrawItem;
use swarm_core::time::ClockConfig;
use swarm_services::{SceneKind, Settings};

/// A world plus the systems and input handling that drive it.
pub trait Scene {
    fn name(&self) -> &'static str;

    fn world(&self) -> &World;

    fn schedule(&self) -> &Schedule;

    /// Frame time policy used unless the settings override it.
    fn default_clock(&self) -> ClockConfig;

    fn handle_input(&mut self, event: &InputEvent);

    fn update(&mut self, dt: f32);

    /// What the renderer would draw this frame.
    fn draw(&self) -> Vec<DrawItem>;
}

pub fn build(settings: &Settings) -> Result<Box<dyn Scene>> {
    let scene: Box<dyn Scene> = match settings.scene {
        SceneKind::EntityCreation => Box::new(EntityCreation::new(settings)?),
        SceneKind::GravityWells => Box::new(GravityWells::new(settings)?),
    };
    tracing::info!(scene = scene.name(), entities = scene.world().entity_count(), "scene ready");
    Ok(scene)
}
