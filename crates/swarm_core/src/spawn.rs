// spawn.rs - Population-capped dot spawning with fission
//
// The spawner lives in the world as a resource so last wishes can reach it
// through the `&mut World` they are handed.

use crate::components::{Circle, Expires, Motion, Position};
use crate::define_component;
use crate::ecs::{Entity, World, WorldError};
use crate::math::{direction_and_length, rand_unit_vec2, rotate90, rotate_neg90};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Tunables for [`DotSpawner`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub max_dots: usize,
    /// Multiplier from launch velocity length to speed.
    pub speed_scale: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_lifetime: f32,
    pub max_lifetime: f32,
    /// Dots strictly larger than this split in two when they expire.
    pub fission_threshold: f32,
    pub fission_scale: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_dots: 1024,
            speed_scale: 40.0,
            min_speed: 1.0,
            max_speed: 600.0,
            min_lifetime: 4.0,
            max_lifetime: 6.0,
            fission_threshold: 8.0,
            fission_scale: 0.66,
        }
    }
}

/// Marker for entities created by [`DotSpawner::create_dot`].
///
/// A dot holds one population slot for as long as the component exists, so
/// the slot is returned however the dot goes away.
#[derive(Debug)]
pub struct Dot {
    pub diameter: f32,
    /// Unit launch direction, resolved once when the dot is created.
    pub direction: Vec2,
    /// Length of the requested launch velocity.
    pub launch_length: f32,
    slot: LiveSlot,
}

define_component!(Dot, 9, "Dot");

impl Dot {
    pub fn launch_velocity(&self) -> Vec2 {
        self.direction * self.launch_length
    }
}

/// One counted dot. Dropping it frees the slot.
#[derive(Debug)]
struct LiveSlot(Rc<Cell<usize>>);

impl LiveSlot {
    fn claim(live: &Rc<Cell<usize>>) -> Self {
        live.set(live.get() + 1);
        Self(Rc::clone(live))
    }
}

impl Drop for LiveSlot {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpawnStats {
    pub created: u64,
    pub rejected: u64,
    pub released: u64,
    pub fissions: u64,
}

/// Creates dots while keeping the live population under `max_dots`.
pub struct DotSpawner {
    config: SpawnConfig,
    live: Rc<Cell<usize>>,
    stats: SpawnStats,
    rng: StdRng,
}

impl DotSpawner {
    pub fn new(config: SpawnConfig, seed: u64) -> Self {
        Self {
            config,
            live: Rc::new(Cell::new(0)),
            stats: SpawnStats::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Dots currently counted against the cap.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub fn stats(&self) -> SpawnStats {
        SpawnStats {
            released: self.stats.created.saturating_sub(self.live() as u64),
            ..self.stats
        }
    }

    pub fn is_full(&self) -> bool {
        self.live() >= self.config.max_dots
    }

    /// Create a dot through the world's spawner resource.
    ///
    /// Returns `None` when the population cap is reached or no spawner has
    /// been inserted.
    pub fn create_dot(
        world: &mut World,
        position: Vec2,
        velocity: Vec2,
        diameter: f32,
    ) -> Option<Entity> {
        Self::spawn(world, position, direction_and_length(velocity), diameter)
    }

    /// Destroy a dot. Returns `false` for entities that are not live dots.
    pub fn destroy_dot(world: &mut World, entity: Entity) -> bool {
        world.has::<Dot>(entity) && world.destroy(entity)
    }

    /// `launch` is the resolved direction and length, or `None` to pick a
    /// random direction.
    fn spawn(
        world: &mut World,
        position: Vec2,
        launch: Option<(Vec2, f32)>,
        diameter: f32,
    ) -> Option<Entity> {
        let Some(spawner) = world.get_resource_mut::<DotSpawner>() else {
            tracing::warn!("create_dot called without a DotSpawner resource");
            return None;
        };
        if spawner.is_full() {
            spawner.stats.rejected += 1;
            tracing::debug!(
                live = spawner.live(),
                max = spawner.config.max_dots,
                "dot rejected, population full"
            );
            return None;
        }

        let (direction, length) =
            launch.unwrap_or_else(|| (rand_unit_vec2(&mut spawner.rng), 0.0));
        let speed = spawner.speed_for(length);
        let lifetime = spawner.roll_lifetime();
        let config = spawner.config;
        let dot = Dot {
            diameter,
            direction,
            launch_length: length,
            slot: LiveSlot::claim(&spawner.live),
        };
        spawner.stats.created += 1;

        let entity = world.create();
        if let Err(error) = Self::attach(world, entity, position, dot, speed, lifetime, config) {
            tracing::warn!(%entity, %error, "failed to build dot");
            world.destroy(entity);
            return None;
        }

        tracing::trace!(%entity, diameter, speed, lifetime, "dot created");
        Some(entity)
    }

    fn speed_for(&self, length: f32) -> f32 {
        (length * self.config.speed_scale).clamp(self.config.min_speed, self.config.max_speed)
    }

    fn roll_lifetime(&mut self) -> f32 {
        let (min, max) = (self.config.min_lifetime, self.config.max_lifetime);
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    fn attach(
        world: &mut World,
        entity: Entity,
        position: Vec2,
        dot: Dot,
        speed: f32,
        lifetime: f32,
        config: SpawnConfig,
    ) -> Result<(), WorldError> {
        world.assign(entity, Position(position))?;
        world.assign(entity, Circle::new(dot.diameter))?;
        world.assign(entity, Motion::new(dot.direction, speed))?;
        world.assign(entity, dot)?;
        world.assign(
            entity,
            Expires::new(lifetime).with_last_wish(move |world, entity| {
                // The parent's slot goes back before its children claim theirs.
                let Ok(Some(parent)) = world.remove::<Dot>(entity) else {
                    return;
                };
                let (diameter, direction, length) =
                    (parent.diameter, parent.direction, parent.launch_length);
                drop(parent);
                if diameter <= config.fission_threshold {
                    return;
                }
                let at = world.get::<Position>(entity).map_or(position, |p| p.0);
                let child = diameter * config.fission_scale;
                tracing::debug!(%entity, diameter, child, "dot splitting");
                Self::spawn(world, at, Some((rotate90(direction), length)), child);
                Self::spawn(world, at, Some((rotate_neg90(direction), length)), child);
                if let Some(spawner) = world.get_resource_mut::<DotSpawner>() {
                    spawner.stats.fissions += 1;
                }
            }),
        )?;
        Ok(())
    }
}
