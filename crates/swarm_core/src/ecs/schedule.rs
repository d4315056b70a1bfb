// schedule.rs - Ordered per-frame system execution
//
// Systems run one at a time in registration order, each finishing before
// the next starts. Every run is wrapped in a tracing span and timed by the
// system profiler.

use crate::ecs::{ComponentId, SystemDescriptor, SystemHandle, World};
use std::collections::HashMap;
use swarm_metrics::SystemProfiler;
use thiserror::Error;

/// A unit of per-frame work over the world.
pub trait System {
    /// Name and component access of this system.
    fn descriptor(&self) -> SystemDescriptor;

    fn run(&mut self, world: &mut World, dt: f32);
}

/// Errors that can occur while registering a system with a schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("system '{name}' is already registered")]
    DuplicateName { name: &'static str },

    #[error("system '{name}' does not access any components")]
    EmptyAccess { name: &'static str },
}

/// Two systems touching the same component, at least one of them writing
/// it. `before` always runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemDependency {
    pub before: &'static str,
    pub after: &'static str,
    pub component: ComponentId,
}

struct FnSystem<F> {
    descriptor: SystemDescriptor,
    func: F,
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut World, f32),
{
    fn descriptor(&self) -> SystemDescriptor {
        self.descriptor.clone()
    }

    fn run(&mut self, world: &mut World, dt: f32) {
        (self.func)(world, dt);
    }
}

struct ScheduledSystem {
    handle: SystemHandle,
    descriptor: SystemDescriptor,
    enabled: bool,
    system: Box<dyn System>,
}

/// Ordered list of systems driven once per frame.
pub struct Schedule {
    systems: Vec<ScheduledSystem>,
    name_lookup: HashMap<&'static str, SystemHandle>,
    profiler: SystemProfiler,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            name_lookup: HashMap::new(),
            profiler: SystemProfiler::new(60),
        }
    }

    /// Append a system; it runs after every system registered before it.
    pub fn register<S>(&mut self, system: S) -> Result<SystemHandle, ScheduleError>
    where
        S: System + 'static,
    {
        let descriptor = system.descriptor();
        if descriptor.is_empty() {
            return Err(ScheduleError::EmptyAccess {
                name: descriptor.name(),
            });
        }
        if self.name_lookup.contains_key(descriptor.name()) {
            return Err(ScheduleError::DuplicateName {
                name: descriptor.name(),
            });
        }

        let handle = SystemHandle::new(self.systems.len() as u32);
        self.name_lookup.insert(descriptor.name(), handle);
        tracing::debug!(
            system = descriptor.name(),
            %handle,
            reads = ?descriptor.read_components(),
            writes = ?descriptor.write_components(),
            "system registered"
        );
        self.systems.push(ScheduledSystem {
            handle,
            descriptor,
            enabled: true,
            system: Box::new(system),
        });
        Ok(handle)
    }

    /// Register a closure as a system.
    pub fn add_fn<F>(
        &mut self,
        descriptor: SystemDescriptor,
        func: F,
    ) -> Result<SystemHandle, ScheduleError>
    where
        F: FnMut(&mut World, f32) + 'static,
    {
        self.register(FnSystem { descriptor, func })
    }

    /// Disabled systems are skipped by [`Schedule::run`]. Returns `false` for
    /// an unknown handle.
    pub fn set_enabled(&mut self, handle: SystemHandle, enabled: bool) -> bool {
        match self.systems.get_mut(handle.index() as usize) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, handle: SystemHandle) -> bool {
        self.systems
            .get(handle.index() as usize)
            .is_some_and(|entry| entry.enabled)
    }

    pub fn handle_of(&self, name: &str) -> Option<SystemHandle> {
        self.name_lookup.get(name).copied()
    }

    pub fn descriptor(&self, handle: SystemHandle) -> Option<&SystemDescriptor> {
        self.systems
            .get(handle.index() as usize)
            .map(|entry| &entry.descriptor)
    }

    /// Run every enabled system once, in order.
    pub fn run(&mut self, world: &mut World, dt: f32) {
        for entry in &mut self.systems {
            if !entry.enabled {
                continue;
            }
            let name = entry.descriptor.name();
            let _span = tracing::trace_span!("system", name).entered();
            let system = &mut entry.system;
            self.profiler.time_system(name, || system.run(world, dt));
        }
    }

    /// Every ordering constraint implied by the registered access sets, in
    /// run order. Disabled systems are included.
    pub fn dependencies(&self) -> Vec<SystemDependency> {
        let mut found = Vec::new();
        for (i, first) in self.systems.iter().enumerate() {
            let first = &first.descriptor;
            for second in self.systems[i + 1..].iter().map(|entry| &entry.descriptor) {
                let touched = second.all_components();
                for &component in first.all_components().ids() {
                    let conflicts = if first.write_components().contains(&component) {
                        touched.contains(component)
                    } else {
                        second.write_components().contains(&component)
                    };
                    if conflicts {
                        found.push(SystemDependency {
                            before: first.name(),
                            after: second.name(),
                            component,
                        });
                    }
                }
            }
        }
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = (SystemHandle, &SystemDescriptor)> {
        self.systems
            .iter()
            .map(|entry| (entry.handle, &entry.descriptor))
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn profiler(&self) -> &SystemProfiler {
        &self.profiler
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
