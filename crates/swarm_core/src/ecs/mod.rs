//! Entity Component System core types.
//!
//! Entities are generational handles into a [`World`], components are plain
//! Rust types registered with [`define_component!`](crate::define_component)
//! and stored sparsely per kind, and systems are ordered by a [`Schedule`].

mod component;
mod entity;
mod error;
mod schedule;
mod storage;
mod system_descriptor;
mod system_handle;
mod world;

pub use component::{Component, ComponentId, ComponentSet};
pub use entity::Entity;
pub(crate) use entity::EntityAllocator;
pub use error::WorldError;
pub use schedule::{Schedule, ScheduleError, System, SystemDependency};
pub use storage::ComponentStorage;
pub use system_descriptor::SystemDescriptor;
pub use system_handle::SystemHandle;
pub use world::World;
