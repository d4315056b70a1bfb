// world.rs - Entity registry, component storage and session resources

use crate::ecs::storage::{ComponentStorage, ErasedStorage};
use crate::ecs::{Component, ComponentId, ComponentSet, Entity, EntityAllocator, WorldError};
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};

/// The registry owning every entity, its components, and session resources.
///
/// All mutation is synchronous. Systems iterate over the snapshot returned by
/// [`World::query`], so entities created or destroyed while a pass runs only
/// affect later passes.
pub struct World {
    allocator: EntityAllocator,
    storages: BTreeMap<ComponentId, Box<dyn ErasedStorage>>,
    resources: HashMap<TypeId, Box<dyn Any>>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            storages: BTreeMap::new(),
            resources: HashMap::new(),
        }
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Allocate a fresh entity with no components.
    pub fn create(&mut self) -> Entity {
        let entity = self.allocator.alloc();
        tracing::trace!(%entity, "entity created");
        entity
    }

    /// Destroy an entity and drop all of its components.
    ///
    /// Returns `false` without touching anything when the handle is stale,
    /// so destroying twice is harmless.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.allocator.free(entity) {
            return false;
        }
        for storage in self.storages.values_mut() {
            storage.remove_slot(entity.index());
        }
        tracing::trace!(%entity, "entity destroyed");
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.allocator.live()
    }

    /// Every live entity in ascending slot order.
    pub fn entities(&self) -> Vec<Entity> {
        self.allocator.iter_alive().collect()
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach `component` to `entity`, replacing any value of the same kind.
    pub fn assign<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<&mut T, WorldError> {
        self.ensure_alive(entity)?;
        let storage = self.storage_or_insert::<T>()?;
        storage.insert(entity.index(), component);
        storage
            .get_mut(entity.index())
            .ok_or(WorldError::InvalidEntity { entity })
    }

    /// Detach and return the `T` on `entity`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, WorldError> {
        self.ensure_alive(entity)?;
        Ok(self
            .storage_mut::<T>()
            .and_then(|storage| storage.remove(entity.index())))
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.storage::<T>()?.get(entity.index())
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.storage_mut::<T>()?.get_mut(entity.index())
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Live entities possessing ALL component kinds in `set`, in ascending
    /// slot order. An empty set matches every live entity.
    pub fn query(&self, set: &ComponentSet) -> Vec<Entity> {
        let Some((&first, rest)) = set.ids().split_first() else {
            return self.entities();
        };

        let mut columns = Vec::with_capacity(rest.len());
        for id in rest {
            match self.storages.get(id) {
                Some(storage) => columns.push(storage),
                None => return Vec::new(),
            }
        }
        let Some(driver) = self.storages.get(&first) else {
            return Vec::new();
        };

        driver
            .indices()
            .into_iter()
            .filter(|&index| columns.iter().all(|column| column.contains(index)))
            .filter_map(|index| self.allocator.entity_at(index))
            .collect()
    }

    /// Number of live `T` components.
    pub fn component_count<T: Component>(&self) -> usize {
        self.storages.get(&T::ID).map_or(0, |storage| storage.len())
    }

    /// Names of the component kinds attached to `entity`.
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        if !self.is_alive(entity) {
            return Vec::new();
        }
        self.storages
            .values()
            .filter(|storage| storage.contains(entity.index()))
            .map(|storage| storage.name())
            .collect()
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), WorldError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(WorldError::InvalidEntity { entity })
        }
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&T::ID)?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&T::ID)?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    fn storage_or_insert<T: Component>(&mut self) -> Result<&mut ComponentStorage<T>, WorldError> {
        let storage = self
            .storages
            .entry(T::ID)
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()));
        let existing = storage.name();
        storage
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .ok_or(WorldError::ComponentIdConflict {
                id: T::ID,
                existing,
                requested: T::NAME,
            })
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Insert a session-wide singleton, returning the one it replaced.
    pub fn insert_resource<R: 'static>(&mut self, value: R) -> Option<R> {
        self.resources
            .insert(TypeId::of::<R>(), Box::new(value))
            .and_then(|old| old.downcast::<R>().ok())
            .map(|old| *old)
    }

    pub fn get_resource<R: 'static>(&self) -> Option<&R> {
        self.resources
            .get(&TypeId::of::<R>())
            .and_then(|r| r.downcast_ref::<R>())
    }

    pub fn get_resource_mut<R: 'static>(&mut self) -> Option<&mut R> {
        self.resources
            .get_mut(&TypeId::of::<R>())
            .and_then(|r| r.downcast_mut::<R>())
    }

    /// Like [`World::get_resource`] but reports which resource is missing.
    pub fn resource<R: 'static>(&self) -> Result<&R, WorldError> {
        self.get_resource::<R>().ok_or(WorldError::MissingResource {
            name: type_name::<R>(),
        })
    }

    pub fn resource_mut<R: 'static>(&mut self) -> Result<&mut R, WorldError> {
        self.get_resource_mut::<R>().ok_or(WorldError::MissingResource {
            name: type_name::<R>(),
        })
    }

    pub fn has_resource<R: 'static>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<R>())
    }

    pub fn remove_resource<R: 'static>(&mut self) -> Option<R> {
        self.resources
            .remove(&TypeId::of::<R>())
            .and_then(|r| r.downcast::<R>().ok())
            .map(|r| *r)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
