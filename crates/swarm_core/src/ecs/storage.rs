// storage.rs - Per-kind component storage
//
// One sparse column per component kind, indexed by entity slot. Columns do
// not know about generations; the World validates handles before touching
// them.

use crate::ecs::Component;
use std::any::Any;

/// Type-erased view used by the World for destroy and query passes.
pub(crate) trait ErasedStorage {
    fn name(&self) -> &'static str;
    fn contains(&self, index: u32) -> bool;
    /// Drop the component stored at `index`, if any.
    fn remove_slot(&mut self, index: u32) -> bool;
    fn len(&self) -> usize;
    /// Occupied slot indices in ascending order.
    fn indices(&self) -> Vec<u32>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse column holding every `T` in the world.
pub struct ComponentStorage<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T: Component> ComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Store `value` at `index`, returning the value it replaced.
    pub fn insert(&mut self, index: u32, value: T) -> Option<T> {
        let slot = index as usize;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        let previous = self.slots[slot].replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots.get_mut(index as usize).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, index: u32) -> Option<T> {
        let removed = self.slots.get_mut(index as usize).and_then(Option::take);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.as_ref().map(|v| (slot as u32, v)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn contains(&self, index: u32) -> bool {
        self.get(index).is_some()
    }

    fn remove_slot(&mut self, index: u32) -> bool {
        self.remove(index).is_some()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn indices(&self) -> Vec<u32> {
        self.iter().map(|(index, _)| index).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
