// component.rs - Component identification
//
// Components are identified by u32 ids declared next to the type with
// `define_component!`. Queries and system descriptors work on sets of ids.

pub type ComponentId = u32;

/// A data bundle that can be attached to an entity.
///
/// At most one value of each component kind lives on an entity; assigning
/// again replaces the previous value.
pub trait Component: 'static + Sized {
    /// Unique id for this component kind.
    const ID: ComponentId;

    /// Human-readable name for logs and errors.
    const NAME: &'static str;
}

/// Implement [`Component`] for a type.
///
/// ```ignore
/// #[derive(Clone, Copy)]
/// struct Position(Vec2);
///
/// define_component!(Position, 1, "Position");
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty, $id:expr, $name:expr) => {
        impl $crate::ecs::Component for $ty {
            const ID: $crate::ecs::ComponentId = $id;
            const NAME: &'static str = $name;
        }
    };
}

/// Sorted, deduplicated set of component ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComponentSet {
    ids: Vec<ComponentId>,
}

impl ComponentSet {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ComponentId>,
    {
        let mut ids: Vec<ComponentId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    pub fn with(mut self, id: ComponentId) -> Self {
        if let Err(pos) = self.ids.binary_search(&id) {
            self.ids.insert(pos, id);
        }
        self
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Union of two sets.
    pub fn union(&self, other: &ComponentSet) -> ComponentSet {
        ComponentSet::new(self.ids.iter().chain(other.ids.iter()).copied())
    }
}

impl<const N: usize> From<[ComponentId; N]> for ComponentSet {
    fn from(ids: [ComponentId; N]) -> Self {
        Self::new(ids)
    }
}

impl FromIterator<ComponentId> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_sorted_and_unique() {
        let set = ComponentSet::new([5, 1, 5, 3]);
        assert_eq!(set.ids(), &[1, 3, 5]);
        assert!(set.contains(3));
        assert!(!set.contains(2));
    }

    #[test]
    fn with_and_union_keep_order() {
        let set = ComponentSet::from([4, 2]).with(3).with(2);
        assert_eq!(set.ids(), &[2, 3, 4]);
        let other = ComponentSet::from([1, 4]);
        assert_eq!(set.union(&other).ids(), &[1, 2, 3, 4]);
    }
}
