use crate::ecs::{ComponentId, ComponentSet};

/// Metadata describing how a system interacts with the ECS world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemDescriptor {
    name: &'static str,
    reads: ComponentSet,
    writes: ComponentSet,
}

impl SystemDescriptor {
    /// Create a new descriptor with the provided name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            reads: ComponentSet::default(),
            writes: ComponentSet::default(),
        }
    }

    /// Replace the read-only component set for this system.
    pub fn reads<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentId>,
    {
        self.reads = ComponentSet::new(components);
        self
    }

    /// Replace the write component set for this system.
    pub fn writes<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentId>,
    {
        self.writes = ComponentSet::new(components);
        self
    }

    /// Unique system name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn read_components(&self) -> &[ComponentId] {
        self.reads.ids()
    }

    pub fn write_components(&self) -> &[ComponentId] {
        self.writes.ids()
    }

    /// Union of read and write component ids.
    pub fn all_components(&self) -> ComponentSet {
        self.reads.union(&self.writes)
    }

    /// Whether the descriptor touches any components at all.
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.writes.is_empty()
    }
}
