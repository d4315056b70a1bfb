use crate::ecs::{ComponentId, Entity};
use thiserror::Error;

/// Failures reported by [`World`](crate::ecs::World) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("entity {entity} is not alive")]
    InvalidEntity { entity: Entity },

    #[error("component id {id} is already used by '{existing}', cannot store '{requested}'")]
    ComponentIdConflict {
        id: ComponentId,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("resource '{name}' has not been inserted")]
    MissingResource { name: &'static str },
}
