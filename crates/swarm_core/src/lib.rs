//! Swarm Core
//!
//! Entity lifecycle and behavior orchestration for small particle-style
//! simulations:
//! - Entity Component System with generational handles and session resources
//! - Expiry with last wishes, polymorphic behaviors, verlet physics
//! - Population-capped spawning with fission
//! - Frame time policy and draw extraction

pub mod components;
pub mod ecs;
pub mod input;
pub mod math;
pub mod render;
pub mod spawn;
pub mod systems;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
