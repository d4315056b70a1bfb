//! Per-frame systems.
//!
//! Each system is usable as a plain function over the [`World`](crate::ecs::World)
//! and as a [`System`](crate::ecs::System) that can be registered with a
//! [`Schedule`](crate::ecs::Schedule).

pub mod behavior;
pub mod behaviors;
pub mod expires;
pub mod motion;
pub mod physics;

pub use behavior::{
    assign_behavior, behavior, behavior_mut, AsAny, Behavior, BehaviorSystem, Behaviors,
};
pub use behaviors::{DragRelease, DragTracker, MouseFollow};
pub use expires::ExpiresSystem;
pub use motion::{
    apply_motion, border_wrap, fade_with_age, slow_down_with_age, ApplyMotion, BorderWrap,
    FadeWithAge, SlowDownWithAge,
};
pub use physics::{
    apply_physics_attraction, attraction_force, attraction_weight, AttractionSystem,
    VerletPhysicsSystem, ATTRACTION_SCALE,
};
