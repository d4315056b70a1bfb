//! Swarm Services Layer
//!
//! File-backed collaborators of the frame driver: settings and recorded
//! input scripts for deterministic replays.

pub mod input;
pub mod settings;

pub use input::{InputScript, ScriptedInput};
pub use settings::{SceneKind, Settings, SettingsError, WindowSettings};
