//! Input events handed to the core by the frame driver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    C,
    Space,
    Escape,
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { position: Vec2 },
    PointerMove { position: Vec2 },
    PointerUp { position: Vec2 },
    Key { code: KeyCode },
}

impl InputEvent {
    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            Self::PointerDown { position }
            | Self::PointerMove { position }
            | Self::PointerUp { position } => Some(position),
            Self::Key { .. } => None,
        }
    }
}
