//! Input abstraction and recording for replays
//!
//! An [`InputScript`] is a frame-indexed list of input events. The runtime
//! feeds it to the scene during headless runs so interactive sessions can be
//! reproduced exactly.

use crate::settings::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use swarm_core::input::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Frame on which the event is delivered, counted from 0.
    pub frame: u64,
    pub event: InputEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    events: Vec<ScriptedInput>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::parse(&text).map_err(|source| SettingsError::parse(path, source))?;
        tracing::debug!(path = %path.display(), events = script.len(), "input script loaded");
        Ok(script)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Self::parse(text).map_err(|source| SettingsError::parse("<inline>", source))
    }

    fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let mut script: InputScript = serde_json::from_str(text)?;
        // Stable, so events on the same frame keep their recorded order.
        script.events.sort_by_key(|input| input.frame);
        Ok(script)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Append an event, keeping frame order.
    pub fn record(&mut self, frame: u64, event: InputEvent) {
        let at = self.events.partition_point(|input| input.frame <= frame);
        self.events.insert(at, ScriptedInput { frame, event });
    }

    /// Events delivered on `frame`, in recorded order.
    pub fn events_for(&self, frame: u64) -> impl Iterator<Item = &InputEvent> {
        let start = self.events.partition_point(|input| input.frame < frame);
        let end = self.events.partition_point(|input| input.frame <= frame);
        self.events[start..end].iter().map(|input| &input.event)
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.events.last().map(|input| input.frame)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::glam::Vec2;
    use swarm_core::input::KeyCode;

    const SCRIPT: &str = r#"[
        { "frame": 10, "event": { "type": "pointer_up", "position": [50.0, 60.0] } },
        { "frame": 2, "event": { "type": "pointer_down", "position": [10.0, 20.0] } },
        { "frame": 10, "event": { "type": "key", "code": "C" } }
    ]"#;

    #[test]
    fn events_are_grouped_by_frame() {
        let script = InputScript::from_json(SCRIPT).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.last_frame(), Some(10));

        let frame2: Vec<_> = script.events_for(2).copied().collect();
        assert_eq!(frame2, vec![InputEvent::PointerDown { position: Vec2::new(10.0, 20.0) }]);

        let frame10: Vec<_> = script.events_for(10).copied().collect();
        assert_eq!(
            frame10,
            vec![
                InputEvent::PointerUp { position: Vec2::new(50.0, 60.0) },
                InputEvent::Key { code: KeyCode::C },
            ]
        );
        assert_eq!(script.events_for(3).count(), 0);
    }

    #[test]
    fn recorded_script_replays_identically() {
        let mut script = InputScript::new();
        script.record(5, InputEvent::Key { code: KeyCode::C });
        script.record(1, InputEvent::PointerMove { position: Vec2::ONE });
        script.record(5, InputEvent::PointerUp { position: Vec2::ZERO });

        let text = script.to_json().unwrap();
        let replayed = InputScript::from_json(&text).unwrap();
        assert_eq!(replayed, script);
        assert_eq!(replayed.events_for(5).count(), 2);
    }

    #[test]
    fn bad_event_tag_fails_to_parse() {
        let json = r#"[{ "frame": 0, "event": { "type": "scroll" } }]"#;
        let err = InputScript::from_json(json).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
