//! Settings management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use swarm_core::glam::Vec2;
use swarm_core::math::WorldBounds;
use swarm_core::spawn::SpawnConfig;
use swarm_core::time::ClockConfig;
use thiserror::Error;

/// Errors raised while loading settings or input scripts from disk.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SettingsError {
    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

/// Which sample scene the runtime hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    #[default]
    EntityCreation,
    GravityWells,
}

impl SceneKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::EntityCreation => "entity-creation",
            Self::GravityWells => "gravity-wells",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entity-creation" => Ok(Self::EntityCreation),
            "gravity-wells" => Ok(Self::GravityWells),
            other => Err(format!(
                "unknown scene '{other}', expected 'entity-creation' or 'gravity-wells'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl WindowSettings {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 660.0,
            height: 500.0,
        }
    }
}

/// Runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scene: SceneKind,
    /// Frames to simulate before exiting.
    pub frames: u64,
    pub seed: u64,
    pub window: WindowSettings,
    pub spawn: SpawnConfig,
    /// Overrides the scene's own frame time policy when set.
    pub clock: Option<ClockConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            frames: 600,
            seed: 0,
            window: WindowSettings::default(),
            spawn: SpawnConfig::default(),
            clock: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| SettingsError::parse(path, source))?;
        tracing::debug!(path = %path.display(), scene = %settings.scene, "settings loaded");
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(text).map_err(|source| SettingsError::parse("<inline>", source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::time::DeltaPolicy;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings.scene, SceneKind::EntityCreation);
        assert_eq!(settings.frames, 600);
        assert_eq!(settings.spawn, SpawnConfig::default());
        assert!(settings.clock.is_none());
        assert_eq!(settings.window.center(), Vec2::new(330.0, 250.0));
    }

    #[test]
    fn nested_sections_merge_with_defaults() {
        let settings = Settings::from_json(
            r#"{
                "scene": "gravity-wells",
                "seed": 9,
                "spawn": { "max_dots": 64 },
                "clock": { "policy": { "mode": "fixed", "step": 0.5 } }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.scene, SceneKind::GravityWells);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.spawn.max_dots, 64);
        assert_eq!(settings.spawn.speed_scale, 40.0);
        assert_eq!(
            settings.clock.map(|c| c.policy),
            Some(DeltaPolicy::Fixed { step: 0.5 })
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Settings::from_json("{ scene: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn scene_names_parse() {
        assert_eq!("gravity-wells".parse::<SceneKind>(), Ok(SceneKind::GravityWells));
        assert!("asteroids".parse::<SceneKind>().is_err());
        assert_eq!(SceneKind::EntityCreation.to_string(), "entity-creation");
    }
}
