//! Swarm Runtime
//!
//! Headless frame driver for the sample scenes. Input comes from a recorded
//! script; draw lists are built each frame but not rasterized.

mod scenes;

use anyhow::{Context, Result};
use clap::Parser;
use scenes::Scene;
use std::path::PathBuf;
use std::time::Instant;
use swarm_core::spawn::DotSpawner;
use swarm_core::time::FrameClock;
use swarm_metrics::{Counter, FrameTimer};
use swarm_services::{InputScript, SceneKind, Settings};
use tracing_subscriber::EnvFilter;

/// Frames between progress reports.
const REPORT_INTERVAL: u64 = 60;

#[derive(Parser, Debug)]
#[command(name = "swarm", version, about = "Run a swarm sample scene headless")]
struct Args {
    /// Scene to run: entity-creation or gravity-wells
    #[arg(long)]
    scene: Option<SceneKind>,

    /// Number of frames to simulate
    #[arg(long)]
    frames: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON input script to replay
    #[arg(long)]
    input: Option<PathBuf>,

    /// Seed for the scene's random number generators
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn resolve_settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(scene) = self.scene {
            settings.scene = scene;
        }
        if let Some(frames) = self.frames {
            settings.frames = frames;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        Ok(settings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunSummary {
    frames: u64,
    entities: usize,
    drawn: usize,
    input_events: u64,
}

fn run(
    scene: &mut dyn Scene,
    clock: &mut FrameClock,
    script: &InputScript,
    frames: u64,
) -> RunSummary {
    let mut timer = FrameTimer::new(60);
    let mut counter = Counter::new();
    let mut last = Instant::now();
    let mut drawn = 0;

    for frame in 0..frames {
        timer.begin();
        for event in script.events_for(frame) {
            scene.handle_input(event);
            counter.increment("input_events", 1);
        }

        let measured = last.elapsed().as_secs_f32();
        last = Instant::now();
        let dt = clock.tick(measured);
        scene.update(dt);
        drawn = scene.draw().len();
        timer.end();

        if frame % REPORT_INTERVAL == 0 {
            tracing::debug!(
                frame,
                entities = scene.world().entity_count(),
                drawn,
                frame_ms = timer.frame_time_ms(),
                "frame"
            );
        }
    }

    RunSummary {
        frames,
        entities: scene.world().entity_count(),
        drawn,
        input_events: counter.get("input_events"),
    }
}

fn report(scene: &dyn Scene, summary: &RunSummary, clock: &FrameClock) {
    tracing::info!(
        scene = scene.name(),
        frames = summary.frames,
        simulated_secs = clock.total_time().as_secs_f32(),
        entities = summary.entities,
        drawn = summary.drawn,
        input_events = summary.input_events,
        "run finished"
    );
    if let Some(spawner) = scene.world().get_resource::<DotSpawner>() {
        let stats = spawner.stats();
        tracing::info!(
            live = spawner.live(),
            created = stats.created,
            rejected = stats.rejected,
            fissions = stats.fissions,
            "dot population"
        );
    }
    let schedule = scene.schedule();
    let profiler = schedule.profiler();
    for (_, descriptor) in schedule.iter() {
        tracing::info!(
            system = descriptor.name(),
            avg_us = profiler.average(descriptor.name()).as_secs_f64() * 1e6,
            components = descriptor.all_components().len(),
            "system timing"
        );
    }
    for dependency in schedule.dependencies() {
        tracing::debug!(
            before = dependency.before,
            after = dependency.after,
            component = dependency.component,
            "system ordering"
        );
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Swarm v{}", swarm_core::VERSION);

    let args = Args::parse();
    let settings = args.resolve_settings()?;
    let script = match &args.input {
        Some(path) => InputScript::load(path)
            .with_context(|| format!("loading input script from {}", path.display()))?,
        None => InputScript::new(),
    };

    let mut scene = scenes::build(&settings).context("building scene")?;
    let mut clock = FrameClock::new(settings.clock.unwrap_or_else(|| scene.default_clock()));
    tracing::info!(
        scene = %settings.scene,
        frames = settings.frames,
        seed = settings.seed,
        policy = ?clock.policy(),
        "starting run"
    );

    let summary = run(scene.as_mut(), &mut clock, &script, settings.frames);
    report(scene.as_ref(), &summary, &clock);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::glam::Vec2;
    use swarm_core::input::{InputEvent, KeyCode};

    #[test]
    fn cli_overrides_defaults() {
        let args = Args::parse_from([
            "swarm", "--scene", "gravity-wells", "--frames", "12", "--seed", "3",
        ]);
        let settings = args.resolve_settings().unwrap();
        assert_eq!(settings.scene, SceneKind::GravityWells);
        assert_eq!(settings.frames, 12);
        assert_eq!(settings.seed, 3);
    }

    #[test]
    fn unknown_scene_is_rejected() {
        assert!(Args::try_parse_from(["swarm", "--scene", "pong"]).is_err());
    }

    #[test]
    fn missing_settings_file_is_reported() {
        let args = Args::parse_from(["swarm", "--settings", "/no/such/settings.json"]);
        let err = args.resolve_settings().unwrap_err();
        assert!(format!("{err:#}").contains("loading settings"));
    }

    #[test]
    fn scripted_drag_launches_dot() {
        let settings = Settings::default();
        let mut scene = scenes::build(&settings).unwrap();
        let mut clock = FrameClock::new(scene.default_clock());

        let mut script = InputScript::new();
        script.record(1, InputEvent::PointerDown { position: Vec2::new(100.0, 100.0) });
        script.record(2, InputEvent::PointerMove { position: Vec2::new(104.0, 103.0) });
        script.record(3, InputEvent::PointerUp { position: Vec2::new(108.0, 106.0) });
        script.record(4, InputEvent::Key { code: KeyCode::C });

        let summary = run(scene.as_mut(), &mut clock, &script, 10);
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.input_events, 4);
        // initial dot plus the launched one; the scaffold is gone
        assert_eq!(summary.entities, 2);
        assert_eq!(summary.drawn, 2);
        assert_eq!(clock.tick_count(), 10);
    }
}
