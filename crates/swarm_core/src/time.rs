//! Frame time policy
//!
//! The frame driver hands in the measured wall-clock delta; [`FrameClock`]
//! turns it into the simulation step according to a [`DeltaPolicy`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Nominal step used by the fixed policy and as the clamped fallback (60 Hz).
pub const DEFAULT_STEP: f32 = 1.0 / 60.0;

/// How a measured frame delta becomes a simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeltaPolicy {
    /// Ignore the measured delta and always step by `step`.
    Fixed { step: f32 },
    /// Use the measured delta unless it falls outside `[min, max]`, in which
    /// case `fallback` is used instead.
    Clamped { min: f32, max: f32, fallback: f32 },
}

impl DeltaPolicy {
    pub const fn clamped() -> Self {
        Self::Clamped {
            min: 1.0 / 120.0,
            max: 1.0 / 10.0,
            fallback: DEFAULT_STEP,
        }
    }

    /// Resolve one measured delta (seconds) into a simulation step.
    pub fn resolve(&self, measured: f32) -> f32 {
        match *self {
            Self::Fixed { step } => step,
            Self::Clamped { min, max, fallback } => {
                if measured.is_finite() && (min..=max).contains(&measured) {
                    measured
                } else {
                    fallback
                }
            }
        }
    }
}

impl Default for DeltaPolicy {
    fn default() -> Self {
        Self::Fixed { step: DEFAULT_STEP }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub policy: DeltaPolicy,
}

/// Simulation time tracker
pub struct FrameClock {
    policy: DeltaPolicy,
    tick_count: u64,
    elapsed: Duration,
}

impl FrameClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            policy: config.policy,
            tick_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn fixed(step: f32) -> Self {
        Self::new(ClockConfig {
            policy: DeltaPolicy::Fixed { step },
        })
    }

    pub fn clamped() -> Self {
        Self::new(ClockConfig {
            policy: DeltaPolicy::clamped(),
        })
    }

    /// Advance one frame and return the step to simulate.
    pub fn tick(&mut self, measured: f32) -> f32 {
        let dt = self.policy.resolve(measured);
        if matches!(self.policy, DeltaPolicy::Clamped { .. }) && dt != measured {
            tracing::debug!(measured, dt, "frame delta out of range, using fallback step");
        }
        self.tick_count += 1;
        let step = Duration::try_from_secs_f32(dt.max(0.0)).unwrap_or(Duration::MAX);
        self.elapsed = self.elapsed.saturating_add(step);
        dt
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn total_time(&self) -> Duration {
        self.elapsed
    }

    pub fn policy(&self) -> DeltaPolicy {
        self.policy
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}
