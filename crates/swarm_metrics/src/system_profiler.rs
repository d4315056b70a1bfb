//! Rolling per-system timings

use super::ring_buffer::RingBuffer;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct SystemProfiler {
    window: usize,
    timings: HashMap<&'static str, RingBuffer<Duration>>,
}

impl SystemProfiler {
    /// `window` is the number of samples averaged per system.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            timings: HashMap::new(),
        }
    }

    pub fn time_system<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let window = self.window;
        self.timings
            .entry(name)
            .or_insert_with(|| RingBuffer::new(window))
            .push(elapsed);
        result
    }

    pub fn average(&self, name: &str) -> Duration {
        self.timings
            .get(name)
            .map(|buf| buf.average())
            .unwrap_or(Duration::ZERO)
    }

    pub fn last(&self, name: &str) -> Duration {
        self.timings
            .get(name)
            .and_then(|buf| buf.latest())
            .unwrap_or(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.timings.iter().map(|(name, buf)| (*name, buf.average()))
    }
}

impl Default for SystemProfiler {
    fn default() -> Self {
        Self::new(60)
    }
}
