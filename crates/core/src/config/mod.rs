//! Driver settings and the JSON application configuration.
//!
//! Numeric settings are optional; missing or unusable values resolve to
//! the defaults below when read through the accessor methods.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{curve::Shape, Result};

pub const DEFAULT_INTERVAL_MS: f64 = 10.0;
pub const DEFAULT_DURATION_MS: f64 = 1000.0;
pub const DEFAULT_FRAMES: f64 = 100.0;
pub const DEFAULT_REFRESH_RATE: f64 = 60.0;

/// Missing, zero, negative and non-finite values all select the default.
fn or_default(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(default)
}

fn millis(ms: f64) -> Duration {
    Duration::from_nanos((ms * 1_000_000.0).round() as u64)
}

/// Settings for the interval driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalSettings {
    /// Tick period in milliseconds.
    pub ms: Option<f64>,
    /// Total animation span in milliseconds.
    pub duration: Option<f64>,
    pub easing: Shape,
}

impl IntervalSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ms(mut self, ms: f64) -> Self {
        self.ms = Some(ms);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_easing(mut self, easing: Shape) -> Self {
        self.easing = easing;
        self
    }

    pub fn ms(&self) -> f64 {
        or_default(self.ms, DEFAULT_INTERVAL_MS)
    }

    pub fn duration(&self) -> f64 {
        or_default(self.duration, DEFAULT_DURATION_MS)
    }

    pub fn period(&self) -> Duration {
        millis(self.ms())
    }

    /// One curve step per tick period.
    pub fn steps(&self) -> f64 {
        self.duration() / self.ms()
    }
}

/// Settings for the frame driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    pub frames: Option<f64>,
    pub ease: Shape,
}

impl FrameSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frames(mut self, frames: f64) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn with_ease(mut self, ease: Shape) -> Self {
        self.ease = ease;
        self
    }

    pub fn frames(&self) -> f64 {
        or_default(self.frames, DEFAULT_FRAMES)
    }
}

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub interval: IntervalSettings,
    pub frame: FrameSettings,
    /// Display refresh rate in Hz used to pace frame callbacks.
    pub refresh_rate: Option<f64>,
}

impl AppConfig {
    /// Reads a JSON configuration document. Absent fields keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn refresh_rate(&self) -> f64 {
        or_default(self.refresh_rate, DEFAULT_REFRESH_RATE)
    }

    pub fn frame_period(&self) -> Duration {
        millis(1000.0 / self.refresh_rate())
    }
}
