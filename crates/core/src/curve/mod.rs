//! Lazily sampled smoothstep curves.
//!
//! Every curve is built from the same cubic, `3t² − 2t³`, reparameterised
//! to give an ease-in, ease-out or ease-in-out progression. A [`Curve`]
//! walks a cursor from `t = 0` to `t = 1` in `steps` equal increments and
//! yields the eased progress multiplied by the cursor remapped into the
//! caller's domain. Every curve therefore starts at 0 and ends on the
//! domain's upper bound.

use std::{convert::Infallible, fmt, iter::FusedIterator, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mapping::{Interval, LinearMap};

/// Step count used when the caller does not supply a usable one.
pub const DEFAULT_STEPS: u64 = 100;

/// Largest step count a curve accepts.
pub const MAX_STEPS: u64 = u64::MAX / 2;

/// Cubic smoothstep, `3t² − 2t³`. Not clamped.
pub fn ease(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Which part of the smoothstep a curve follows.
///
/// Parsed from `"in"`, `"out"` and `"in-out"`. Any other name selects
/// [`Shape::InOut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Shape {
    /// Slow start, the first half of the smoothstep stretched over `[0, 1]`.
    In,
    /// Slow finish, the second half of the smoothstep.
    Out,
    /// The full smoothstep.
    #[default]
    InOut,
}

impl Shape {
    pub fn from_name(name: &str) -> Self {
        match name {
            "in" => Shape::In,
            "out" => Shape::Out,
            _ => Shape::InOut,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::In => "in",
            Shape::Out => "out",
            Shape::InOut => "in-out",
        }
    }

    /// Eased progress for cursor `t`, both in `[0, 1]`.
    pub fn progress(self, t: f64) -> f64 {
        match self {
            Shape::In => 2.0 * ease(t / 2.0),
            Shape::Out => 2.0 * ease((t + 1.0) / 2.0) - 1.0,
            Shape::InOut => ease(t),
        }
    }
}

impl FromStr for Shape {
    type Err = Infallible;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(Shape::from_name(name))
    }
}

impl From<String> for Shape {
    fn from(name: String) -> Self {
        Shape::from_name(&name)
    }
}

impl From<Shape> for String {
    fn from(shape: Shape) -> Self {
        shape.name().to_string()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rounds a caller supplied step count. Zero, negative and non-finite
/// requests fall back to [`DEFAULT_STEPS`]; anything that rounds down to
/// zero is raised to a single step, and counts beyond [`MAX_STEPS`] are
/// clamped.
pub fn resolve_steps(requested: f64) -> u64 {
    if !(requested.is_finite() && requested > 0.0) {
        return DEFAULT_STEPS;
    }
    let rounded = requested.round();
    if rounded > MAX_STEPS as f64 {
        warn!(requested, clamped = MAX_STEPS, "step count clamped");
        return MAX_STEPS;
    }
    (rounded as u64).max(1)
}

/// Finite, single-pass sequence of eased values.
///
/// Yields `steps + 1` values. Value `i` is `shape(t) * remap(t)` with
/// `t = i / steps`, so the first is 0 and the last is the domain's upper
/// bound. Once exhausted it stays exhausted; sampling the
/// same curve again requires building a new one.
#[derive(Debug)]
pub struct Curve {
    shape: Shape,
    map: LinearMap,
    steps: u64,
    index: u64,
}

impl Curve {
    pub fn new(shape: Shape, domain: impl Into<Interval>, steps: f64) -> Self {
        Self {
            shape,
            map: LinearMap::new(Interval::UNIT, domain),
            steps: resolve_steps(steps),
            index: 0,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn domain(&self) -> Interval {
        self.map.target
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Cursor position of the next value, or `None` once exhausted.
    pub fn cursor(&self) -> Option<f64> {
        (!self.is_exhausted()).then(|| self.index as f64 / self.steps as f64)
    }

    pub fn is_exhausted(&self) -> bool {
        self.index > self.steps
    }

    fn remaining(&self) -> usize {
        let remaining = (self.steps + 1).saturating_sub(self.index);
        usize::try_from(remaining).unwrap_or(usize::MAX)
    }
}

impl Iterator for Curve {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let t = self.cursor()?;
        self.index += 1;
        Some(self.shape.progress(t) * self.map.apply(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Curve {}

impl FusedIterator for Curve {}

/// Builds a curve of the given shape over `domain`.
pub fn generate(shape: Shape, domain: impl Into<Interval>, steps: f64) -> Curve {
    Curve::new(shape, domain, steps)
}

pub fn ease_in(domain: impl Into<Interval>, steps: f64) -> Curve {
    generate(Shape::In, domain, steps)
}

pub fn ease_out(domain: impl Into<Interval>, steps: f64) -> Curve {
    generate(Shape::Out, domain, steps)
}

pub fn ease_in_out(domain: impl Into<Interval>, steps: f64) -> Curve {
    generate(Shape::InOut, domain, steps)
}
