use serde::{Deserialize, Serialize};

/// Closed numeric range used as the source or target of a [`LinearMap`].
///
/// Endpoint order is not significant: `Interval::new(5.0, 1.0)` and
/// `Interval::new(1.0, 5.0)` describe the same range. A bare scalar `x`
/// converts to `(0, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "IntervalRepr", into = "(f64, f64)")]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    /// The normalised `[0, 1]` progress range.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Distance between the endpoints. Zero marks a degenerate interval.
    pub fn amplitude(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.amplitude() == 0.0
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::UNIT
    }
}

impl From<f64> for Interval {
    fn from(max: f64) -> Self {
        Self::new(0.0, max)
    }
}

impl From<(f64, f64)> for Interval {
    fn from((a, b): (f64, f64)) -> Self {
        Self::new(a, b)
    }
}

impl From<[f64; 2]> for Interval {
    fn from([a, b]: [f64; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<Interval> for (f64, f64) {
    fn from(interval: Interval) -> Self {
        (interval.min, interval.max)
    }
}

/// Accepts either `10.0` or `[2.0, 10.0]` in configuration documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalRepr {
    Scalar(f64),
    Pair(f64, f64),
}

impl From<IntervalRepr> for Interval {
    fn from(repr: IntervalRepr) -> Self {
        match repr {
            IntervalRepr::Scalar(max) => max.into(),
            IntervalRepr::Pair(a, b) => Interval::new(a, b),
        }
    }
}

/// Linear scaling from one [`Interval`] onto another.
///
/// A degenerate source interval makes the division blow up; the result is
/// `NaN` or infinite rather than an error, so callers are expected to hand
/// in intervals with a non-zero amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearMap {
    pub source: Interval,
    pub target: Interval,
}

impl LinearMap {
    pub fn new(source: impl Into<Interval>, target: impl Into<Interval>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value - self.source.min) / self.source.amplitude() * self.target.amplitude()
            + self.target.min
    }
}

/// Returns a function mapping values from `source` onto `target`.
pub fn remap(source: impl Into<Interval>, target: impl Into<Interval>) -> impl Fn(f64) -> f64 + Copy {
    let map = LinearMap::new(source, target);
    move |value| map.apply(value)
}
