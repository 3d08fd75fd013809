//! Smoothstep easing curves and the drivers that play them back.
//!
//! The crate is split along the path a value takes: [`mapping`] provides
//! the linear interval remap, [`curve`] turns the cubic smoothstep into
//! lazily sampled ease-in / ease-out / ease-in-out sequences, [`timeline`]
//! holds the shared tick loop and cancellation token, [`host`] supplies
//! timer and frame sources, and [`driver`] wires them together.

pub mod config;
pub mod curve;
pub mod driver;
pub mod error;
pub mod host;
pub mod mapping;
pub mod timeline;

pub use config::{AppConfig, FrameSettings, IntervalSettings};
pub use curve::{ease, ease_in, ease_in_out, ease_out, generate, Curve, Shape};
pub use driver::{animate, throttle};
pub use error::{Result, TweenError};
pub use host::{FrameQueue, LoopSource};
pub use mapping::{remap, Interval, LinearMap};
pub use timeline::{AnimationHandle, Cadence, Closer, Tick, TickSource, Ticker};
