//! Shared playback loop behind both drivers.
//!
//! A [`Ticker`] owns a curve and the user callback. Each call to
//! [`Ticker::tick`] delivers one value and reports whether the host should
//! call it again. Hosts implement [`TickSource`] and decide *when* ticks
//! happen; everything about *what* a tick does lives here.

use std::{
    iter::Peekable,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tracing::debug;

use crate::{curve::Curve, Result};

#[derive(Debug, Default)]
struct Flags {
    closed: AtomicBool,
    finished: AtomicBool,
}

/// Cancellation token returned by the drivers.
///
/// Cloning yields another view of the same token. Cancelling is sticky:
/// once set the flag is never cleared and repeated calls are no-ops.
#[derive(Debug, Clone, Default)]
pub struct AnimationHandle {
    flags: Arc<Flags>,
}

impl AnimationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the animation before its next tick. A tick already running is
    /// not interrupted.
    pub fn cancel(&self) {
        self.flags.closed.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flags.closed.load(Ordering::Acquire)
    }

    /// True once the driver has released its timer or frame registration.
    pub fn is_finished(&self) -> bool {
        self.flags.finished.load(Ordering::Acquire)
    }

    pub(crate) fn finish(&self) {
        self.flags.finished.store(true, Ordering::Release);
    }

    pub(crate) fn closer(&self) -> Closer {
        Closer {
            flags: self.flags.clone(),
        }
    }
}

/// The `close` argument handed to every callback invocation. Closing has
/// the same effect as [`AnimationHandle::cancel`].
#[derive(Debug, Clone)]
pub struct Closer {
    flags: Arc<Flags>,
}

impl Closer {
    pub fn close(&self) {
        self.flags.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.flags.closed.load(Ordering::Acquire)
    }
}

/// What a ticker wants from its host after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule another tick.
    Continue,
    /// Release the registration; the ticker must not be called again.
    Stop,
}

/// How often a host should invoke a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// A repeating wall-clock timer with the given period.
    Every(Duration),
    /// Once per display refresh.
    Frame,
}

/// Boxed ticker as handed to a [`TickSource`].
pub type BoxedTicker = Box<dyn FnMut() -> Tick>;

/// Host capability that repeatedly invokes a ticker.
///
/// Implementations call the ticker once per period (or frame) until it
/// returns [`Tick::Stop`], then drop it. Ticks never overlap.
pub trait TickSource {
    fn start(&self, cadence: Cadence, ticker: BoxedTicker) -> Result<()>;
}

impl<S: TickSource + ?Sized> TickSource for &S {
    fn start(&self, cadence: Cadence, ticker: BoxedTicker) -> Result<()> {
        (**self).start(cadence, ticker)
    }
}

/// Pull, deliver, then check for exhaustion or cancellation.
///
/// The next value is peeked right after delivery, so the tick that hands
/// out the last value is also the one that returns [`Tick::Stop`].
pub struct Ticker<F> {
    driver: &'static str,
    curve: Peekable<Curve>,
    callback: F,
    handle: AnimationHandle,
    closer: Closer,
    delivered: u64,
}

impl<F> Ticker<F>
where
    F: FnMut(f64, &Closer),
{
    pub fn new(driver: &'static str, curve: Curve, callback: F, handle: AnimationHandle) -> Self {
        let closer = handle.closer();
        Self {
            driver,
            curve: curve.peekable(),
            callback,
            handle,
            closer,
            delivered: 0,
        }
    }

    pub fn handle(&self) -> &AnimationHandle {
        &self.handle
    }

    /// Number of values handed to the callback so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn tick(&mut self) -> Tick {
        if self.handle.is_finished() {
            return Tick::Stop;
        }
        if self.handle.is_cancelled() {
            return self.stop("cancelled");
        }
        let Some(value) = self.curve.next() else {
            return self.stop("exhausted");
        };

        (self.callback)(value, &self.closer);
        self.delivered += 1;

        if self.curve.peek().is_none() {
            self.stop("exhausted")
        } else if self.handle.is_cancelled() {
            self.stop("cancelled")
        } else {
            Tick::Continue
        }
    }

    fn stop(&mut self, reason: &'static str) -> Tick {
        debug!(
            driver = self.driver,
            delivered = self.delivered,
            reason,
            "animation stopped"
        );
        self.handle.finish();
        Tick::Stop
    }
}

impl<F> std::fmt::Debug for Ticker<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("driver", &self.driver)
            .field("delivered", &self.delivered)
            .field("handle", &self.handle)
            .finish()
    }
}
