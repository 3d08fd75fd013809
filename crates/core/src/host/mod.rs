//! Concrete [`TickSource`] implementations.
//!
//! [`LoopSource`] registers tickers as `calloop` timers so animations run on
//! the same event loop as the rest of the application. [`FrameQueue`] is a
//! request-animation-frame style queue pumped by an existing render loop.

use std::{cell::RefCell, fmt, rc::Rc, time::Duration};

use calloop::{
    timer::{TimeoutAction, Timer},
    LoopHandle,
};
use tracing::trace;

use crate::{
    config::DEFAULT_REFRESH_RATE,
    timeline::{BoxedTicker, Cadence, Tick, TickSource},
    Result,
};

/// Runs tickers as repeating timers on a `calloop` event loop.
///
/// Frame cadence is emulated with a timer paced at the configured refresh
/// period. Returning [`Tick::Stop`] drops the timer source.
pub struct LoopSource<'l, D> {
    handle: LoopHandle<'l, D>,
    frame_period: Duration,
}

impl<'l, D> LoopSource<'l, D> {
    pub fn new(handle: LoopHandle<'l, D>) -> Self {
        Self::with_frame_period(handle, Duration::from_secs_f64(1.0 / DEFAULT_REFRESH_RATE))
    }

    pub fn with_frame_period(handle: LoopHandle<'l, D>, frame_period: Duration) -> Self {
        Self {
            handle,
            frame_period,
        }
    }

    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }
}

impl<'l, D> TickSource for LoopSource<'l, D> {
    fn start(&self, cadence: Cadence, mut ticker: BoxedTicker) -> Result<()> {
        let period = match cadence {
            Cadence::Every(period) => period,
            Cadence::Frame => self.frame_period,
        };
        trace!(?period, "registering timer");

        self.handle
            .insert_source(Timer::from_duration(period), move |deadline, _, _| {
                match ticker() {
                    // Scheduling from the deadline keeps the cadence from drifting.
                    Tick::Continue => TimeoutAction::ToInstant(deadline + period),
                    Tick::Stop => TimeoutAction::Drop,
                }
            })
            .map_err(|err| err.error)?;
        Ok(())
    }
}

impl<'l, D> fmt::Debug for LoopSource<'l, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopSource")
            .field("frame_period", &self.frame_period)
            .finish()
    }
}

/// Manually pumped frame queue.
///
/// Tickers started on the queue wait for the next [`FrameQueue::run_frame`]
/// call; a ticker that asks to continue is queued for the frame after.
/// Tickers started while a frame runs also wait for the next frame. The
/// cadence is ignored, which makes the queue a deterministic clock for
/// either driver.
#[derive(Clone, Default)]
pub struct FrameQueue {
    pending: Rc<RefCell<Vec<BoxedTicker>>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every ticker due this frame and returns how many ran.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let ran = due.len();
        for mut ticker in due {
            if ticker() == Tick::Continue {
                self.pending.borrow_mut().push(ticker);
            }
        }
        ran
    }

    /// Pumps frames until nothing is queued. Returns the number of frames run.
    pub fn run_until_idle(&self) -> usize {
        let mut frames = 0;
        while !self.is_idle() {
            self.run_frame();
            frames += 1;
        }
        frames
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl TickSource for FrameQueue {
    fn start(&self, _cadence: Cadence, ticker: BoxedTicker) -> Result<()> {
        self.pending.borrow_mut().push(ticker);
        Ok(())
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.len())
            .finish()
    }
}
