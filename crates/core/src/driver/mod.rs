//! Interval and frame drivers.
//!
//! Both drivers sample one curve over `[0, 1]` and hand each value to a
//! callback together with a [`Closer`]. They share [`Ticker`]; the interval
//! driver waits for its first timer tick while the frame driver runs its
//! first cycle synchronously and then follows the refresh cadence.

use tracing::{debug, warn};

use crate::{
    config::{FrameSettings, IntervalSettings},
    curve::generate,
    mapping::Interval,
    timeline::{AnimationHandle, Cadence, Closer, Tick, TickSource, Ticker},
};

/// Plays an eased progression on a fixed wall-clock interval.
///
/// The curve has `duration / ms` steps, so `{ ms: 10, duration: 100 }`
/// delivers 11 values and then releases the timer. Never fails: if the
/// host refuses the timer the failure is logged and the returned handle is
/// already cancelled and finished.
pub fn throttle<S, F>(source: &S, callback: F, settings: &IntervalSettings) -> AnimationHandle
where
    S: TickSource + ?Sized,
    F: FnMut(f64, &Closer) + 'static,
{
    let handle = AnimationHandle::new();
    let curve = generate(settings.easing, Interval::UNIT, settings.steps());
    debug!(
        easing = %settings.easing,
        steps = curve.steps(),
        period = ?settings.period(),
        "starting interval animation"
    );

    let ticker = Ticker::new("throttle", curve, callback, handle.clone());
    register(source, Cadence::Every(settings.period()), ticker, &handle);
    handle
}

/// Plays an eased progression once per display refresh.
///
/// The first value is delivered before this function returns. Each later
/// frame delivers one value; the animation ends on the frame that delivers
/// the last value or on the first frame after a cancellation.
pub fn animate<S, F>(source: &S, callback: F, settings: &FrameSettings) -> AnimationHandle
where
    S: TickSource + ?Sized,
    F: FnMut(f64, &Closer) + 'static,
{
    let handle = AnimationHandle::new();
    let curve = generate(settings.ease, Interval::UNIT, settings.frames());
    debug!(ease = %settings.ease, frames = curve.steps(), "starting frame animation");

    let mut ticker = Ticker::new("animate", curve, callback, handle.clone());
    if ticker.tick() == Tick::Continue {
        register(source, Cadence::Frame, ticker, &handle);
    }
    handle
}

fn register<S, F>(source: &S, cadence: Cadence, mut ticker: Ticker<F>, handle: &AnimationHandle)
where
    S: TickSource + ?Sized,
    F: FnMut(f64, &Closer) + 'static,
{
    if let Err(err) = source.start(cadence, Box::new(move || ticker.tick())) {
        warn!(%err, ?cadence, "tick source refused animation");
        handle.cancel();
        handle.finish();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        io,
        rc::Rc,
        time::{Duration, Instant},
    };

    use calloop::EventLoop;

    use super::*;
    use crate::{
        curve::{ease_in_out, Shape},
        host::{FrameQueue, LoopSource},
        timeline::BoxedTicker,
        Result, TweenError,
    };

    const EPSILON: f64 = 1e-9;

    fn recorder() -> (Rc<RefCell<Vec<f64>>>, impl FnMut(f64, &Closer) + 'static) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = values.clone();
        (values, move |value, _: &Closer| sink.borrow_mut().push(value))
    }

    struct Refusing;

    impl TickSource for Refusing {
        fn start(&self, _cadence: Cadence, _ticker: BoxedTicker) -> Result<()> {
            Err(TweenError::Io(io::Error::new(io::ErrorKind::Other, "no timers")))
        }
    }

    #[test]
    fn throttle_ticks_eleven_times_for_ten_steps() {
        let queue = FrameQueue::new();
        let (values, callback) = recorder();
        let settings = IntervalSettings::new().with_ms(10.0).with_duration(100.0);
        let handle = throttle(&queue, callback, &settings);

        assert!(values.borrow().is_empty());
        for _ in 0..10 {
            assert_eq!(queue.run_frame(), 1);
            assert!(!handle.is_finished());
        }
        assert_eq!(queue.run_frame(), 1);
        assert!(handle.is_finished());
        assert!(queue.is_idle());
        assert_eq!(values.borrow().len(), 11);
        assert!(!handle.is_cancelled());

        let expected: Vec<f64> = ease_in_out(1.0, 10.0).collect();
        assert_eq!(*values.borrow(), expected);
    }

    #[test]
    fn throttle_defaults_to_one_hundred_steps() {
        let queue = FrameQueue::new();
        let (values, callback) = recorder();
        throttle(&queue, callback, &IntervalSettings::new());
        assert_eq!(queue.run_until_idle(), 101);
        assert_eq!(values.borrow().len(), 101);
    }

    #[test]
    fn throttle_stops_when_callback_closes() {
        let queue = FrameQueue::new();
        let mut seen = 0;
        let handle = throttle(
            &queue,
            move |_, close: &Closer| {
                seen += 1;
                if seen == 3 {
                    close.close();
                }
            },
            &IntervalSettings::new().with_duration(100.0),
        );
        assert_eq!(queue.run_until_idle(), 3);
        assert!(handle.is_cancelled());
        assert!(handle.is_finished());
    }

    #[test]
    fn animate_delivers_first_frame_synchronously() {
        let queue = FrameQueue::new();
        let (values, callback) = recorder();
        let handle = animate(&queue, callback, &FrameSettings::new().with_frames(10.0));

        assert_eq!(values.borrow().len(), 1);
        assert_eq!(values.borrow()[0], 0.0);
        assert_eq!(queue.run_until_idle(), 10);
        assert_eq!(values.borrow().len(), 11);
        assert!((values.borrow()[10] - 1.0).abs() < EPSILON);
        assert!(handle.is_finished());
    }

    #[test]
    fn delivered_values_scale_progress_by_the_cursor() {
        let queue = FrameQueue::new();
        let (values, callback) = recorder();
        animate(&queue, callback, &FrameSettings::new().with_frames(2.0));
        queue.run_until_idle();
        let values = values.borrow();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 0.25).abs() < EPSILON);
        assert!((values[2] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn animate_cancel_during_frame_skips_the_next_frame() {
        let queue = FrameQueue::new();
        let slot: Rc<RefCell<Option<AnimationHandle>>> = Rc::default();
        let frames = Rc::new(RefCell::new(0));

        let slot_in_callback = slot.clone();
        let frames_in_callback = frames.clone();
        let handle = animate(
            &queue,
            move |_, _: &Closer| {
                *frames_in_callback.borrow_mut() += 1;
                if *frames_in_callback.borrow() == 4 {
                    if let Some(handle) = slot_in_callback.borrow().as_ref() {
                        handle.cancel();
                    }
                }
            },
            &FrameSettings::new().with_frames(20.0),
        );
        *slot.borrow_mut() = Some(handle.clone());

        queue.run_until_idle();
        assert_eq!(*frames.borrow(), 4);
        assert!(handle.is_finished());
    }

    #[test]
    fn animate_cancel_between_frames() {
        let queue = FrameQueue::new();
        let (values, callback) = recorder();
        let handle = animate(&queue, callback, &FrameSettings::new().with_frames(5.0));
        queue.run_frame();
        handle.cancel();
        queue.run_until_idle();
        assert_eq!(values.borrow().len(), 2);
        assert!(handle.is_finished());
    }

    #[test]
    fn animate_closed_in_first_frame_never_registers() {
        let queue = FrameQueue::new();
        let handle = animate(&queue, |_, close: &Closer| close.close(), &FrameSettings::new());
        assert!(queue.is_idle());
        assert!(handle.is_cancelled());
        assert!(handle.is_finished());
    }

    #[test]
    fn unknown_easing_plays_like_in_out() {
        let queue = FrameQueue::new();
        let (bogus, callback) = recorder();
        animate(
            &queue,
            callback,
            &FrameSettings::new()
                .with_frames(16.0)
                .with_ease(Shape::from_name("bogus")),
        );
        let (in_out, callback) = recorder();
        animate(
            &queue,
            callback,
            &FrameSettings::new().with_frames(16.0).with_ease(Shape::InOut),
        );
        queue.run_until_idle();
        assert_eq!(*bogus.borrow(), *in_out.borrow());
    }

    #[test]
    fn refused_registration_returns_a_finished_handle() {
        let (values, callback) = recorder();
        let handle = throttle(&Refusing, callback, &IntervalSettings::new());
        assert!(handle.is_cancelled());
        assert!(handle.is_finished());
        assert!(values.borrow().is_empty());

        let (values, callback) = recorder();
        let handle = animate(&Refusing, callback, &FrameSettings::new());
        assert!(handle.is_finished());
        assert_eq!(values.borrow().len(), 1);
    }

    #[test]
    fn throttle_runs_on_a_calloop_timer() {
        let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new().unwrap();
        let source = LoopSource::new(event_loop.handle());
        let (values, callback) = recorder();
        let handle = throttle(
            &source,
            callback,
            &IntervalSettings::new()
                .with_ms(1.0)
                .with_duration(10.0)
                .with_easing(Shape::Out),
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            event_loop
                .dispatch(Some(Duration::from_millis(20)), &mut ())
                .unwrap();
        }
        assert!(handle.is_finished());
        let values = values.borrow();
        assert_eq!(values.len(), 11);
        assert!((values[10] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn animate_runs_on_calloop_frames() {
        let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new().unwrap();
        let source = LoopSource::with_frame_period(event_loop.handle(), Duration::from_millis(1));
        assert_eq!(source.frame_period(), Duration::from_millis(1));
        let (values, callback) = recorder();
        let handle = animate(&source, callback, &FrameSettings::new().with_frames(5.0));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            event_loop
                .dispatch(Some(Duration::from_millis(20)), &mut ())
                .unwrap();
        }
        assert_eq!(values.borrow().len(), 6);
    }
}
