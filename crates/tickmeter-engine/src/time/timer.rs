use std::time::{Duration, Instant};

use super::frame_clock::{ClockError, ClockSubscription, FrameClock, TickCallback, TickFanout};
use super::timestamp::Timestamp;

/// Frame timing snapshot handed to the per-frame work of a [`TimerClock`] loop.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Timestamp delivered to subscribers for this frame.
    pub now: Timestamp,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Directive returned by the per-frame work of a [`TimerClock`] loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameControl {
    Continue,
    Exit,
}

/// Timer-paced frame clock for hosts without a display-synchronized callback.
///
/// Emulates a vsync source: ticks fall on a fixed grid of `period` slots
/// starting when the loop begins. A frame whose work overruns its slot waits
/// for the next free slot instead of firing a burst of catch-up ticks, so
/// slow work shows up as a lower tick rate, as it would on a display link.
pub struct TimerClock {
    fanout: TickFanout,
    origin: Instant,
    period: Duration,
}

impl TimerClock {
    /// Creates a clock ticking at `hz` frames per second.
    pub fn new(hz: f64) -> Result<Self, ClockError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ClockError::InvalidRate(hz));
        }
        match Duration::try_from_secs_f64(1.0 / hz) {
            Ok(period) if !period.is_zero() => Self::with_period(period),
            _ => Err(ClockError::InvalidRate(hz)),
        }
    }

    /// Creates a clock with an explicit frame period.
    pub fn with_period(period: Duration) -> Result<Self, ClockError> {
        if period.is_zero() {
            return Err(ClockError::InvalidRate(f64::INFINITY));
        }
        Ok(Self {
            fanout: TickFanout::default(),
            origin: Instant::now(),
            period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Current time on this clock's timeline.
    pub fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.origin.elapsed())
    }

    /// Runs the frame loop for `frames` ticks, calling `work` after each one.
    pub fn run_frames<F>(&self, frames: u64, work: F)
    where
        F: FnMut(FrameTime) -> FrameControl,
    {
        self.run(|index, _| index < frames, work);
    }

    /// Runs the frame loop until `duration` has passed, calling `work` after
    /// each tick.
    pub fn run_for<F>(&self, duration: Duration, work: F)
    where
        F: FnMut(FrameTime) -> FrameControl,
    {
        let started = Instant::now();
        self.run(|_, now| now.saturating_duration_since(started) < duration, work);
    }

    fn run<C, F>(&self, mut keep_going: C, mut work: F)
    where
        C: FnMut(u64, Instant) -> bool,
        F: FnMut(FrameTime) -> FrameControl,
    {
        let mut deadline = Instant::now();
        let mut last: Option<Instant> = None;
        let mut frame_index: u64 = 0;

        loop {
            let now = Instant::now();
            if !keep_going(frame_index, now) {
                break;
            }
            if let Some(wait) = deadline.checked_duration_since(now) {
                std::thread::sleep(wait);
            }

            let fired = Instant::now();
            if !keep_going(frame_index, fired) {
                break;
            }
            let stamp = Timestamp::from_duration(fired.saturating_duration_since(self.origin));
            let dt = last.map_or(Duration::ZERO, |prev| fired.saturating_duration_since(prev));
            last = Some(fired);

            self.fanout.deliver(stamp);

            let control = work(FrameTime {
                dt: dt.as_secs_f32(),
                now: stamp,
                frame_index,
            });
            frame_index = frame_index.wrapping_add(1);
            if control == FrameControl::Exit {
                break;
            }

            deadline = self.next_slot(deadline, Instant::now());
        }

        log::debug!("timer clock loop finished after {frame_index} frames");
    }

    /// First grid slot after `deadline` that has not already passed at `now`.
    fn next_slot(&self, deadline: Instant, now: Instant) -> Instant {
        let next = deadline + self.period;
        match now.checked_duration_since(next) {
            None => next,
            Some(late) => {
                let missed = late.as_nanos() / self.period.as_nanos() + 1;
                let skip = u32::try_from(missed).unwrap_or(u32::MAX);
                log::trace!("timer clock overran by {late:?}, skipping {skip} slot(s)");
                next + self.period.saturating_mul(skip)
            }
        }
    }
}

impl FrameClock for TimerClock {
    fn subscribe(&self, callback: TickCallback) -> Result<ClockSubscription, ClockError> {
        Ok(self.fanout.subscribe(callback))
    }

    fn unsubscribe(&self, subscription: ClockSubscription) {
        self.fanout.unsubscribe(subscription);
    }
}
