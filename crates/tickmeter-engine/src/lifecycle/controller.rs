use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::counter::{FpsReport, MeasurementWindow, ReportingInterval};
use crate::error::FpsError;
use crate::notify::{FpsSubscriber, SubscriberId, SubscriberList};
use crate::time::{ClockSubscription, FrameClock, Timestamp};

use super::state::LifecycleState;

struct Binding {
    clock: Rc<dyn FrameClock>,
    subscription: ClockSubscription,
}

struct Shared {
    state: Cell<LifecycleState>,
    window: RefCell<MeasurementWindow>,
    subscribers: SubscriberList,
    binding: RefCell<Option<Binding>>,
    last_report: Cell<Option<FpsReport>>,
    /// Bumped on every successful `start`; ticks carrying an older value come
    /// from a binding that has since been replaced.
    generation: Cell<u64>,
}

impl Shared {
    fn start(self: &Rc<Self>, clock: Rc<dyn FrameClock>, interval: ReportingInterval) -> Result<(), FpsError> {
        let generation = self.generation.get().wrapping_add(1);
        let weak = Rc::downgrade(self);
        let subscription = clock.subscribe(Box::new(move |now| {
            if let Some(shared) = weak.upgrade() {
                shared.on_clock_tick(generation, now);
            }
        }))?;

        // Subscribed: commit. Nothing above touched our state.
        let previous = self.binding.replace(Some(Binding { clock, subscription }));
        if let Some(old) = previous {
            old.clock.unsubscribe(old.subscription);
        }
        self.generation.set(generation);

        {
            let mut window = self.window.borrow_mut();
            window.set_interval(interval);
            window.reset();
        }

        let was = self.state.replace(LifecycleState::Running);
        if was.is_running() {
            log::debug!("fps counter rebound to a new clock ({:?} interval)", interval.as_duration());
        } else {
            log::debug!("fps counter started ({:?} interval)", interval.as_duration());
        }
        Ok(())
    }

    fn stop(&self) {
        if self.state.replace(LifecycleState::Stopped) == LifecycleState::Stopped {
            return;
        }

        let binding = self.binding.take();
        if let Some(binding) = binding {
            binding.clock.unsubscribe(binding.subscription);
        }
        self.window.borrow_mut().reset();

        log::debug!("fps counter stopped");
    }

    fn on_clock_tick(&self, generation: u64, now: Timestamp) {
        if generation != self.generation.get() {
            log::trace!("dropping tick at {now} from a replaced clock binding");
            return;
        }
        self.on_tick(now);
    }

    fn on_tick(&self, now: Timestamp) {
        if !self.state.get().is_running() {
            log::trace!("dropping tick at {now}: counter stopped");
            return;
        }

        let report = self.window.borrow_mut().record(now);
        let Some(report) = report else {
            return;
        };

        self.last_report.set(Some(report));
        let delivery = self.subscribers.notify(report);
        if !delivery.failed.is_empty() {
            log::debug!(
                "{} of {} subscriber(s) failed on {report:?}",
                delivery.failed.len(),
                delivery.failed.len() + delivery.delivered
            );
        }
    }
}

/// Frames-per-second counter bound to a frame clock.
///
/// Created stopped. `start` subscribes to a clock and begins counting;
/// subscribers receive one [`FpsReport`] per reporting interval. `stop`
/// unsubscribes and discards the partial window without reporting.
///
/// Dropping the counter stops it.
///
/// ```
/// use std::rc::Rc;
/// use tickmeter_engine::counter::{FpsReport, ReportingInterval};
/// use tickmeter_engine::lifecycle::FpsCounter;
/// use tickmeter_engine::time::ManualClock;
///
/// let clock = Rc::new(ManualClock::new());
/// let counter = FpsCounter::new();
/// counter.subscribe(|report: FpsReport| println!("{report}"));
/// counter.start(clock.clone(), ReportingInterval::default()).unwrap();
///
/// clock.run_at_rate(60, 61);
/// assert_eq!(counter.last_report(), Some(FpsReport::new(60)));
/// ```
pub struct FpsCounter {
    shared: Rc<Shared>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(Shared {
                state: Cell::new(LifecycleState::Stopped),
                window: RefCell::new(MeasurementWindow::default()),
                subscribers: SubscriberList::new(),
                binding: RefCell::new(None),
                last_report: Cell::new(None),
                generation: Cell::new(0),
            }),
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Binds to `clock` and starts measuring.
    ///
    /// Calling this while running rebinds: the old clock is unsubscribed and
    /// the window restarts empty. If `clock` refuses the subscription the
    /// counter is left exactly as it was.
    pub fn start(&self, clock: Rc<dyn FrameClock>, interval: ReportingInterval) -> Result<(), FpsError> {
        self.shared.start(clock, interval)
    }

    /// Like [`start`](Self::start) with the interval given in seconds.
    /// Non-positive or non-finite intervals are rejected before the clock is
    /// touched.
    pub fn start_secs(&self, clock: Rc<dyn FrameClock>, interval_secs: f64) -> Result<(), FpsError> {
        let interval = ReportingInterval::from_secs_f64(interval_secs)?;
        self.start(clock, interval)
    }

    /// Unsubscribes from the clock. No further reports fire; `last_report`
    /// keeps the final value. A no-op when already stopped.
    pub fn stop(&self) {
        self.shared.stop();
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Weak handle for collaborators that must stop the counter, possibly from
    /// inside a subscriber callback, without owning it.
    pub fn handle(&self) -> CounterHandle {
        CounterHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    // ── measurement ───────────────────────────────────────────────────────

    /// Processes one frame tick. Ignored unless running.
    ///
    /// The bound clock calls this; hosts that pump ticks themselves may call
    /// it directly.
    pub fn on_tick(&self, now: Timestamp) {
        self.shared.on_tick(now);
    }

    /// Clears the current window without reporting. The next tick re-anchors it.
    pub fn reset(&self) {
        self.shared.window.borrow_mut().reset();
    }

    pub fn last_report(&self) -> Option<FpsReport> {
        self.shared.last_report.get()
    }

    pub fn tick_count(&self) -> u64 {
        self.shared.window.borrow().tick_count()
    }

    pub fn window_start(&self) -> Option<Timestamp> {
        self.shared.window.borrow().window_start()
    }

    pub fn reporting_interval(&self) -> ReportingInterval {
        self.shared.window.borrow().interval()
    }

    // ── subscribers ───────────────────────────────────────────────────────

    pub fn subscribe<S>(&self, subscriber: S) -> SubscriberId
    where
        S: FpsSubscriber + 'static,
    {
        self.shared.subscribers.add(subscriber)
    }

    /// Registers `subscriber` without keeping it alive.
    pub fn subscribe_weak<S>(&self, subscriber: &Rc<RefCell<S>>) -> SubscriberId
    where
        S: FpsSubscriber + 'static,
    {
        self.shared.subscribers.add_weak(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.shared.subscribers.remove(id)
    }

    pub fn subscribers(&self) -> &SubscriberList {
        &self.shared.subscribers
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FpsCounter {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

/// Non-owning handle to an [`FpsCounter`].
#[derive(Clone)]
pub struct CounterHandle {
    shared: Weak<Shared>,
}

impl CounterHandle {
    /// Stops the counter if it still exists.
    pub fn stop(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.stop();
        }
    }

    /// `false` once the counter is stopped or dropped.
    pub fn is_running(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.state.get().is_running())
    }

    pub fn last_report(&self) -> Option<FpsReport> {
        self.shared.upgrade().and_then(|shared| shared.last_report.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{ClockError, ManualClock};
    use std::time::Duration;

    fn frame() -> Duration {
        Duration::from_secs(1) / 60
    }

    fn collecting(counter: &FpsCounter) -> Rc<RefCell<Vec<u32>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        counter.subscribe(move |r: FpsReport| sink.borrow_mut().push(r.frames_per_second));
        seen
    }

    // ── start ─────────────────────────────────────────────────────────────

    #[test]
    fn new_counter_is_stopped_and_empty() {
        let counter = FpsCounter::new();
        assert_eq!(counter.state(), LifecycleState::Stopped);
        assert_eq!(counter.tick_count(), 0);
        assert_eq!(counter.window_start(), None);
        assert_eq!(counter.last_report(), None);
    }

    #[test]
    fn start_subscribes_to_clock() {
        let clock = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();
        counter.start(clock.clone(), ReportingInterval::default()).unwrap();

        assert!(counter.is_running());
        assert_eq!(clock.subscriber_count(), 1);
    }

    #[test]
    fn invalid_interval_leaves_counter_untouched() {
        let clock = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();

        let err = counter.start_secs(clock.clone(), 0.0).unwrap_err();

        assert_eq!(err, FpsError::InvalidConfiguration(0.0));
        assert_eq!(counter.state(), LifecycleState::Stopped);
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn closed_clock_keeps_counter_stopped() {
        let clock = Rc::new(ManualClock::new());
        clock.close();
        let counter = FpsCounter::new();

        let err = counter.start(clock.clone(), ReportingInterval::default()).unwrap_err();

        assert_eq!(err, FpsError::ClockSourceUnavailable(ClockError::Closed));
        assert!(!counter.is_running());
    }

    #[test]
    fn failed_rebind_keeps_previous_binding() {
        let good = Rc::new(ManualClock::new());
        let closed = Rc::new(ManualClock::new());
        closed.close();
        let counter = FpsCounter::new();
        let seen = collecting(&counter);

        counter.start(good.clone(), ReportingInterval::default()).unwrap();
        assert!(counter.start(closed.clone(), ReportingInterval::default()).is_err());

        assert!(counter.is_running());
        assert_eq!(good.subscriber_count(), 1);
        good.run_at_rate(60, 61);
        assert_eq!(*seen.borrow(), vec![60]);
    }

    // ── rebinding ─────────────────────────────────────────────────────────

    #[test]
    fn rebind_moves_subscription_to_new_clock() {
        let first = Rc::new(ManualClock::new());
        let second = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();

        counter.start(first.clone(), ReportingInterval::default()).unwrap();
        counter.start(second.clone(), ReportingInterval::default()).unwrap();

        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 1);

        first.advance(frame());
        assert_eq!(counter.window_start(), None);
        second.advance(frame());
        assert!(counter.window_start().is_some());
    }

    #[test]
    fn restart_on_same_clock_resets_window() {
        let clock = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();
        counter.start(clock.clone(), ReportingInterval::default()).unwrap();
        for _ in 0..20 {
            clock.advance(frame());
        }
        assert_eq!(counter.tick_count(), 19);

        counter.start(clock.clone(), ReportingInterval::default()).unwrap();

        assert_eq!(counter.tick_count(), 0);
        assert_eq!(counter.window_start(), None);
        assert_eq!(clock.subscriber_count(), 1);
    }

    #[test]
    fn restart_applies_new_interval() {
        let clock = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();
        let seen = collecting(&counter);

        counter.start_secs(clock.clone(), 1.0).unwrap();
        counter.start_secs(clock.clone(), 0.5).unwrap();
        clock.run_at_rate(60, 31);

        assert_eq!(counter.reporting_interval().as_duration(), Duration::from_millis(500));
        assert_eq!(*seen.borrow(), vec![60]);
    }

    // ── stop ──────────────────────────────────────────────────────────────

    #[test]
    fn stop_unsubscribes_and_keeps_last_report() {
        let clock = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();
        counter.start(clock.clone(), ReportingInterval::default()).unwrap();
        clock.run_at_rate(60, 61);
        clock.run_at_rate(60, 30);

        counter.stop();

        assert_eq!(clock.subscriber_count(), 0);
        assert_eq!(counter.tick_count(), 0);
        assert_eq!(counter.last_report(), Some(FpsReport::new(60)));
    }

    #[test]
    fn stop_from_subscriber_halts_delivery() {
        let clock = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();
        let handle = counter.handle();
        let seen = collecting(&counter);
        counter.subscribe(move |_: FpsReport| handle.stop());

        counter.start(clock.clone(), ReportingInterval::default()).unwrap();
        clock.run_at_rate(60, 200);

        assert_eq!(*seen.borrow(), vec![60]);
        assert!(!counter.is_running());
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn drop_unsubscribes_from_clock() {
        let clock = Rc::new(ManualClock::new());
        let handle = {
            let counter = FpsCounter::new();
            counter.start(clock.clone(), ReportingInterval::default()).unwrap();
            counter.handle()
        };

        assert_eq!(clock.subscriber_count(), 0);
        assert!(!handle.is_running());
        assert_eq!(handle.last_report(), None);
        handle.stop();
    }

    // ── subscribers ───────────────────────────────────────────────────────

    #[test]
    fn weak_subscriber_is_pruned_after_drop() {
        let clock = Rc::new(ManualClock::new());
        let counter = FpsCounter::new();
        let overlay = Rc::new(RefCell::new(|_: FpsReport| {}));
        counter.subscribe_weak(&overlay);
        counter.start(clock.clone(), ReportingInterval::default()).unwrap();

        drop(overlay);
        clock.run_at_rate(60, 61);

        assert!(counter.subscribers().is_empty());
        assert_eq!(counter.last_report(), Some(FpsReport::new(60)));
    }
}
