use std::cell::Cell;
use std::time::Duration;

use super::frame_clock::{ClockError, ClockSubscription, FrameClock, TickCallback, TickFanout};
use super::timestamp::Timestamp;

/// Host-pumped frame clock.
///
/// The host calls [`ManualClock::tick`] (or [`ManualClock::advance`]) from its
/// own render loop once per presented frame. Also the deterministic clock used
/// throughout the tests.
#[derive(Default)]
pub struct ManualClock {
    fanout: TickFanout,
    now: Cell<Timestamp>,
    closed: Cell<bool>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a tick stamped `now`. Returns how many subscribers ran.
    pub fn tick(&self, now: Timestamp) -> usize {
        self.now.set(now);
        self.fanout.deliver(now)
    }

    /// Moves the clock forward by `dt` and delivers a tick.
    pub fn advance(&self, dt: Duration) -> usize {
        let next = Timestamp::from_duration(self.now.get().since_origin().saturating_add(dt));
        self.tick(next)
    }

    /// Delivers `frames` evenly spaced ticks at `hz`, starting one period after
    /// the current time.
    pub fn run_at_rate(&self, hz: u32, frames: u32) {
        let start = self.now.get().since_origin();
        for i in 1..=frames {
            let offset = Duration::from_secs(u64::from(i)) / hz.max(1);
            self.tick(Timestamp::from_duration(start + offset));
        }
    }

    /// Timestamp of the most recent tick.
    pub fn now(&self) -> Timestamp {
        self.now.get()
    }

    /// Refuses all future subscriptions. Existing subscribers keep ticking
    /// until they unsubscribe.
    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn subscriber_count(&self) -> usize {
        self.fanout.len()
    }
}

impl FrameClock for ManualClock {
    fn subscribe(&self, callback: TickCallback) -> Result<ClockSubscription, ClockError> {
        if self.closed.get() {
            return Err(ClockError::Closed);
        }
        Ok(self.fanout.subscribe(callback))
    }

    fn unsubscribe(&self, subscription: ClockSubscription) {
        if !self.fanout.unsubscribe(subscription) {
            log::trace!("manual clock: unsubscribe of unknown subscription {subscription:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn advance_accumulates_time() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(10));
        clock.advance(Duration::from_millis(15));
        assert_eq!(clock.now(), Timestamp::from_duration(Duration::from_millis(25)));
    }

    #[test]
    fn run_at_rate_spaces_ticks_evenly() {
        let clock = ManualClock::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        clock
            .subscribe(Box::new(move |ts: Timestamp| sink.borrow_mut().push(ts)))
            .unwrap();

        clock.run_at_rate(4, 4);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], Timestamp::from_secs_f64(0.25));
        assert_eq!(seen[3], Timestamp::from_secs_f64(1.0));
    }

    #[test]
    fn closed_clock_rejects_subscribers() {
        let clock = ManualClock::new();
        clock.close();
        assert_eq!(clock.subscribe(Box::new(|_: Timestamp| {})), Err(ClockError::Closed));
    }

    #[test]
    fn unsubscribed_callback_is_not_ticked() {
        let clock = ManualClock::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = clock.subscribe(Box::new(move |_: Timestamp| h.set(h.get() + 1))).unwrap();

        clock.advance(Duration::from_millis(16));
        clock.unsubscribe(id);
        clock.advance(Duration::from_millis(16));

        assert_eq!(hits.get(), 1);
        assert_eq!(clock.subscriber_count(), 0);
    }
}
