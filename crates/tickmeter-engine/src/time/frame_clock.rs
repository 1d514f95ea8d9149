use std::cell::{Cell, RefCell};

use super::timestamp::Timestamp;

/// Callback invoked once per frame tick.
pub type TickCallback = Box<dyn FnMut(Timestamp)>;

/// Handle returned by [`FrameClock::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ClockSubscription(u64);

/// Reasons a clock refuses to deliver ticks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    /// The clock was shut down by its host and accepts no new subscribers.
    #[error("frame clock is closed")]
    Closed,
    /// The requested tick rate is not a positive, finite number.
    #[error("invalid frame rate: {0} Hz")]
    InvalidRate(f64),
}

/// Host per-frame callback source.
///
/// Implementations deliver a monotonically increasing [`Timestamp`] to every
/// subscriber once per frame, synchronously on the host loop. After
/// `unsubscribe` returns, the callback is never invoked again, even when
/// `unsubscribe` is called from inside a tick callback.
pub trait FrameClock {
    fn subscribe(&self, callback: TickCallback) -> Result<ClockSubscription, ClockError>;

    fn unsubscribe(&self, subscription: ClockSubscription);
}

/// Subscriber registry shared by the clock adapters.
///
/// Tolerates subscribe/unsubscribe from inside a delivery: callbacks are moved
/// out of the registry while they run, so no borrow is held across a call.
#[derive(Default)]
pub(crate) struct TickFanout {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ClockSubscription, Option<TickCallback>)>>,
}

impl TickFanout {
    pub(crate) fn subscribe(&self, callback: TickCallback) -> ClockSubscription {
        let id = ClockSubscription(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, Some(callback)));
        id
    }

    pub(crate) fn unsubscribe(&self, subscription: ClockSubscription) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(id, _)| *id != subscription);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Delivers `now` to the subscribers registered when the call started.
    /// Returns how many callbacks ran.
    pub(crate) fn deliver(&self, now: Timestamp) -> usize {
        let ids: Vec<ClockSubscription> = self.entries.borrow().iter().map(|(id, _)| *id).collect();

        let mut delivered = 0;
        for id in ids {
            let Some(mut callback) = self.take(id) else {
                continue;
            };

            callback(now);
            delivered += 1;

            // Put it back unless it was unsubscribed while running.
            let mut entries = self.entries.borrow_mut();
            if let Some((_, slot)) = entries.iter_mut().find(|(eid, _)| *eid == id) {
                *slot = Some(callback);
            }
        }
        delivered
    }

    fn take(&self, id: ClockSubscription) -> Option<TickCallback> {
        self.entries
            .borrow_mut()
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .and_then(|(_, slot)| slot.take())
    }
}
