use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::counter::FpsReport;

use super::subscriber::FpsSubscriber;

type SharedSubscriber = Rc<RefCell<dyn FpsSubscriber>>;

/// Handle returned when registering a subscriber; pass it to `remove`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriberId(u64);

/// Outcome of one `notify` pass.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Delivery {
    /// Subscribers that handled the report without error.
    pub delivered: usize,
    /// Subscribers that returned an error or panicked, in call order.
    pub failed: Vec<SubscriberId>,
    /// Weak registrations dropped because their target no longer exists.
    pub pruned: usize,
}

enum Slot {
    Owned(SharedSubscriber),
    Weak(Weak<RefCell<dyn FpsSubscriber>>),
}

impl Slot {
    fn resolve(&self) -> Option<SharedSubscriber> {
        match self {
            Slot::Owned(s) => Some(s.clone()),
            Slot::Weak(w) => w.upgrade(),
        }
    }
}

/// Ordered subscriber registry.
///
/// Notification runs in registration order. Entries may be added or removed
/// from inside a subscriber callback: removals take effect for the rest of the
/// current pass, additions from the next pass on.
#[derive(Default)]
pub struct SubscriberList {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriberId, Slot)>>,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber the list owns until it is removed.
    pub fn add<S>(&self, subscriber: S) -> SubscriberId
    where
        S: FpsSubscriber + 'static,
    {
        let shared: SharedSubscriber = Rc::new(RefCell::new(subscriber));
        self.push(Slot::Owned(shared))
    }

    /// Registers a subscriber without keeping it alive. Once the last strong
    /// reference is dropped the entry is pruned on the next notify pass.
    pub fn add_weak<S>(&self, subscriber: &Rc<RefCell<S>>) -> SubscriberId
    where
        S: FpsSubscriber + 'static,
    {
        let shared: SharedSubscriber = subscriber.clone();
        self.push(Slot::Weak(Rc::downgrade(&shared)))
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(eid, _)| *eid != id);
        entries.len() != before
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.entries.borrow().iter().any(|(eid, _)| *eid == id)
    }

    /// Registered entries, including weak ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `report` to every registered subscriber exactly once.
    pub fn notify(&self, report: FpsReport) -> Delivery {
        let snapshot: Vec<(SubscriberId, Option<SharedSubscriber>)> = self
            .entries
            .borrow()
            .iter()
            .map(|(id, slot)| (*id, slot.resolve()))
            .collect();

        let mut delivery = Delivery::default();

        let dead: Vec<SubscriberId> = snapshot
            .iter()
            .filter(|(_, s)| s.is_none())
            .map(|(id, _)| *id)
            .collect();
        if !dead.is_empty() {
            self.entries.borrow_mut().retain(|(id, _)| !dead.contains(id));
            delivery.pruned = dead.len();
            log::debug!("pruned {} dropped subscriber(s)", dead.len());
        }

        for (id, subscriber) in snapshot {
            let Some(subscriber) = subscriber else {
                continue;
            };
            if !self.contains(id) {
                continue;
            }

            let Ok(mut target) = subscriber.try_borrow_mut() else {
                log::warn!("subscriber {id:?} is already handling a report; skipped");
                delivery.failed.push(id);
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| target.on_fps_update(report))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(err)) => {
                    log::warn!("subscriber {id:?} failed to handle {report:?}: {err:#}");
                    delivery.failed.push(id);
                }
                Err(payload) => {
                    log::warn!(
                        "subscriber {id:?} panicked handling {report:?}: {}",
                        panic_message(payload.as_ref())
                    );
                    delivery.failed.push(id);
                }
            }
        }

        delivery
    }

    fn push(&self, slot: Slot) -> SubscriberId {
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, slot));
        id
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
