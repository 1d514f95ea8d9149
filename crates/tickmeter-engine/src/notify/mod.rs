//! Report fan-out.
//!
//! Subscribers are notified synchronously on the tick context, in
//! registration order, with per-subscriber failure isolation.

mod list;
mod subscriber;

pub use list::{Delivery, SubscriberId, SubscriberList};
pub use subscriber::FpsSubscriber;
