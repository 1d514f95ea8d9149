//! Start/stop lifecycle.
//!
//! `FpsCounter` binds a `MeasurementWindow` to a `FrameClock` and fans its
//! reports out to subscribers. All of it lives on one execution context: the
//! types are `!Send`, so ticks, `start`, and `stop` must be marshaled onto the
//! thread that owns the counter.

mod controller;
mod state;

pub use controller::{CounterHandle, FpsCounter};
pub use state::LifecycleState;
