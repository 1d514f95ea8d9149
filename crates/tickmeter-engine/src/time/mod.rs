//! Time subsystem.
//!
//! Frame clock sources that feed tick timestamps to the counter without
//! coupling it to a particular host loop.
//! Intended usage:
//! - a `ManualClock` when the host already owns a render loop and can call
//!   `tick()` once per presented frame
//! - a `TimerClock` on hosts without a display-synchronized callback

mod frame_clock;
mod manual;
mod timer;
mod timestamp;

pub use frame_clock::{ClockError, ClockSubscription, FrameClock, TickCallback};
pub use manual::ManualClock;
pub use timer::{FrameControl, FrameTime, TimerClock};
pub use timestamp::Timestamp;
