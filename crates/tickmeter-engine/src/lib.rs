//! Tickmeter engine crate.
//!
//! Samples frame ticks from a host clock and reports frames per second at a
//! fixed cadence.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`time`] | `FrameClock`, `ManualClock`, `TimerClock`, `Timestamp` |
//! | [`counter`] | `MeasurementWindow`, `ReportingInterval`, `FpsReport` |
//! | [`notify`] | `FpsSubscriber`, `SubscriberList` |
//! | [`lifecycle`] | `FpsCounter`, `CounterHandle`, `LifecycleState` |
//! | [`logging`] | `init_logging` |

pub mod counter;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod time;

pub mod logging;

pub use counter::{FpsReport, ReportingInterval};
pub use error::FpsError;
pub use lifecycle::{FpsCounter, LifecycleState};
pub use notify::FpsSubscriber;
