//! FPS measurement.
//!
//! `MeasurementWindow` is the clock-agnostic core: feed it tick timestamps and
//! it yields an `FpsReport` at every reporting boundary. The lifecycle layer
//! wires it to a clock and to subscribers.

mod interval;
mod report;
mod window;

pub use interval::ReportingInterval;
pub use report::FpsReport;
pub use window::MeasurementWindow;
