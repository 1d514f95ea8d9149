use crate::time::Timestamp;

use super::interval::ReportingInterval;
use super::report::FpsReport;

/// Tick-count accumulator for one reporting window.
///
/// Purely tick-driven: a boundary is only detected when a tick arrives, so a
/// stalled clock yields no report until it resumes.
///
/// After construction or [`reset`](Self::reset) the window is unanchored. The
/// next tick anchors it and is not counted, because it closes no frame
/// interval inside the window. At every boundary the window re-anchors at the
/// boundary tick with a zero count.
#[derive(Debug, Clone)]
pub struct MeasurementWindow {
    interval: ReportingInterval,
    tick_count: u64,
    window_start: Option<Timestamp>,
}

impl MeasurementWindow {
    pub fn new(interval: ReportingInterval) -> Self {
        Self {
            interval,
            tick_count: 0,
            window_start: None,
        }
    }

    pub fn interval(&self) -> ReportingInterval {
        self.interval
    }

    pub fn set_interval(&mut self, interval: ReportingInterval) {
        self.interval = interval;
    }

    /// Ticks counted since the window was anchored.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Anchor of the current window, `None` until the first tick after a reset.
    pub fn window_start(&self) -> Option<Timestamp> {
        self.window_start
    }

    /// Drops the current count and re-anchors on the next tick. Never reports.
    pub fn reset(&mut self) {
        self.tick_count = 0;
        self.window_start = None;
    }

    /// Records one frame tick. Returns a report when `now` crosses the
    /// reporting boundary.
    pub fn record(&mut self, now: Timestamp) -> Option<FpsReport> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };

        let Some(elapsed) = now.checked_since(start) else {
            log::warn!("tick at {now} precedes window start {start}; re-anchoring window");
            self.tick_count = 0;
            self.window_start = Some(now);
            return None;
        };

        self.tick_count = self.tick_count.saturating_add(1);

        // The interval is non-zero, so any crossing has a non-zero elapsed time.
        if elapsed < self.interval.as_duration() {
            return None;
        }

        let rate = (self.tick_count as f64 / elapsed.as_secs_f64()).round();
        let report = FpsReport::new(rate.clamp(0.0, u32::MAX as f64) as u32);
        log::debug!(
            "fps boundary at {now}: {} ticks over {:.3}s -> {}",
            self.tick_count,
            elapsed.as_secs_f64(),
            report.frames_per_second
        );

        self.tick_count = 0;
        self.window_start = Some(now);
        Some(report)
    }
}

impl Default for MeasurementWindow {
    fn default() -> Self {
        Self::new(ReportingInterval::default())
    }
}
