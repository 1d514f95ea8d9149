use crate::counter::FpsReport;

/// Receiver of FPS reports.
///
/// Called once per reporting boundary, synchronously on the tick context.
/// Returning `Err` (or panicking) is logged and isolated; later subscribers
/// still receive the report and the failing one stays registered.
pub trait FpsSubscriber {
    fn on_fps_update(&mut self, report: FpsReport) -> anyhow::Result<()>;
}

impl<F> FpsSubscriber for F
where
    F: FnMut(FpsReport),
{
    fn on_fps_update(&mut self, report: FpsReport) -> anyhow::Result<()> {
        self(report);
        Ok(())
    }
}
