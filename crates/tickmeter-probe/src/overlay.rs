use tickmeter_engine::{FpsReport, FpsSubscriber};

/// Coarse health bucket for a frame rate.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Grade {
    Smooth,
    Choppy,
    Poor,
}

impl Grade {
    pub fn of(report: FpsReport) -> Self {
        match report.frames_per_second {
            45.. => Grade::Smooth,
            30..=44 => Grade::Choppy,
            _ => Grade::Poor,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Grade::Smooth => "smooth",
            Grade::Choppy => "choppy",
            Grade::Poor => "poor",
        }
    }
}

/// Prints every report as a status line.
#[derive(Default)]
pub struct ConsoleOverlay {
    lines: u64,
}

impl ConsoleOverlay {
    pub fn render(report: FpsReport) -> String {
        format!("[{:>6}] {report}", Grade::of(report).tag())
    }
}

impl FpsSubscriber for ConsoleOverlay {
    fn on_fps_update(&mut self, report: FpsReport) -> anyhow::Result<()> {
        self.lines += 1;
        println!("  #{:<3} {}", self.lines, Self::render(report));
        Ok(())
    }
}

/// Running min / max / mean over the reports of one session.
#[derive(Debug, Default, Clone)]
pub struct Summary {
    pub reports: u32,
    pub min: Option<u32>,
    pub max: Option<u32>,
    total: u64,
}

impl Summary {
    pub fn record(&mut self, report: FpsReport) {
        let fps = report.frames_per_second;
        self.reports += 1;
        self.total += u64::from(fps);
        self.min = Some(self.min.map_or(fps, |m| m.min(fps)));
        self.max = Some(self.max.map_or(fps, |m| m.max(fps)));
    }

    pub fn mean(&self) -> Option<f64> {
        (self.reports > 0).then(|| self.total as f64 / f64::from(self.reports))
    }
}
