use std::fmt;

/// One FPS measurement, emitted at a reporting boundary.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FpsReport {
    pub frames_per_second: u32,
}

impl FpsReport {
    pub const fn new(frames_per_second: u32) -> Self {
        Self { frames_per_second }
    }

    /// Whole milliseconds per frame. A zero rate is treated as one frame per
    /// second so the result stays finite.
    pub fn frame_time_ms(self) -> u32 {
        1000 / self.frames_per_second.max(1)
    }
}

impl fmt::Display for FpsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} FPS ({} milliseconds per frame)",
            self.frames_per_second,
            self.frame_time_ms()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_time_truncates() {
        assert_eq!(FpsReport::new(60).frame_time_ms(), 16);
        assert_eq!(FpsReport::new(30).frame_time_ms(), 33);
    }

    #[test]
    fn frame_time_of_zero_rate_is_finite() {
        assert_eq!(FpsReport::new(0).frame_time_ms(), 1000);
    }

    #[test]
    fn display_matches_overlay_label() {
        assert_eq!(FpsReport::new(60).to_string(), "60 FPS (16 milliseconds per frame)");
    }
}
