use web_time::{Duration, Instant};

/// Interval between FPS reports.
const REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Minimum frame duration for a target rate; zero means unlimited.
#[must_use]
pub fn min_frame_duration(target_fps: u32) -> Duration {
    if target_fps > 0 {
        Duration::from_secs_f64(1.0 / f64::from(target_fps))
    } else {
        Duration::ZERO
    }
}

/// Frame pacing with a smoothed FPS estimate.
pub struct FrameTiming {
    min_frame_duration: Duration,
    last_frame: Instant,
    last_report: Instant,
    smoothed_fps: f32,
    /// Weight of the newest sample (0.0-1.0).
    smoothing: f32,
    frames: u64,
    log_fps: bool,
}

impl FrameTiming {
    /// Create a timer limited to `target_fps` (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            min_frame_duration: min_frame_duration(target_fps),
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
            log_fps: false,
        }
    }

    /// Change the frame limit.
    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.min_frame_duration = min_frame_duration(target_fps);
    }

    /// Enable or disable the periodic FPS report.
    pub fn set_log_fps(&mut self, enabled: bool) {
        self.log_fps = enabled;
    }

    /// Whether enough time has passed since the last frame to draw another.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Mark the end of a frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.record(elapsed);

        if self.report_due(now) {
            log::debug!(
                "{:.1} fps ({} frames)",
                self.smoothed_fps,
                self.frames
            );
        }
    }

    /// Whether an FPS report should go out at `now`; restarts the interval
    /// when it does.
    fn report_due(&mut self, now: Instant) -> bool {
        if !self.log_fps || now.duration_since(self.last_report) < REPORT_INTERVAL {
            return false;
        }
        self.last_report = now;
        true
    }

    /// Fold one frame duration into the running average.
    fn record(&mut self, elapsed: Duration) {
        self.frames += 1;
        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Smoothed FPS.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames recorded so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_has_no_minimum() {
        assert_eq!(min_frame_duration(0), Duration::ZERO);
        assert!(FrameTiming::new(0).should_render());
    }

    #[test]
    fn limit_converts_to_period() {
        let d = min_frame_duration(50);
        assert!((d.as_secs_f64() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn average_moves_toward_samples() {
        let mut t = FrameTiming::new(0);
        for _ in 0..400 {
            t.record(Duration::from_millis(10));
        }
        assert!((t.fps() - 100.0).abs() < 1.0);
        assert_eq!(t.frame_count(), 400);
    }

    #[test]
    fn fps_report_follows_option_and_interval() {
        let mut t = FrameTiming::new(0);
        let later = t.last_report + REPORT_INTERVAL;
        assert!(!t.report_due(later));

        t.set_log_fps(true);
        assert!(!t.report_due(later - Duration::from_millis(1)));
        assert!(t.report_due(later));
        // Interval restarts from the last report.
        assert!(!t.report_due(later + Duration::from_secs(1)));
        assert!(t.report_due(later + REPORT_INTERVAL));
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut t = FrameTiming::new(0);
        t.record(Duration::ZERO);
        assert_eq!(t.fps(), 60.0);
        assert_eq!(t.frame_count(), 1);
    }
}
