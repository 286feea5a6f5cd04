use std::time::Duration;
use std::time::Instant;

/// Tracks delta time between frames and total running time, excluding
/// the time spent paused.
#[derive(Debug, Clone)]
pub struct GameTimer {
    base_time: Instant,
    paused_time: Duration,
    stop_time: Option<Instant>,
    prev_time: Instant,
    current_time: Instant,
    delta_time: Duration,
}

impl Default for GameTimer {
    fn default() -> Self {
        Self::new_at(Instant::now())
    }
}

impl GameTimer {
    pub fn new_at(now: Instant) -> Self {
        Self {
            base_time: now,
            paused_time: Duration::ZERO,
            stop_time: None,
            prev_time: now,
            current_time: now,
            delta_time: Duration::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        *self = Self::new_at(now);
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Resume after [`Self::stop_at`]; the stopped span is added to the paused total.
    pub fn start_at(&mut self, now: Instant) {
        if let Some(stop_time) = self.stop_time.take() {
            self.paused_time += now.saturating_duration_since(stop_time);
            self.prev_time = now;
        }
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn stop_at(&mut self, now: Instant) {
        if self.stop_time.is_none() {
            self.stop_time = Some(now);
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self.stop_time.is_some() {
            self.delta_time = Duration::ZERO;
            return;
        }
        self.current_time = now;
        self.delta_time = self.current_time.saturating_duration_since(self.prev_time);
        self.prev_time = self.current_time;
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_time.is_some()
    }

    /// Seconds between the last two ticks.
    pub fn delta_time(&self) -> f32 {
        self.delta_time.as_secs_f32()
    }

    /// Seconds since the last reset, not counting paused time.
    pub fn total_time(&self) -> f32 {
        let end = self.stop_time.unwrap_or(self.current_time);
        end.saturating_duration_since(self.base_time)
            .saturating_sub(self.paused_time)
            .as_secs_f32()
    }
}

/// Frames per second and milliseconds per frame averaged over one second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStatsReport {
    pub fps: u32,
    pub mspf: f32,
}

impl FrameStatsReport {
    pub fn window_text(&self) -> String {
        format!("fps: {}   mspf: {:.3}", self.fps, self.mspf)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_count: u32,
    time_elapsed: f32,
}

impl FrameStats {
    /// Count one frame; returns a report once a second of total time has passed.
    pub fn frame(&mut self, total_time: f32) -> Option<FrameStatsReport> {
        self.frame_count += 1;
        if total_time - self.time_elapsed < 1.0 {
            return None;
        }
        let fps = self.frame_count;
        let report = FrameStatsReport {
            fps,
            mspf: 1000.0 / fps as f32,
        };
        self.frame_count = 0;
        self.time_elapsed += 1.0;
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn tick_measures_delta_between_frames() {
        let start = Instant::now();
        let mut timer = GameTimer::new_at(start);
        timer.tick_at(start + ms(16));
        assert!((timer.delta_time() - 0.016).abs() < 1e-6);
        timer.tick_at(start + ms(50));
        assert!((timer.delta_time() - 0.034).abs() < 1e-6);
        assert!((timer.total_time() - 0.050).abs() < 1e-6);
    }

    #[test]
    fn paused_time_is_excluded_from_total() {
        let start = Instant::now();
        let mut timer = GameTimer::new_at(start);
        timer.tick_at(start + ms(100));
        timer.stop_at(start + ms(100));
        assert!(timer.is_stopped());

        timer.tick_at(start + ms(400));
        assert_eq!(timer.delta_time(), 0.0);
        assert!((timer.total_time() - 0.1).abs() < 1e-6);

        timer.start_at(start + ms(600));
        timer.tick_at(start + ms(700));
        assert!((timer.delta_time() - 0.1).abs() < 1e-6);
        assert!((timer.total_time() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn stop_and_start_are_idempotent() {
        let start = Instant::now();
        let mut timer = GameTimer::new_at(start);
        timer.start_at(start + ms(10));
        timer.stop_at(start + ms(20));
        timer.stop_at(start + ms(30));
        timer.start_at(start + ms(40));
        timer.tick_at(start + ms(50));
        // 20ms paused, 30ms running
        assert!((timer.total_time() - 0.030).abs() < 1e-6);
    }

    #[test]
    fn frame_stats_report_once_per_second() {
        let mut stats = FrameStats::default();
        for frame in 1..60 {
            assert_eq!(stats.frame(frame as f32 / 60.0), None);
        }
        let report = stats.frame(1.0).expect("a report after one second");
        assert_eq!(report.fps, 60);
        assert!((report.mspf - 16.666_666).abs() < 1e-3);
        assert_eq!(report.window_text(), "fps: 60   mspf: 16.667");
        assert_eq!(stats.frame(1.5), None);
    }
}
