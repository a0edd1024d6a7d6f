use std::time::{Duration, Instant};

/// Largest value the clock display shows, 99:59.
const MAX_CLOCK_SECS: u64 = 99 * 60 + 59;

/// Measures the time between the first move and the end of a game.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stopwatch {
    start: Option<Instant>,
    stop: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the stopwatch unless it has already been started.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub(crate) fn start_at(&mut self, now: Instant) {
        if self.start.is_none() {
            self.start = Some(now);
        }
    }

    pub(crate) fn stop_at(&mut self, now: Instant) {
        if self.is_running() {
            self.stop = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.stop.is_none()
    }

    pub fn elapsed(&self) -> Duration {
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => stop.saturating_duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Formats a running clock as `MM:SS`, holding at 99:59.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs().min(MAX_CLOCK_SECS);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Formats a record time as `Xmin Ys`.
pub fn format_record_time(millis: u64) -> String {
    format!("{}min {}s", millis / 1000 / 60, millis / 1000 % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_stopwatch() {
        let watch = Stopwatch::new();
        assert!(!watch.is_running());
        assert_eq!(watch.elapsed_millis(), 0);
    }

    #[test]
    fn test_measures_between_start_and_stop() {
        let t0 = Instant::now();
        let mut watch = Stopwatch::new();
        watch.start_at(t0);
        assert!(watch.is_running());

        // a second start keeps the first instant
        watch.start_at(t0 + Duration::from_millis(300));
        watch.stop_at(t0 + Duration::from_millis(1500));
        assert!(!watch.is_running());
        assert_eq!(watch.elapsed_millis(), 1500);

        // stopping again does not move the end
        watch.stop_at(t0 + Duration::from_secs(10));
        assert_eq!(watch.elapsed_millis(), 1500);
    }

    #[test]
    fn test_stop_without_start() {
        let mut watch = Stopwatch::new();
        watch.stop();
        assert_eq!(watch.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_clock(Duration::from_millis(65_900)), "01:05");
        assert_eq!(format_clock(Duration::from_secs(200 * 60)), "99:59");
        assert_eq!(format_record_time(125_400), "2min 5s");
        assert_eq!(format_record_time(0), "0min 0s");
    }
}
