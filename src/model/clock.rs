use std::time::{Duration, Instant};

/// Cadence for the orbit animation. Arming it makes the first step due at
/// once, with every `period` after that; disarming cancels any pending step
/// outright.
pub struct OrbitTicker {
    period: Duration,
    deadline: Option<Instant>,
}

impl OrbitTicker {
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "ticker period must be positive");
        OrbitTicker {
            period,
            deadline: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    // Takes effect from the next deadline; the pending one stands.
    pub fn set_period(&mut self, period: Duration) {
        assert!(!period.is_zero(), "ticker period must be positive");
        self.period = period;
    }

    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Number of steps that have come due by `now`. A slow frame yields all
    /// the steps it missed in one batch, in order, never in parallel.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let deadline = match self.deadline.as_mut() {
            Some(deadline) => deadline,
            None => return 0,
        };
        let mut steps = 0;
        while *deadline <= now {
            *deadline += self.period;
            steps += 1;
        }
        steps
    }
}

/// Counts rendered frames and closes a reporting window once per second.
pub struct FpsMeter {
    window_start: Instant,
    frames: u32,
    previous: u32,
}

const REPORT_WINDOW: Duration = Duration::from_secs(1);

impl FpsMeter {
    pub fn new(now: Instant) -> Self {
        FpsMeter {
            window_start: now,
            frames: 0,
            previous: 0,
        }
    }

    /// Most recent closed-window count, for display. Zero until the first
    /// window closes.
    pub fn previous(&self) -> u32 {
        self.previous
    }

    /// Counts one frame. Once a full second has elapsed this yields the
    /// count of the window just closed and starts a fresh one at zero.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.window_start) < REPORT_WINDOW {
            return None;
        }
        let report = self.frames;
        self.previous = report;
        self.frames = 0;
        self.window_start = now;
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_unarmed_ticker_never_fires() {
        let t0 = Instant::now();
        let mut ticker = OrbitTicker::new(100 * MS);
        assert_eq!(ticker.poll(t0), 0);
        assert_eq!(ticker.poll(t0 + Duration::from_secs(60)), 0);
        assert!(!ticker.is_running());
    }

    #[test]
    fn test_first_step_is_immediate() {
        let t0 = Instant::now();
        let mut ticker = OrbitTicker::new(100 * MS);
        ticker.start(t0);
        assert_eq!(ticker.poll(t0), 1);
        assert_eq!(ticker.poll(t0 + 50 * MS), 0);
        assert_eq!(ticker.poll(t0 + 150 * MS), 1);
    }

    #[test]
    fn test_slow_frame_delivers_backlog() {
        let t0 = Instant::now();
        let mut ticker = OrbitTicker::new(100 * MS);
        ticker.start(t0);
        assert_eq!(ticker.poll(t0), 1);
        // Next deadlines: +100, +200, +300.
        assert_eq!(ticker.poll(t0 + 350 * MS), 3);
        assert_eq!(ticker.poll(t0 + 399 * MS), 0);
    }

    #[test]
    fn test_stop_cancels_pending_step() {
        let t0 = Instant::now();
        let mut ticker = OrbitTicker::new(100 * MS);
        ticker.start(t0);
        assert_eq!(ticker.poll(t0), 1);
        ticker.stop();
        assert_eq!(ticker.poll(t0 + Duration::from_secs(60)), 0);
    }

    #[test]
    fn test_restart_arms_from_now_not_the_stale_deadline() {
        let t0 = Instant::now();
        let mut ticker = OrbitTicker::new(100 * MS);
        ticker.start(t0);
        assert_eq!(ticker.poll(t0), 1);
        ticker.stop();

        let t1 = t0 + Duration::from_secs(5);
        ticker.start(t1);
        // One immediate step, not a five second backlog.
        assert_eq!(ticker.poll(t1), 1);
    }

    #[test]
    fn test_period_change_applies_from_next_deadline() {
        let t0 = Instant::now();
        let mut ticker = OrbitTicker::new(100 * MS);
        ticker.start(t0);
        assert_eq!(ticker.poll(t0), 1);
        ticker.set_period(50 * MS);
        // The pending deadline at +100 stands, then the new period kicks in.
        assert_eq!(ticker.poll(t0 + 99 * MS), 0);
        assert_eq!(ticker.poll(t0 + 100 * MS), 1);
        assert_eq!(ticker.poll(t0 + 200 * MS), 2);
    }

    #[test]
    fn test_meter_reports_once_per_second() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::new(t0);
        assert_eq!(meter.frame(t0 + 500 * MS), None);
        assert_eq!(meter.frame(t0 + 999 * MS), None);
        assert_eq!(meter.frame(t0 + 1000 * MS), Some(3));
        assert_eq!(meter.previous(), 3);
    }

    #[test]
    fn test_meter_resets_after_report() {
        let t0 = Instant::now();
        let mut meter = FpsMeter::new(t0);
        assert_eq!(meter.frame(t0 + 1000 * MS), Some(1));
        assert_eq!(meter.frame(t0 + 1500 * MS), None);
        assert_eq!(meter.frame(t0 + 2000 * MS), Some(2));
        assert_eq!(meter.previous(), 2);
    }
}
