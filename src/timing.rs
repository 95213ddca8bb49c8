//! Delays and silence budgets shared by the login and reboot flows.

use std::time::Duration;

/// Every wait the state machines perform.
///
/// The defaults are tuned for Linux consoles on a 115200 baud line. Tests
/// and slow devices override individual fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    /// Pause after a write before the console is read again.
    pub settle: Duration,
    /// Pause after interrupting a stale password prompt.
    pub interrupt_reset: Duration,
    /// Pause after `logout` before new credentials are typed.
    pub logout_wait: Duration,
    /// Upper bound on a single line read; one hang cycle. Also the quiet
    /// period that ends a buffered read.
    pub read_timeout: Duration,
    /// Upper bound on one buffered read against a console that never goes quiet.
    pub collect_limit: Duration,
    /// Consecutive empty reads tolerated before giving up.
    pub hang_budget: u32,
    /// Silent cycle at which the boot-output notice is emitted.
    pub boot_notice_at: u32,
    /// First silent cycle that emits a no-response warning.
    pub silence_warn_from: u32,
    /// Spacing of no-response warnings after `silence_warn_from`.
    pub silence_warn_every: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            interrupt_reset: Duration::from_secs(5),
            logout_wait: Duration::from_secs(2),
            read_timeout: Duration::from_secs(1),
            collect_limit: Duration::from_secs(5),
            hang_budget: 60,
            boot_notice_at: 5,
            silence_warn_from: 30,
            silence_warn_every: 5,
        }
    }
}

impl Timing {
    /// Whether a silent cycle count should produce a no-response warning.
    pub fn is_silence_milestone(&self, count: u32) -> bool {
        count == self.silence_warn_from
            || (count > self.silence_warn_from
                && self.silence_warn_every > 0
                && count % self.silence_warn_every == 0)
    }
}

/// Counts consecutive read cycles that returned nothing.
///
/// Lives for one flow invocation only. A non-empty read resets it to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HangCounter {
    count: u32,
    budget: u32,
}

impl HangCounter {
    pub fn new(budget: u32) -> Self {
        Self { count: 0, budget }
    }

    /// Record the result of one read cycle and return the new count.
    pub fn observe(&mut self, line: &[u8]) -> u32 {
        if line.is_empty() {
            self.tick()
        } else {
            self.reset();
            0
        }
    }

    pub fn tick(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn exhausted(&self) -> bool {
        self.count >= self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = Timing::default();
        assert_eq!(timing.settle, Duration::from_millis(500));
        assert_eq!(timing.interrupt_reset, Duration::from_secs(5));
        assert_eq!(timing.logout_wait, Duration::from_secs(2));
        assert_eq!(timing.hang_budget, 60);
        assert!(timing.collect_limit > timing.read_timeout);
    }

    #[test]
    fn test_silence_milestones() {
        let timing = Timing::default();
        let hits: Vec<u32> = (1..=60).filter(|n| timing.is_silence_milestone(*n)).collect();
        assert_eq!(hits, vec![30, 35, 40, 45, 50, 55, 60]);
    }

    #[test]
    fn test_hang_counter_resets_on_data() {
        let mut hang = HangCounter::new(3);
        assert_eq!(hang.observe(b""), 1);
        assert_eq!(hang.observe(b""), 2);
        assert_eq!(hang.observe(b"booting\n"), 0);
        assert_eq!(hang.count(), 0);
        assert!(!hang.exhausted());
    }

    #[test]
    fn test_hang_counter_exhausts_at_budget() {
        let mut hang = HangCounter::new(3);
        for _ in 0..3 {
            hang.tick();
        }
        assert!(hang.exhausted());
        assert_eq!(hang.budget(), 3);
    }
}
