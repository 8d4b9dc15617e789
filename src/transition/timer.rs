//! Single cancellable deadline

/// One scheduled task on the transition clock.
///
/// Firing disarms the timer, so a deadline can fire at most once per arm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FailsafeTimer {
    deadline_ms: Option<f64>,
}

impl FailsafeTimer {
    /// Schedule (or reschedule) the deadline `after_ms` from `now_ms`
    pub fn arm(&mut self, now_ms: f64, after_ms: f64) {
        self.deadline_ms = Some(now_ms + after_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline_ms
    }

    /// Milliseconds left before firing, if armed
    pub fn remaining(&self, now_ms: f64) -> Option<f64> {
        self.deadline_ms.map(|d| (d - now_ms).max(0.0))
    }

    /// True (once) when the deadline has been reached
    pub fn fire_if_due(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut timer = FailsafeTimer::default();
        timer.arm(100.0, 1200.0);
        assert!(!timer.fire_if_due(1299.0));
        assert_eq!(timer.remaining(1299.0), Some(1.0));
        assert!(timer.fire_if_due(1300.0));
        assert!(!timer.fire_if_due(5000.0));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let mut timer = FailsafeTimer::default();
        timer.arm(0.0, 10.0);
        timer.cancel();
        assert!(!timer.fire_if_due(100.0));
    }

    #[test]
    fn test_rearm_moves_deadline() {
        let mut timer = FailsafeTimer::default();
        timer.arm(0.0, 1200.0);
        timer.arm(1000.0, 1200.0);
        assert_eq!(timer.deadline(), Some(2200.0));
        assert!(!timer.fire_if_due(1500.0));
    }
}
