use std::time::Duration;

/// Repeating timer advanced by frame time.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    elapsed: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        debug_assert!(!period.is_zero(), "interval period must be positive");
        Self { period, elapsed: Duration::ZERO }
    }

    pub fn remaining(&self) -> Duration {
        self.period.saturating_sub(self.elapsed)
    }

    /// Returns true when the period completes. Steps longer than
    /// [`remaining`](Self::remaining) fire once and carry the surplus over.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.period {
            self.elapsed -= self.period;
            true
        } else {
            false
        }
    }
}

/// One-shot timer carrying the work to do when it expires.
#[derive(Debug, Clone)]
pub struct Timeout<T> {
    remaining: Duration,
    payload: T,
}

impl<T> Timeout<T> {
    pub fn new(delay: Duration, payload: T) -> Self {
        Self { remaining: delay, payload }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    pub fn is_due(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_on_period_boundary() {
        let mut interval = Interval::new(Duration::from_millis(100));
        assert!(!interval.advance(Duration::from_millis(60)));
        assert_eq!(interval.remaining(), Duration::from_millis(40));
        assert!(interval.advance(Duration::from_millis(40)));
        assert_eq!(interval.remaining(), Duration::from_millis(100));
    }

    #[test]
    fn interval_carries_surplus() {
        let mut interval = Interval::new(Duration::from_millis(100));
        assert!(interval.advance(Duration::from_millis(130)));
        assert_eq!(interval.remaining(), Duration::from_millis(70));
    }

    #[test]
    fn timeout_becomes_due() {
        let mut timeout = Timeout::new(Duration::from_millis(350), "swap");
        timeout.advance(Duration::from_millis(349));
        assert!(!timeout.is_due());
        timeout.advance(Duration::from_millis(5));
        assert!(timeout.is_due());
        assert_eq!(timeout.into_payload(), "swap");
    }
}
