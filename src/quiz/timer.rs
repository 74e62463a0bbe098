use std::time::{Duration, Instant};

/// One-shot deadline that the owner polls from its tick handler.
///
/// Nothing fires on its own: the engine checks `take_due` on every tick, so
/// cancelling is just clearing the deadline.
#[derive(Debug, Default, Clone)]
pub struct AdvanceTimer {
    deadline: Option<Instant>,
}

impl AdvanceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Clears the deadline and returns true once it has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
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
    fn fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = AdvanceTimer::new();
        timer.schedule(start, Duration::from_secs(2));

        assert!(timer.is_pending());
        assert!(!timer.take_due(start + Duration::from_millis(1999)));
        assert!(timer.take_due(start + Duration::from_secs(2)));
        assert!(!timer.take_due(start + Duration::from_secs(3)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn cancel_prevents_firing() {
        let start = Instant::now();
        let mut timer = AdvanceTimer::new();
        timer.schedule(start, Duration::from_secs(2));
        timer.cancel();

        assert!(!timer.take_due(start + Duration::from_secs(10)));
        assert_eq!(timer.remaining(start), None);
    }

    #[test]
    fn remaining_saturates() {
        let start = Instant::now();
        let mut timer = AdvanceTimer::new();
        timer.schedule(start, Duration::from_millis(500));

        assert_eq!(timer.remaining(start), Some(Duration::from_millis(500)));
        assert_eq!(
            timer.remaining(start + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }
}
