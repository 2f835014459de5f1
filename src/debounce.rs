use std::time::{Duration, Instant};

use tracing::trace;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Coalesces bursts of values into one, emitted after a quiet period.
///
/// Each `push` restarts the timer. The caller polls with the current time from its event
/// loop; nothing runs in the background. A value equal to the last emitted one is dropped.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    pending: Option<(T, Instant)>,
    last_emitted: Option<T>,
}

impl<T: PartialEq + Clone> Debouncer<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Debouncer {
            quiet_period,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .map(|(_, pushed_at)| *pushed_at + self.quiet_period)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_ref() == Some(&value) {
            trace!("Debounced value unchanged, dropped");
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}

impl<T: PartialEq + Clone> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn emits_after_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.push("a".to_string(), t0);
        assert_eq!(debouncer.poll(t0 + ms(499)), None);
        assert_eq!(debouncer.poll(t0 + ms(500)), Some("a".to_string()));
        assert_eq!(debouncer.poll(t0 + ms(1000)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn new_input_restarts_the_timer() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.push("a", t0);
        debouncer.push("am", t0 + ms(300));
        assert_eq!(debouncer.poll(t0 + ms(600)), None);
        debouncer.push("amy", t0 + ms(700));
        assert_eq!(debouncer.deadline(), Some(t0 + ms(1200)));
        assert_eq!(debouncer.poll(t0 + ms(1199)), None);
        assert_eq!(debouncer.poll(t0 + ms(1200)), Some("amy"));
    }

    #[test]
    fn unchanged_values_are_suppressed() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.push("amy", t0);
        assert_eq!(debouncer.poll(t0 + ms(500)), Some("amy"));

        // typed and deleted a character within the quiet period
        debouncer.push("amyx", t0 + ms(600));
        debouncer.push("amy", t0 + ms(700));
        assert_eq!(debouncer.poll(t0 + ms(1200)), None);
        assert!(!debouncer.is_pending());

        debouncer.push("bob", t0 + ms(1300));
        assert_eq!(debouncer.poll(t0 + ms(1800)), Some("bob"));
        debouncer.push("amy", t0 + ms(1900));
        assert_eq!(debouncer.poll(t0 + ms(2400)), Some("amy"));
    }

    #[test]
    fn first_value_is_always_emitted() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.push("", t0);
        assert_eq!(debouncer.poll(t0 + ms(500)), Some(""));
    }

    #[test]
    fn cancel_drops_the_pending_value() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));
        debouncer.push(1, t0);
        debouncer.cancel();
        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.poll(t0 + ms(500)), None);
    }
}
