//! Input-boundary debouncing for search keystrokes.
//!
//! The projection engine is never debounced itself; only the value fed into
//! it is. Each keystroke pushes the latest value and pushes the deadline
//! back, and the value is released once input has been quiet for the
//! configured window.

use std::time::Duration;

use tokio::time::Instant;

/// Recommended window bounds for search input.
pub const MIN_SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);
pub const MAX_SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

/// Holds the latest pending value until the input goes quiet.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Debouncer for search input, with the window clamped into 250-350 ms.
    pub fn for_search(window: Duration) -> Self {
        Self::new(window.clamp(MIN_SEARCH_DEBOUNCE, MAX_SEARCH_DEBOUNCE))
    }

    /// Record a new value; replaces any pending one and restarts the window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// When the pending value will be released, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Release the pending value if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now >= deadline { self.flush() } else { None }
    }

    /// Release the pending value immediately (e.g. on Enter).
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_window_is_clamped() {
        let start = Instant::now();
        let deadline = |window: Duration| {
            let mut debouncer = Debouncer::for_search(window);
            debouncer.push("q", start);
            debouncer.deadline()
        };

        assert_eq!(deadline(Duration::from_millis(10)), Some(start + MIN_SEARCH_DEBOUNCE));
        assert_eq!(deadline(Duration::from_secs(2)), Some(start + MAX_SEARCH_DEBOUNCE));
        assert_eq!(
            deadline(Duration::from_millis(300)),
            Some(start + Duration::from_millis(300))
        );
    }

    #[test]
    fn test_poll_waits_for_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.push("q", start);
        debouncer.push("qu", start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(400)),
            Some("qu")
        );
        assert!(debouncer.deadline().is_none());
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_flush_releases_immediately() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push(1, Instant::now());
        assert_eq!(debouncer.flush(), Some(1));
        assert_eq!(debouncer.flush(), None);
    }
}
