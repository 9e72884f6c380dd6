use std::time::Duration;

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Exponential reconnect delays: 2s, 4s, 8s, ... up to a
/// fixed number of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    attempt: u32,
    max_attempts: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(MAX_RECONNECT_ATTEMPTS)
    }
}

impl Backoff {
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// Delay before the next attempt or `None` if all attempts
    /// have been used up.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        self.attempt += 1;
        Some(Duration::from_secs(1 << self.attempt))
    }

    pub const fn attempts(&self) -> u32 {
        self.attempt
    }

    pub const fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_until_exhausted() {
        let mut backoff = Backoff::default();
        let delays: Vec<_> = std::iter::from_fn(|| backoff.next_delay())
            .map(|d| d.as_secs())
            .collect();
        assert_eq!(delays, vec![2, 4, 8, 16, 32]);
        assert!(backoff.is_exhausted());
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn reset_starts_over() {
        let mut backoff = Backoff::default();
        backoff.next_delay();
        backoff.next_delay();
        assert_eq!(backoff.attempts(), 2);
        backoff.reset();
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(2)));
    }
}
