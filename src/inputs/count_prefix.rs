use std::time::{Duration, Instant};

/// Largest count accepted; further digits are ignored
const MAX_COUNT: usize = 999_999;

/// Numeric prefix typed before a command, as in `12g`.
///
/// The pending number is dropped when no digit arrives within the timeout.
#[derive(Debug)]
pub struct CountPrefix {
    value: Option<usize>,
    last_key_time: Instant,
    timeout: Duration,
}

impl Default for CountPrefix {
    fn default() -> Self {
        Self::new()
    }
}

impl CountPrefix {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(3))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            value: None,
            last_key_time: Instant::now(),
            timeout,
        }
    }

    pub fn push_digit(&mut self, digit: u32) {
        if self.is_expired() {
            self.value = None;
        }
        let next = self
            .value
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(digit as usize);
        if next <= MAX_COUNT {
            self.value = Some(next);
        }
        self.last_key_time = Instant::now();
    }

    /// The number typed so far, if still fresh
    pub fn pending(&self) -> Option<usize> {
        if self.is_expired() { None } else { self.value }
    }

    /// Consume the pending number
    pub fn take(&mut self) -> Option<usize> {
        let value = self.pending();
        self.value = None;
        value
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    pub fn is_expired(&self) -> bool {
        self.value.is_none() || self.last_key_time.elapsed() > self.timeout
    }
}
