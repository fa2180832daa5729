use std::fmt;
use std::time::Duration;

use tgw_protocol::SendError;

/// Bounded exponential backoff for throttled native requests.
///
/// The delay starts at `initial_delay`, doubles after every refused attempt
/// and never exceeds `max_delay`. The caller's thread sleeps between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            max_attempts: 10,
        }
    }
}

/// All attempts were refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: SendError,
}

impl fmt::Display for RetryExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request abandoned after {} attempts ({})",
            self.attempts, self.last_error
        )
    }
}

impl std::error::Error for RetryExhausted {}

impl RetryPolicy {
    /// No sleeping between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_attempts,
        }
    }

    /// Delay to wait after the `attempt`-th refusal (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Run `attempt` until it succeeds or the budget is spent. Returns the
    /// number of attempts used on success.
    pub fn run<F>(&self, mut attempt: F) -> Result<u32, RetryExhausted>
    where
        F: FnMut() -> Result<(), SendError>,
    {
        let max = self.max_attempts.max(1);
        let mut n = 0;
        loop {
            n += 1;
            match attempt() {
                Ok(()) => return Ok(n),
                Err(e) if n >= max => {
                    return Err(RetryExhausted {
                        attempts: n,
                        last_error: e,
                    })
                }
                Err(e) => {
                    let delay = self.delay_after(n);
                    tracing::warn!(
                        attempt = n,
                        code = e.code,
                        delay_ms = delay.as_millis() as u64,
                        "request throttled, backing off"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }
}
