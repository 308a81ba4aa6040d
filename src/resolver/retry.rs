// Retry helpers shared by the resolvers and the catalog handle

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Bounded retry with exponential or fixed spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before retry `n` is `unit * base^n`; a base of 1 gives fixed pauses
    pub base: u32,
    pub unit: Duration,
    /// Scale each delay by a random factor in [0.5, 1.5)
    pub jitter: bool,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3)
    }
}

impl RetryPolicy {
    /// `2^attempt` seconds between attempts
    pub fn exponential(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base: 2,
            unit: Duration::from_secs(1),
            jitter: false,
            max_delay: Duration::from_secs(30),
        }
    }

    pub fn fixed(max_attempts: u32, pause: Duration) -> Self {
        Self {
            max_attempts,
            base: 1,
            unit: pause,
            jitter: false,
            max_delay: pause,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Same attempt count, no waiting
    pub fn without_delay(mut self) -> Self {
        self.unit = Duration::ZERO;
        self.max_delay = Duration::ZERO;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Pause after the failed attempt number `attempt` (zero based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.base.max(1).saturating_pow(attempt);
        let delay = self.unit.saturating_mul(factor).min(self.max_delay);

        if self.jitter && !delay.is_zero() {
            let scale: f64 = rand::rng().random_range(0.5..1.5);
            delay.mul_f64(scale)
        } else {
            delay
        }
    }

    /// Run `op` until it succeeds or attempts run out; returns the last error
    pub async fn retry<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.attempts();
        let mut attempt = 0;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= attempts => return Err(e),
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    debug!(
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "[Retry] {} failed, retrying",
                        label
                    );
                    sleep(delay).await;
                }
            }
            attempt += 1;
        }
    }

    /// Like [`retry`](Self::retry) for operations that report failure as `None`
    pub async fn retry_until_some<T, F, Fut>(&self, label: &str, mut op: F) -> Option<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let attempts = self.attempts();

        for attempt in 0..attempts {
            if let Some(value) = op(attempt).await {
                return Some(value);
            }
            if attempt + 1 < attempts {
                let delay = self.delay_for(attempt);
                debug!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    "[Retry] {} returned nothing, retrying",
                    label
                );
                sleep(delay).await;
            }
        }

        None
    }
}

/// Sleep for a uniform random duration in `[min, max]`
pub async fn random_delay(min: Duration, max: Duration) {
    let delay = if max > min {
        rand::rng().random_range(min..=max)
    } else {
        min
    };

    if !delay.is_zero() {
        sleep(delay).await;
    }
}
