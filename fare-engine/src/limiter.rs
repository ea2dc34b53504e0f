//! Token-bucket rate limiter for outbound API calls.
//!
//! The remote pricing API allows a fixed number of requests per second.
//! `take` hands out send slots spaced one interval apart; callers block
//! (suspend) until their slot arrives, so the outbound request rate never
//! exceeds the configured ceiling no matter how many tasks share the
//! limiter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Shared fixed-rate limiter. Cloning shares the same bucket.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// A limiter allowing `rps` requests per second.
    pub fn per_second(rps: u32) -> Self {
        assert!(rps > 0, "rate must allow at least one request per second");
        Self {
            interval: Duration::from_secs(1) / rps,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until the next request slot is available.
    ///
    /// The first call returns immediately; subsequent calls are spaced at
    /// least one interval apart, including across concurrent callers.
    pub async fn take(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_take_is_immediate() {
        let limiter = RateLimiter::per_second(1);
        let before = Instant::now();
        limiter.take().await;
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn takes_are_spaced_by_interval() {
        let limiter = RateLimiter::per_second(2);
        let start = Instant::now();

        limiter.take().await;
        limiter.take().await;
        limiter.take().await;

        // Three takes at 2/s: slots at 0ms, 500ms, 1000ms.
        assert_eq!(Instant::now() - start, Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_the_bucket() {
        let limiter = RateLimiter::per_second(1);
        let clone = limiter.clone();
        let start = Instant::now();

        limiter.take().await;
        clone.take().await;

        assert_eq!(Instant::now() - start, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_are_serialized() {
        let limiter = RateLimiter::per_second(4);
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move { limiter.take().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Four slots at 4/s: the last is 750ms after the first.
        assert_eq!(Instant::now() - start, Duration::from_millis(750));
    }
}
