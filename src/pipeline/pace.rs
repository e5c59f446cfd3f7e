// src/pipeline/pace.rs

//! Adaptive request pacing policy.
//!
//! Keeps the delay between consecutive outbound requests inside a configured
//! window (default 1s..60s). The delay grows when the remote throttles or
//! fails, and decays back toward the floor while requests keep succeeding,
//! so the crawler self-tunes to whatever rate the remote tolerates.
//!
//! The policy only computes durations; sleeping is the caller's job.

use std::time::Duration;

use crate::models::PacingConfig;

/// Classification of one request attempt, as seen by the pacing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Request succeeded promptly
    Success,
    /// Request succeeded but the response took noticeably long
    Slow,
    /// Remote answered HTTP 429
    Throttled,
    /// Network error, timeout, or 5xx
    TransientError,
}

/// Mutable pacing state, owned by the crawl driver.
#[derive(Debug, Clone)]
pub struct RatePolicy {
    min_ms: u64,
    max_ms: u64,
    slow_ms: u64,
    current_ms: u64,
    consecutive_failures: u32,
}

impl RatePolicy {
    pub fn new(pacing: &PacingConfig) -> Self {
        let min_ms = pacing.min_delay_secs.max(1) * 1000;
        let max_ms = (pacing.max_delay_secs * 1000).max(min_ms);
        Self {
            min_ms,
            max_ms,
            slow_ms: (pacing.slow_delay_secs * 1000).clamp(min_ms, max_ms),
            current_ms: min_ms,
            consecutive_failures: 0,
        }
    }

    /// Fold one attempt outcome into the state and return the delay to wait
    /// before the next request. Always within `[min, max]`, never zero.
    pub fn next_delay(&mut self, outcome: AttemptOutcome) -> Duration {
        self.current_ms = match outcome {
            AttemptOutcome::Success => {
                self.consecutive_failures = 0;
                (self.current_ms / 2).max(self.min_ms)
            }
            AttemptOutcome::Slow => {
                self.consecutive_failures = 0;
                self.current_ms.max(self.slow_ms)
            }
            AttemptOutcome::Throttled => {
                self.consecutive_failures += 1;
                // A 429 means we are past the remote's tolerance; back off
                // all the way rather than probing upward.
                self.max_ms
            }
            AttemptOutcome::TransientError => {
                self.consecutive_failures += 1;
                self.current_ms.saturating_mul(2).min(self.max_ms)
            }
        };
        Duration::from_millis(self.current_ms)
    }

    /// The delay that would be waited right now, without mutating state.
    pub fn current_delay(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
