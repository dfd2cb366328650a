// sgnl-client/src/retry.rs
// ============================================================================
// Module: SGNL Retry Policy
// Description: Bounded retry with jittered delay for transient failures.
// Purpose: Retry network and timeout failures only, never auth or decisions.
// Dependencies: rand, sgnl-core
// ============================================================================

//! ## Overview
//! The retry policy performs up to `retry_count` additional attempts after a
//! retryable failure, separated by `retry_delay_ms` with ±25% jitter. Only
//! transport-level failures (network, timeout) are retryable; authentication
//! failures and decision responses surface immediately. The default policy
//! performs exactly one attempt, so callers see no hidden retry unless they
//! opt in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;

use rand::Rng;
use sgnl_core::LogContext;
use sgnl_core::LogLevel;
use sgnl_core::sgnl_log;

use crate::error::ClientError;

// ============================================================================
// SECTION: Retry Policy
// ============================================================================

/// Default delay between attempts in milliseconds.
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Bounded retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retry_count: u32,
    /// Base delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 0,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Runs the operation under the policy.
    ///
    /// # Errors
    ///
    /// Returns the final [`ClientError`] once attempts are exhausted or the
    /// failure is not retryable.
    pub fn run<T>(
        &self,
        ctx: &LogContext<'_>,
        mut operation: impl FnMut() -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut attempt = 0;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retry_count => {
                    attempt += 1;
                    let delay = jittered_delay(self.retry_delay_ms);
                    sgnl_log!(
                        LogLevel::Debug,
                        ctx,
                        "retrying after {err} (attempt {}/{}, delay {}ms)",
                        attempt + 1,
                        self.retry_count + 1,
                        delay.as_millis()
                    );
                    thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Applies ±25% jitter to the base delay.
fn jittered_delay(base_ms: u64) -> Duration {
    if base_ms == 0 {
        return Duration::ZERO;
    }
    let factor = rand::thread_rng().gen_range(75..=125);
    Duration::from_millis(base_ms.saturating_mul(factor) / 100)
}
