// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval polling with a deadline.
//!
//! Every waiter in the crate is built on [`poll_until`]: the check runs once
//! immediately, then once per interval, until it reports a value, fails, or
//! the deadline passes.

pub mod condition;
pub mod existence;

pub use condition::{check_condition, wait_for_condition, ConditionCheck, ConditionExpectation, Observation};
pub use existence::{wait_for_absence, wait_for_presence, Presence};

use crate::constants::poll;
use crate::error::{E2eError, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// What a waiter does when fetching the watched resource fails with
/// anything other than not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchErrorPolicy {
    /// Treat the failure as "not yet" and keep polling until the deadline.
    #[default]
    Retry,
    /// Return the error immediately.
    FailFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub fetch_errors: FetchErrorPolicy,
}

impl PollSettings {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            fetch_errors: FetchErrorPolicy::Retry,
        }
    }

    pub fn fail_fast(mut self) -> Self {
        self.fetch_errors = FetchErrorPolicy::FailFast;
        self
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::new(poll::INTERVAL, poll::TIMEOUT)
    }
}

/// Result of a single poll tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep<T> {
    Ready(T),
    /// Not there yet; carries a description of what was observed.
    Pending(String),
}

/// Run `check` until it returns [`PollStep::Ready`] or an error, or until
/// `settings.timeout` elapses. The full window is always used: the last check
/// runs at the deadline even when that is less than an interval away.
///
/// On timeout the error names `description` and the last pending
/// observation. Errors from `check` are returned as-is without retrying;
/// checks that want to tolerate an error should map it to `Pending`.
pub async fn poll_until<T, F, Fut>(description: &str, settings: &PollSettings, mut check: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStep<T>>>,
{
    let start = Instant::now();
    let deadline = start + settings.timeout;
    let mut ticks = 0u32;

    loop {
        ticks += 1;
        let observed = match check().await? {
            PollStep::Ready(value) => {
                debug!("{} satisfied after {} tick(s) in {:?}", description, ticks, start.elapsed());
                return Ok(value);
            }
            PollStep::Pending(observed) => observed,
        };
        trace!("{} not yet satisfied: {}", description, observed);

        let now = Instant::now();
        if now >= deadline {
            return Err(E2eError::PollTimeout {
                description: description.to_string(),
                observed,
                elapsed: start.elapsed(),
            });
        }

        // The last sleep is cut short so one final check lands on the deadline.
        tokio::time::sleep(settings.interval.min(deadline - now)).await;
    }
}
