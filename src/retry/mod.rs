//! Retrying a failing scalar.
//!
//! [`Retry`] re-invokes its inner scalar until it succeeds or the exit
//! condition says to stop, optionally sleeping between attempts.
//!
//! - **Exit condition**: evaluated *before* each attempt with the zero-based
//!   attempt number. [`Attempts`] covers the common "at most n tries" case.
//! - **Backoff**: how long to sleep after a failed attempt. [`Backoff`] is pure
//!   data; the default is no delay.
//! - **Cancellation**: a [`Error::Cancelled`] failure (or an interrupted sleep)
//!   is never retried. The cancellation is re-asserted on the current thread
//!   and surfaces immediately.
//!
//! # Quick Start
//!
//! ```rust
//! use steadfast::{from_fn, Error, Retry, Scalar};
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let calls = AtomicU32::new(0);
//! let flaky = from_fn(|| {
//!     if calls.fetch_add(1, Ordering::SeqCst) < 2 {
//!         Err(Error::msg("not yet"))
//!     } else {
//!         Ok("done")
//!     }
//! });
//!
//! assert_eq!(Retry::new(flaky).value().unwrap(), "done");
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! ```

mod backoff;
mod exit;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cancel;
use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::trace::{debug, warning};

pub use backoff::{Backoff, Jitter, Strategy};
pub use exit::{Attempts, ExitCondition};

type RetryPredicate = Arc<dyn Fn(&Error) -> bool + Send + Sync>;

/// A scalar that retries its inner scalar on failure.
///
/// Built with [`Retry::new`] (three attempts), [`Retry::with_attempts`],
/// [`Retry::with_exit`] or [`ScalarExt::retry`](crate::ScalarExt::retry).
///
/// When attempts run out the most recent failure is returned unchanged. If
/// the exit condition rejects attempt zero the result is [`Error::NoAttempts`].
pub struct Retry<S, X = Attempts> {
    inner: S,
    exit: X,
    backoff: Backoff,
    predicate: Option<RetryPredicate>,
}

/// Serializable retry settings.
///
/// ```rust
/// use steadfast::{constant, Retry, RetryConfig, Scalar};
///
/// let config = RetryConfig::default();
/// assert_eq!(config.attempts, 3);
///
/// let retry = Retry::from_config(constant(1), &config);
/// assert_eq!(retry.value().unwrap(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Maximum number of attempts.
    pub attempts: u32,
    /// Delay schedule between attempts.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: Attempts::default().0,
            backoff: Backoff::none(),
        }
    }
}

impl<S> Retry<S, Attempts> {
    /// Retry up to three attempts with no delay.
    pub fn new(inner: S) -> Self {
        Self::with_exit(inner, Attempts::default())
    }

    /// Retry up to `attempts` attempts with no delay.
    pub fn with_attempts(inner: S, attempts: u32) -> Self {
        Self::with_exit(inner, Attempts(attempts))
    }

    /// Build a retry from [`RetryConfig`].
    pub fn from_config(inner: S, config: &RetryConfig) -> Self {
        Self::with_attempts(inner, config.attempts).with_backoff(config.backoff.clone())
    }
}

impl<S, X> Retry<S, X>
where
    X: ExitCondition,
{
    /// Retry until `exit` returns true for the upcoming attempt number.
    ///
    /// ```rust
    /// use steadfast::{fail, Error, Retry, Scalar};
    ///
    /// let never = Retry::with_exit(fail::<()>(Error::msg("x")), |_: u32| true);
    /// assert_eq!(never.value(), Err(Error::NoAttempts));
    /// ```
    pub fn with_exit(inner: S, exit: X) -> Self {
        Self {
            inner,
            exit,
            backoff: Backoff::none(),
            predicate: None,
        }
    }
}

impl<S, X> Retry<S, X> {
    /// Sleep a fixed `delay` after every failed attempt.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.with_backoff(Backoff::constant(delay))
    }

    /// Sleep according to `backoff` after every failed attempt.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Only retry failures for which `predicate` returns true.
    ///
    /// Other failures propagate right away.
    pub fn retry_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Error) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// The delay schedule.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// The wrapped scalar.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn retryable(&self, error: &Error) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(error))
    }
}

impl<S, X> Scalar for Retry<S, X>
where
    S: Scalar,
    X: ExitCondition,
{
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        let mut attempt = 0u32;
        let mut error = Error::NoAttempts;
        while !self.exit.exit(attempt) {
            match self.inner.value() {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt, "retry succeeded");
                    }
                    return Ok(value);
                }
                Err(e) if e.is_cancellation() => {
                    debug!(attempt, "retry cancelled");
                    cancel::interrupt();
                    error = e;
                    break;
                }
                Err(e) if !self.retryable(&e) => {
                    debug!(attempt, error = %e, "failure is not retryable");
                    return Err(e);
                }
                Err(e) => {
                    debug!(attempt, error = %e, "attempt failed");
                    error = e;
                }
            }
            let delay = self.backoff.delay(attempt);
            if !delay.is_zero() {
                if let Err(e) = cancel::sleep(delay) {
                    debug!(attempt, "retry delay interrupted");
                    cancel::interrupt();
                    error = e;
                    break;
                }
            }
            attempt = attempt.saturating_add(1);
        }
        warning!(attempts = attempt, error = %error, "retry gave up");
        Err(error)
    }
}

impl<S, X> fmt::Debug for Retry<S, X>
where
    S: fmt::Debug,
    X: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("inner", &self.inner)
            .field("exit", &self.exit)
            .field("backoff", &self.backoff)
            .field("predicate", &self.predicate.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

#[cfg(test)]
mod tests;
