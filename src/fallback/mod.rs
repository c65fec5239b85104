//! Typed recovery from failures.
//!
//! [`WithFallback`] runs its inner scalar and, on failure, hands the error to
//! the best-matching [`Fallback`]. Each fallback scores the failure with a
//! [`Priority`]; the highest score wins and ties go to the fallback registered
//! first. If nothing applies, the failure comes back wrapped in
//! [`Error::NoFallback`].
//!
//! # Example
//!
//! ```rust
//! use steadfast::{fail, Error, Fallback, Scalar, ScalarExt};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("not found")]
//! struct NotFound;
//!
//! let lookup = fail::<&str>(Error::new(NotFound)).with_fallback([
//!     Fallback::any(|_| Ok("generic")),
//!     Fallback::of::<NotFound>(|_| Ok("created")),
//! ]);
//!
//! // `of` scores higher than `any`, whatever the order.
//! assert_eq!(lookup.value().unwrap(), "created");
//! ```

mod handler;

use std::fmt;

use crate::cancel;
use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::trace::debug;

pub use handler::{Fallback, Priority};

/// A scalar that recovers from failures with a set of [`Fallback`]s.
pub struct WithFallback<S>
where
    S: Scalar,
{
    inner: S,
    fallbacks: Vec<Fallback<S::Output>>,
}

impl<S> WithFallback<S>
where
    S: Scalar,
{
    /// Wrap `inner` with the given fallbacks.
    pub fn new(inner: S, fallbacks: impl IntoIterator<Item = Fallback<S::Output>>) -> Self {
        Self {
            inner,
            fallbacks: fallbacks.into_iter().collect(),
        }
    }

    /// Register one more fallback, after the existing ones.
    pub fn or(mut self, fallback: Fallback<S::Output>) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// The registered fallbacks, in registration order.
    pub fn fallbacks(&self) -> &[Fallback<S::Output>] {
        &self.fallbacks
    }

    fn recover(&self, error: Error) -> Result<S::Output> {
        match handler::best(&self.fallbacks, &error) {
            Some((_index, fallback)) => {
                debug!(index = _index, error = %error, "applying fallback");
                fallback.apply(error)
            }
            None => {
                debug!(candidates = self.fallbacks.len(), error = %error, "no fallback applies");
                Err(Error::NoFallback {
                    cause: Box::new(error),
                })
            }
        }
    }
}

impl<S> Scalar for WithFallback<S>
where
    S: Scalar,
{
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        match self.inner.value() {
            Ok(value) => Ok(value),
            Err(error) => {
                if error.is_cancellation() {
                    cancel::interrupt();
                }
                self.recover(error)
            }
        }
    }
}

impl<S> fmt::Debug for WithFallback<S>
where
    S: Scalar + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithFallback")
            .field("inner", &self.inner)
            .field("fallbacks", &self.fallbacks.len())
            .finish()
    }
}
