//! Extension trait providing combinator methods for all scalars.
//!
//! `ScalarExt` is implemented automatically for every [`Scalar`]. It lets the
//! resilience wrappers be stacked fluently:
//!
//! ```rust
//! use steadfast::testing::Flaky;
//! use steadfast::{Fallback, Scalar, ScalarExt};
//!
//! let report = Flaky::new(5, "fresh report")
//!     .retry_times(2)
//!     .with_fallback([Fallback::value("stale report")])
//!     .solid();
//!
//! assert_eq!(report.value().unwrap(), "stale report");
//! ```

use std::fmt;

use crate::error::Result;
use crate::fallback::{Fallback, WithFallback};
use crate::retry::{Attempts, ExitCondition, Retry};
use crate::scalar::{BoxedScalar, Scalar};
use crate::solid::Solid;

/// Transforms the value of a scalar.
#[derive(Clone)]
pub struct Map<S, F> {
    inner: S,
    f: F,
}

impl<S: fmt::Debug, F> fmt::Debug for Map<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("inner", &self.inner)
            .field("f", &"<function>")
            .finish()
    }
}

impl<S, F, U> Scalar for Map<S, F>
where
    S: Scalar,
    F: Fn(S::Output) -> U,
{
    type Output = U;

    fn value(&self) -> Result<U> {
        self.inner.value().map(&self.f)
    }
}

/// Combinator methods available on every [`Scalar`].
pub trait ScalarExt: Scalar {
    /// Transform the success value.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { inner: self, f }
    }

    /// Retry up to three attempts. See [`Retry`].
    fn retry(self) -> Retry<Self, Attempts>
    where
        Self: Sized,
    {
        Retry::new(self)
    }

    /// Retry up to `attempts` attempts.
    fn retry_times(self, attempts: u32) -> Retry<Self, Attempts>
    where
        Self: Sized,
    {
        Retry::with_attempts(self, attempts)
    }

    /// Retry until `exit` returns true.
    fn retry_until<X>(self, exit: X) -> Retry<Self, X>
    where
        Self: Sized,
        X: ExitCondition,
    {
        Retry::with_exit(self, exit)
    }

    /// Recover from failures with the best matching fallback.
    /// See [`WithFallback`].
    fn with_fallback<I>(self, fallbacks: I) -> WithFallback<Self>
    where
        Self: Sized,
        I: IntoIterator<Item = Fallback<Self::Output>>,
    {
        WithFallback::new(self, fallbacks)
    }

    /// Compute at most once and cache the outcome. See [`Solid`].
    fn solid(self) -> Solid<Self>
    where
        Self: Sized,
    {
        Solid::new(self)
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxedScalar<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }

    /// Evaluate inside a tracing span.
    #[cfg(feature = "tracing")]
    fn instrument(self, span: tracing::Span) -> super::Instrument<Self>
    where
        Self: Sized,
    {
        super::Instrument::new(self, span)
    }
}

impl<S: Scalar + ?Sized> ScalarExt for S {}
