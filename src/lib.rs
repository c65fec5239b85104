//! # Steadfast
//!
//! Resilient execution for deferred computations.
//!
//! A [`Scalar`] is a zero-argument computation that produces a value or fails.
//! Steadfast adds four behaviours on top of it:
//!
//! - [`Retry`]: re-invoke until success or until an exit condition holds,
//!   with an optional [`Backoff`] between attempts.
//! - [`WithFallback`]: recover from a failure with the highest-priority
//!   matching [`Fallback`].
//! - [`AndInThreads`] / [`OrInThreads`]: evaluate many boolean scalars on a
//!   thread pool and reduce the results; [`And`] / [`Or`] do the same
//!   sequentially with short-circuit.
//! - [`Solid`]: compute at most once across any number of threads and cache
//!   the outcome, failures included.
//!
//! Cancellation is cooperative, see [`cancel`].
//!
//! ## Quick Example
//!
//! ```rust
//! use steadfast::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("service unavailable")]
//! struct Unavailable;
//!
//! let fetch = from_fn(|| Err::<u32, _>(Error::new(Unavailable)))
//!     .retry_times(3)
//!     .with_delay(Duration::from_millis(1))
//!     .with_fallback([
//!         Fallback::any(|_| Ok(0)),
//!         Fallback::of::<Unavailable>(|_| Ok(42)),
//!     ])
//!     .solid();
//!
//! assert_eq!(fetch.value().unwrap(), 42);
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): emit `tracing` events from the retry loop, fallback
//!   selection, the thread-pool reducers and memoization.
//! - `jitter`: randomise backoff delays.
//! - `serde`: (de)serialize [`RetryConfig`] and [`Backoff`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod trace;

pub mod cancel;
pub mod error;
pub mod fallback;
pub mod logic;
pub mod retry;
pub mod scalar;
pub mod solid;
pub mod testing;

// Re-exports
pub use error::{Error, ErrorKind, Result};
pub use fallback::{Fallback, Priority, WithFallback};
pub use logic::{And, AndInThreads, Logic, Or, OrInThreads};
pub use retry::{Attempts, Backoff, ExitCondition, Jitter, Retry, RetryConfig};
pub use scalar::{
    constant, fail, falsehood, from_fn, truth, BoxedScalar, Constant, Scalar, ScalarExt,
};
pub use solid::Solid;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::fallback::{Fallback, Priority, WithFallback};
    pub use crate::logic::{And, AndInThreads, Or, OrInThreads};
    pub use crate::retry::{Attempts, Backoff, Retry};
    pub use crate::scalar::{constant, fail, from_fn, BoxedScalar, Scalar, ScalarExt};
    pub use crate::solid::Solid;
}
