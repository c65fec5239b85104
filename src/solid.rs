//! Thread-safe memoization.
//!
//! [`Solid`] computes its inner scalar at most once, no matter how many
//! threads call it at the same time. The first caller runs the computation;
//! concurrent callers block until it finishes. After that every caller gets a
//! clone of the same outcome, failures included: a failed computation is not
//! retried on the next call.
//!
//! # Example
//!
//! ```rust
//! use steadfast::{from_fn, Scalar, Solid};
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let runs = AtomicU32::new(0);
//! let config = Solid::new(from_fn(|| {
//!     runs.fetch_add(1, Ordering::SeqCst);
//!     Ok(String::from("loaded"))
//! }));
//!
//! assert_eq!(config.value().unwrap(), "loaded");
//! assert_eq!(config.value().unwrap(), "loaded");
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::OnceCell;

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::trace::trace;

/// A scalar that caches the outcome of its first evaluation.
///
/// The cell is written once, under `OnceCell`'s lock, and never overwritten.
/// A panic in the inner scalar is cached as [`Error::Panicked`].
pub struct Solid<S>
where
    S: Scalar,
{
    inner: S,
    cell: OnceCell<Result<S::Output>>,
}

impl<S> Solid<S>
where
    S: Scalar,
{
    /// Memoize `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cell: OnceCell::new(),
        }
    }

    /// Returns true once the outcome has been computed.
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Borrow the cached outcome, computing it first if needed.
    pub fn get(&self) -> &Result<S::Output> {
        self.cell.get_or_init(|| {
            trace!("computing solid value");
            panic::catch_unwind(AssertUnwindSafe(|| self.inner.value()))
                .unwrap_or_else(|payload| Err(Error::panicked(payload)))
        })
    }
}

impl<S> Scalar for Solid<S>
where
    S: Scalar,
    S::Output: Clone,
{
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        self.get().clone()
    }
}

impl<S> fmt::Debug for Solid<S>
where
    S: Scalar + fmt::Debug,
    S::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solid")
            .field("inner", &self.inner)
            .field("cell", &self.cell.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{constant, fail, from_fn};
    use crate::testing::Counting;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_computes_once() {
        let seed = AtomicU64::new(17);
        let solid = Solid::new(from_fn(|| Ok(seed.fetch_add(31, Ordering::SeqCst))));
        let first = solid.value().unwrap() + solid.value().unwrap();
        let second = solid.value().unwrap() + solid.value().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, 34);
    }

    #[test]
    fn test_failure_is_cached() {
        let counted = Counting::new(fail::<u8>(Error::msg("unreadable")));
        let solid = Solid::new(&counted);

        assert_eq!(solid.value(), Err(Error::msg("unreadable")));
        assert_eq!(solid.value(), Err(Error::msg("unreadable")));
        assert_eq!(solid.value(), Err(Error::msg("unreadable")));
        assert_eq!(counted.count(), 1);
    }

    #[test]
    fn test_panic_is_cached_as_failure() {
        let counted = Counting::new(from_fn(|| -> Result<u8> { panic!("bad seed") }));
        let solid = Solid::new(&counted);

        assert_eq!(solid.value(), Err(Error::Panicked("bad seed".into())));
        assert_eq!(solid.value(), Err(Error::Panicked("bad seed".into())));
        assert_eq!(counted.count(), 1);
    }

    #[test]
    fn test_is_computed() {
        let solid = Solid::new(constant(vec![1, 2]));
        assert!(!solid.is_computed());
        assert_eq!(solid.get(), &Ok(vec![1, 2]));
        assert!(solid.is_computed());
    }

    #[test]
    fn test_debug_shows_cell() {
        let solid = Solid::new(constant(5));
        assert!(format!("{:?}", solid).contains("None"));
        solid.value().unwrap();
        assert!(format!("{:?}", solid).contains("Ok(5)"));
    }
}
