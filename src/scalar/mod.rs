//! Deferred, possibly failing computations.
//!
//! A [`Scalar`] is a zero-argument computation that produces a value or fails.
//! It can be invoked any number of times, and every invocation may redo the
//! underlying work; wrap it in a [`Solid`](crate::Solid) to compute it once.
//!
//! Closures returning [`Result`](crate::Result) become scalars with [`from_fn`]:
//!
//! ```rust
//! use steadfast::{from_fn, Scalar, ScalarExt};
//!
//! let answer = from_fn(|| Ok(42));
//! assert_eq!(answer.value().unwrap(), 42);
//!
//! let doubled = answer.map(|x| x * 2);
//! assert_eq!(doubled.value().unwrap(), 84);
//! ```

mod constructors;
mod ext;
#[cfg(feature = "tracing")]
mod instrument;

use std::sync::Arc;

use crate::error::Result;

pub use constructors::{constant, fail, falsehood, from_fn, truth, Constant, Fail, FromFn};
pub use ext::{Map, ScalarExt};
#[cfg(feature = "tracing")]
pub use instrument::Instrument;

/// A deferred computation that yields `Output` or fails with an [`Error`](crate::Error).
pub trait Scalar {
    /// The value produced on success.
    type Output;

    /// Run the computation.
    fn value(&self) -> Result<Self::Output>;
}

/// A type-erased scalar, for storing heterogeneous scalars side by side.
pub type BoxedScalar<T> = Box<dyn Scalar<Output = T> + Send + Sync>;

impl<S: Scalar + ?Sized> Scalar for Box<S> {
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        (**self).value()
    }
}

impl<S: Scalar + ?Sized> Scalar for Arc<S> {
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        (**self).value()
    }
}

impl<S: Scalar + ?Sized> Scalar for &S {
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        (**self).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_closure_is_scalar() {
        let s = from_fn(|| Ok("hi"));
        assert_eq!(s.value(), Ok("hi"));
    }

    #[test]
    fn test_forwarding_impls() {
        let boxed: BoxedScalar<i32> = Box::new(constant(1));
        assert_eq!(boxed.value(), Ok(1));

        let shared = Arc::new(constant(2));
        assert_eq!(shared.value(), Ok(2));

        let borrowed = &constant(3);
        assert_eq!(borrowed.value(), Ok(3));
    }

    #[test]
    fn test_heterogeneous_boxed() {
        let items: Vec<BoxedScalar<bool>> = vec![
            Box::new(truth()),
            Box::new(from_fn(|| Ok(false))),
            Box::new(fail(Error::msg("nope"))),
        ];
        let results: Vec<_> = items.iter().map(|s| s.value()).collect();
        assert_eq!(results, vec![Ok(true), Ok(false), Err(Error::msg("nope"))]);
    }
}
