//! Basic scalar constructors.

use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// A scalar that always yields a clone of the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant<T>(T);

impl<T: Clone> Scalar for Constant<T> {
    type Output = T;

    fn value(&self) -> Result<T> {
        Ok(self.0.clone())
    }
}

/// A scalar that always fails with the same error.
#[derive(Debug, Clone)]
pub struct Fail<T> {
    error: Error,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> Scalar for Fail<T> {
    type Output = T;

    fn value(&self) -> Result<T> {
        Err(self.error.clone())
    }
}

/// A scalar backed by a function.
///
/// Closures only become scalars through [`from_fn`]; a blanket impl for
/// `Fn() -> Result<T>` would overlap the impls for `&S`, `Box<S>` and `Arc<S>`.
#[derive(Clone)]
pub struct FromFn<F>(F);

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FromFn").field(&"<function>").finish()
    }
}

impl<T, F> Scalar for FromFn<F>
where
    F: Fn() -> Result<T>,
{
    type Output = T;

    fn value(&self) -> Result<T> {
        (self.0)()
    }
}

/// Always yield `value`.
///
/// # Example
///
/// ```rust
/// use steadfast::{constant, Scalar};
///
/// assert_eq!(constant("ready").value().unwrap(), "ready");
/// ```
pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant(value)
}

/// Always fail with `error`.
pub fn fail<T>(error: Error) -> Fail<T> {
    Fail {
        error,
        _marker: std::marker::PhantomData,
    }
}

/// Wrap a function as a scalar.
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: Fn() -> Result<T>,
{
    FromFn(f)
}

/// The scalar that is always `true`.
pub fn truth() -> Constant<bool> {
    Constant(true)
}

/// The scalar that is always `false`.
pub fn falsehood() -> Constant<bool> {
    Constant(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_repeats() {
        let s = constant(vec![1, 2]);
        assert_eq!(s.value(), Ok(vec![1, 2]));
        assert_eq!(s.value(), Ok(vec![1, 2]));
    }

    #[test]
    fn test_fail_repeats() {
        let s = fail::<u8>(Error::msg("broken"));
        assert_eq!(s.value(), Err(Error::msg("broken")));
        assert_eq!(s.value(), Err(Error::msg("broken")));
    }

    #[test]
    fn test_from_fn_runs_each_time() {
        let calls = std::cell::Cell::new(0);
        let s = from_fn(|| {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        });
        assert_eq!(s.value(), Ok(1));
        assert_eq!(s.value(), Ok(2));
        assert_eq!(format!("{:?}", s), "FromFn(\"<function>\")");
    }

    #[test]
    fn test_truth_and_falsehood() {
        assert_eq!(truth().value(), Ok(true));
        assert_eq!(falsehood().value(), Ok(false));
    }
}
