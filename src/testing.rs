//! Testing utilities for code built on scalars.
//!
//! # Examples
//!
//! ## Counting invocations
//!
//! ```rust
//! use steadfast::testing::Counting;
//! use steadfast::{constant, Scalar, ScalarExt};
//!
//! let counted = Counting::new(constant(5));
//! let solid = (&counted).solid();
//!
//! solid.value().unwrap();
//! solid.value().unwrap();
//! assert_eq!(counted.count(), 1);
//! ```
//!
//! ## Assertion macros
//!
//! ```rust
//! use steadfast::{assert_failure, assert_value, constant, fail, Error};
//!
//! assert_value!(constant(42), 42);
//! assert_failure!(fail::<i32>(Error::msg("boom")));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Wraps a scalar and counts how many times it has been invoked.
///
/// Safe to share between threads; the count is atomic.
#[derive(Debug)]
pub struct Counting<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> Counting<S> {
    /// Start counting invocations of `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of invocations so far.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: Scalar> Scalar for Counting<S> {
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.value()
    }
}

/// Fails on its first `failures` invocations, then yields `value`.
///
/// The failure message is `flaky: failure #n` with `n` counting from zero.
#[derive(Debug)]
pub struct Flaky<T> {
    failures: usize,
    value: T,
    calls: AtomicUsize,
}

impl<T> Flaky<T> {
    /// Fail `failures` times before succeeding with `value`.
    pub fn new(failures: usize, value: T) -> Self {
        Self {
            failures,
            value,
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T: Clone> Scalar for Flaky<T> {
    type Output = T;

    fn value(&self) -> Result<T> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(Error::msg(format!("flaky: failure #{n}")))
        } else {
            Ok(self.value.clone())
        }
    }
}

/// Assert that a scalar yields the expected value.
///
/// Panics with the failure if the scalar fails.
#[macro_export]
macro_rules! assert_value {
    ($scalar:expr, $expected:expr) => {
        match $crate::Scalar::value(&$scalar) {
            Ok(value) => assert_eq!(value, $expected),
            Err(e) => panic!("Expected value, got failure: {:?}", e),
        }
    };
}

/// Assert that a scalar fails, optionally with a specific error.
#[macro_export]
macro_rules! assert_failure {
    ($scalar:expr) => {
        match $crate::Scalar::value(&$scalar) {
            Err(_) => {}
            Ok(value) => panic!("Expected failure, got value: {:?}", value),
        }
    };
    ($scalar:expr, $expected:expr) => {
        match $crate::Scalar::value(&$scalar) {
            Err(e) => assert_eq!(e, $expected),
            Ok(value) => panic!("Expected failure {:?}, got value: {:?}", $expected, value),
        }
    };
}
