//! Tracing spans around scalar evaluation.

use crate::error::Result;
use crate::scalar::Scalar;

/// A scalar evaluated inside a tracing span.
///
/// Created by [`ScalarExt::instrument`](crate::ScalarExt::instrument).
#[derive(Debug, Clone)]
pub struct Instrument<S> {
    inner: S,
    span: tracing::Span,
}

impl<S> Instrument<S> {
    pub(crate) fn new(inner: S, span: tracing::Span) -> Self {
        Self { inner, span }
    }
}

impl<S: Scalar> Scalar for Instrument<S> {
    type Output = S::Output;

    fn value(&self) -> Result<S::Output> {
        let _entered = self.span.enter();
        self.inner.value()
    }
}
