//! Boolean reduction with every scalar evaluated on a thread pool.

use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{Check, Logic, Run};
use crate::cancel;
use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::trace::debug;

/// Shared machinery behind [`AndInThreads`] and [`OrInThreads`].
struct InThreads<S> {
    logic: Logic,
    pool: Option<Arc<ThreadPool>>,
    items: Vec<S>,
}

impl<S> InThreads<S>
where
    S: Scalar<Output = bool> + Sync,
{
    fn value(&self) -> Result<bool> {
        if self.items.is_empty() {
            return Ok(self.logic.identity());
        }
        let outcomes = match &self.pool {
            Some(pool) => self.evaluate(pool),
            None => {
                // Owned pools live for this call only; dropping one shuts it
                // down on every path out of this block.
                let pool = owned_pool(self.items.len())?;
                self.evaluate(&pool)
            }
        };

        // Any cancelled unit is carried back to the caller, whatever the
        // outcome of the reduction.
        if outcomes.iter().any(|outcome| outcome.cancelled) {
            cancel::interrupt();
        }

        let mut values = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome.result {
                Ok(value) => values.push(value),
                Err(error) => {
                    debug!(index = values.len(), error = %error, "unit failed");
                    return Err(error);
                }
            }
        }
        self.logic.reduce(values.into_iter().map(Ok))
    }

    /// Submit every item to `pool` and wait for all of them.
    fn evaluate(&self, pool: &ThreadPool) -> Vec<Outcome> {
        debug!(
            units = self.items.len(),
            threads = pool.current_num_threads(),
            logic = ?self.logic,
            "submitting units"
        );
        pool.install(|| self.items.par_iter().map(unit).collect())
    }
}

/// What one unit left behind on its worker.
struct Outcome {
    result: Result<bool>,
    cancelled: bool,
}

/// Evaluate one item on a worker thread.
fn unit<S: Scalar<Output = bool>>(scalar: &S) -> Outcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| scalar.value()))
        .unwrap_or_else(|payload| Err(Error::panicked(payload)));
    // Workers are shared between units, so the flag is cleared here and
    // reported in the outcome instead.
    let raised = cancel::interrupted();
    let cancelled = raised || result.as_ref().is_err_and(Error::is_cancellation);
    Outcome { result, cancelled }
}

fn owned_pool(units: usize) -> Result<ThreadPool> {
    let cpus = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    ThreadPoolBuilder::new()
        .num_threads(cpus.min(units).max(1))
        .thread_name(|index| format!("steadfast-worker-{index}"))
        .build()
        .map_err(Error::new)
}

impl<S> fmt::Debug for InThreads<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InThreads")
            .field("logic", &self.logic)
            .field("pool", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .field("items", &self.items.len())
            .finish()
    }
}

macro_rules! in_threads {
    ($(#[$meta:meta])* $name:ident, $logic:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<S> {
            core: InThreads<S>,
        }

        impl<S> $name<S> {
            /// Evaluate `items` on a pool created for each evaluation, sized
            /// to the available parallelism.
            pub fn new(items: impl IntoIterator<Item = S>) -> Self {
                Self {
                    core: InThreads {
                        logic: $logic,
                        pool: None,
                        items: items.into_iter().collect(),
                    },
                }
            }

            /// Evaluate `items` on `pool`. The pool is shared, never shut down.
            pub fn with_pool(pool: Arc<ThreadPool>, items: impl IntoIterator<Item = S>) -> Self {
                let mut reducer = Self::new(items);
                reducer.core.pool = Some(pool);
                reducer
            }

            /// The operator this reducer applies.
            pub fn logic(&self) -> Logic {
                self.core.logic
            }
        }

        impl<X, F> $name<Run<X, F>>
        where
            F: Fn(&X) -> Result<()>,
        {
            /// Run `action` on every input concurrently.
            pub fn for_each(action: F, inputs: impl IntoIterator<Item = X>) -> Self {
                Self::new(Run::all(action, inputs))
            }

            /// Run `action` on every input concurrently on `pool`.
            pub fn for_each_with_pool(
                pool: Arc<ThreadPool>,
                action: F,
                inputs: impl IntoIterator<Item = X>,
            ) -> Self {
                Self::with_pool(pool, Run::all(action, inputs))
            }
        }

        impl<X, F> $name<Check<X, F>>
        where
            F: Fn(&X) -> bool,
        {
            /// Test every input with `predicate` concurrently.
            pub fn matching(predicate: F, inputs: impl IntoIterator<Item = X>) -> Self {
                Self::new(Check::all(predicate, inputs))
            }

            /// Test every input with `predicate` concurrently on `pool`.
            pub fn matching_with_pool(
                pool: Arc<ThreadPool>,
                predicate: F,
                inputs: impl IntoIterator<Item = X>,
            ) -> Self {
                Self::with_pool(pool, Check::all(predicate, inputs))
            }
        }

        impl<S> Scalar for $name<S>
        where
            S: Scalar<Output = bool> + Sync,
        {
            type Output = bool;

            fn value(&self) -> Result<bool> {
                self.core.value()
            }
        }
    };
}

in_threads!(
    /// Concurrent conjunction.
    ///
    /// Every scalar is submitted to the pool before any result is awaited and
    /// all of them run to completion. The answer is the sequential `&&` of
    /// the results in their original order. If any scalar fails, the first
    /// failure in that order is returned once all scalars have finished.
    ///
    /// ```rust
    /// use steadfast::{falsehood, truth, AndInThreads, Scalar};
    ///
    /// assert!(AndInThreads::new([truth(), truth(), truth()]).value().unwrap());
    /// assert!(!AndInThreads::new([truth(), falsehood(), truth()]).value().unwrap());
    /// ```
    AndInThreads,
    Logic::And
);

in_threads!(
    /// Concurrent disjunction, the counterpart of [`AndInThreads`].
    ///
    /// ```rust
    /// use steadfast::{falsehood, truth, OrInThreads, Scalar};
    ///
    /// assert!(!OrInThreads::new([falsehood(), falsehood()]).value().unwrap());
    /// assert!(OrInThreads::new([falsehood(), truth()]).value().unwrap());
    /// ```
    OrInThreads,
    Logic::Or
);
