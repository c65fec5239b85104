//! Boolean reduction over scalars.
//!
//! [`And`] and [`Or`] evaluate their scalars one by one on the calling thread
//! and stop as soon as the result is known. [`AndInThreads`] and
//! [`OrInThreads`] evaluate every scalar on a thread pool and reduce the
//! results afterwards; concurrency changes timing only, never the answer.
//!
//! All four accept three shapes of input:
//!
//! - scalars producing `bool`,
//! - an action plus items (`for_each`): `true` once every item was processed,
//! - a predicate plus items (`matching`).
//!
//! # Example
//!
//! ```rust
//! use steadfast::{And, Or, Scalar};
//!
//! assert!(!And::matching(|n: &i32| *n > 0, vec![1, -1, 0]).value().unwrap());
//! assert!(Or::matching(|n: &i32| *n > 0, vec![-1, 1, 0]).value().unwrap());
//! ```

mod threads;

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::scalar::Scalar;

pub use threads::{AndInThreads, OrInThreads};

/// The boolean operator used to reduce results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    /// True iff every element is true.
    And,
    /// True iff any element is true.
    Or,
}

impl Logic {
    /// The result of reducing no elements.
    pub fn identity(self) -> bool {
        matches!(self, Logic::And)
    }

    /// The element value that decides the result on its own.
    pub fn short_circuit_on(self) -> bool {
        matches!(self, Logic::Or)
    }

    /// Reduce `results` in order, stopping at the first deciding value or
    /// the first failure. Elements after that are not pulled from the iterator.
    ///
    /// ```rust
    /// use steadfast::Logic;
    ///
    /// assert_eq!(Logic::And.reduce([Ok(true), Ok(false)]), Ok(false));
    /// assert_eq!(Logic::Or.reduce(std::iter::empty()), Ok(false));
    /// ```
    pub fn reduce<I>(self, results: I) -> Result<bool>
    where
        I: IntoIterator<Item = Result<bool>>,
    {
        for result in results {
            if result? == self.short_circuit_on() {
                return Ok(self.short_circuit_on());
            }
        }
        Ok(self.identity())
    }
}

/// Runs an action on one input; yields `true` if the action succeeds.
pub struct Run<X, F> {
    input: X,
    action: Arc<F>,
}

impl<X, F> Run<X, F> {
    fn all(action: F, inputs: impl IntoIterator<Item = X>) -> Vec<Self> {
        let action = Arc::new(action);
        inputs
            .into_iter()
            .map(|input| Run {
                input,
                action: action.clone(),
            })
            .collect()
    }
}

impl<X, F> Scalar for Run<X, F>
where
    F: Fn(&X) -> Result<()>,
{
    type Output = bool;

    fn value(&self) -> Result<bool> {
        (self.action)(&self.input)?;
        Ok(true)
    }
}

impl<X: fmt::Debug, F> fmt::Debug for Run<X, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run")
            .field("input", &self.input)
            .field("action", &"<function>")
            .finish()
    }
}

/// Tests one input with a predicate.
pub struct Check<X, F> {
    input: X,
    predicate: Arc<F>,
}

impl<X, F> Check<X, F> {
    fn all(predicate: F, inputs: impl IntoIterator<Item = X>) -> Vec<Self> {
        let predicate = Arc::new(predicate);
        inputs
            .into_iter()
            .map(|input| Check {
                input,
                predicate: predicate.clone(),
            })
            .collect()
    }

    fn each(subject: X, predicates: impl IntoIterator<Item = F>) -> Vec<Self>
    where
        X: Clone,
    {
        predicates
            .into_iter()
            .map(|predicate| Check {
                input: subject.clone(),
                predicate: Arc::new(predicate),
            })
            .collect()
    }
}

impl<X, F> Scalar for Check<X, F>
where
    F: Fn(&X) -> bool,
{
    type Output = bool;

    fn value(&self) -> Result<bool> {
        Ok((self.predicate)(&self.input))
    }
}

impl<X: fmt::Debug, F> fmt::Debug for Check<X, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("input", &self.input)
            .field("predicate", &"<function>")
            .finish()
    }
}

macro_rules! sequential {
    ($(#[$meta:meta])* $name:ident, $logic:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<S> {
            items: Vec<S>,
        }

        impl<S> $name<S> {
            /// Reduce the given scalars.
            pub fn new(items: impl IntoIterator<Item = S>) -> Self {
                Self {
                    items: items.into_iter().collect(),
                }
            }

            /// The operator this reducer applies.
            pub fn logic(&self) -> Logic {
                $logic
            }
        }

        impl<X, F> $name<Run<X, F>>
        where
            F: Fn(&X) -> Result<()>,
        {
            /// Run `action` on every input, in order.
            pub fn for_each(action: F, inputs: impl IntoIterator<Item = X>) -> Self {
                Self::new(Run::all(action, inputs))
            }
        }

        impl<X, F> $name<Check<X, F>>
        where
            F: Fn(&X) -> bool,
        {
            /// Test every input with `predicate`.
            pub fn matching(predicate: F, inputs: impl IntoIterator<Item = X>) -> Self {
                Self::new(Check::all(predicate, inputs))
            }

            /// Test one `subject` against several predicates.
            pub fn subject(subject: X, predicates: impl IntoIterator<Item = F>) -> Self
            where
                X: Clone,
            {
                Self::new(Check::each(subject, predicates))
            }
        }

        impl<S> Scalar for $name<S>
        where
            S: Scalar<Output = bool>,
        {
            type Output = bool;

            fn value(&self) -> Result<bool> {
                $logic.reduce(self.items.iter().map(Scalar::value))
            }
        }
    };
}

sequential!(
    /// Sequential conjunction: evaluates until the first `false` or failure.
    ///
    /// ```rust
    /// use steadfast::{falsehood, truth, And, Scalar};
    ///
    /// assert!(And::new([truth(), truth()]).value().unwrap());
    /// assert!(!And::new([truth(), falsehood()]).value().unwrap());
    /// assert!(And::<steadfast::Constant<bool>>::new([]).value().unwrap());
    /// ```
    And,
    Logic::And
);

sequential!(
    /// Sequential disjunction: evaluates until the first `true` or failure.
    Or,
    Logic::Or
);
