//! Fallback handlers: how to recognise a failure and how to recover from it.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, ErrorKind, Result};

/// How well a [`Fallback`] fits a failure.
///
/// Higher scores win. `NotApplicable` removes the handler from consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// The handler does not apply to this failure.
    NotApplicable,
    /// The handler applies with the given score.
    Score(i32),
}

impl Priority {
    /// The score, if the handler applies.
    pub fn score(self) -> Option<i32> {
        match self {
            Priority::Score(score) => Some(score),
            Priority::NotApplicable => None,
        }
    }

    /// Returns true unless `NotApplicable`.
    pub fn is_applicable(self) -> bool {
        matches!(self, Priority::Score(_))
    }
}

type PriorityFn = Arc<dyn Fn(&Error) -> Priority + Send + Sync>;
type RecoverFn<T> = Arc<dyn Fn(Error) -> Result<T> + Send + Sync>;

/// A recovery strategy for failures producing `T`.
///
/// A fallback pairs a priority function, which scores how well it fits a
/// failure, with a recovery function, which turns the failure into a
/// substitute result.
///
/// # Examples
///
/// ```rust
/// use steadfast::{Error, ErrorKind, Fallback, Priority};
///
/// let io = Fallback::of::<std::io::Error>(|_| Ok("cached copy"));
/// let anything = Fallback::any(|_| Ok("default"));
///
/// let err = Error::new(std::io::Error::other("disk"));
/// assert_eq!(io.priority(&err), Priority::Score(1));
/// assert_eq!(anything.priority(&err), Priority::Score(0));
///
/// let cancelled = Fallback::kind(ErrorKind::Cancelled, |_| Ok("stopped"));
/// assert_eq!(cancelled.priority(&err), Priority::NotApplicable);
/// ```
pub struct Fallback<T> {
    priority: PriorityFn,
    recover: RecoverFn<T>,
}

impl<T> Clone for Fallback<T> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority.clone(),
            recover: self.recover.clone(),
        }
    }
}

impl<T> fmt::Debug for Fallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallback")
            .field("priority", &"<function>")
            .field("recover", &"<function>")
            .finish()
    }
}

impl<T> Fallback<T> {
    /// A fallback from a raw priority function and recovery function.
    pub fn new<P, R>(priority: P, recover: R) -> Self
    where
        P: Fn(&Error) -> Priority + Send + Sync + 'static,
        R: Fn(Error) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            priority: Arc::new(priority),
            recover: Arc::new(recover),
        }
    }

    /// Applies to every failure, with score 0.
    pub fn any<R>(recover: R) -> Self
    where
        R: Fn(Error) -> Result<T> + Send + Sync + 'static,
    {
        Self::new(|_| Priority::Score(0), recover)
    }

    /// Applies, with score 1, to failures whose user error is an `E`.
    ///
    /// The recovery function receives the downcast error.
    pub fn of<E>(recover: impl Fn(&E) -> Result<T> + Send + Sync + 'static) -> Self
    where
        E: std::error::Error + 'static,
    {
        Self::new(
            |error| match error.downcast_ref::<E>() {
                Some(_) => Priority::Score(1),
                None => Priority::NotApplicable,
            },
            move |error| match error.downcast_ref::<E>() {
                Some(typed) => recover(typed),
                None => Err(error),
            },
        )
    }

    /// Applies, with score 1, to failures of the given kind.
    pub fn kind<R>(kind: ErrorKind, recover: R) -> Self
    where
        R: Fn(Error) -> Result<T> + Send + Sync + 'static,
    {
        Self::new(
            move |error| {
                if error.kind() == kind {
                    Priority::Score(1)
                } else {
                    Priority::NotApplicable
                }
            },
            recover,
        )
    }

    /// Recovers from every failure with a clone of `value`, score 0.
    pub fn value(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::any(move |_| Ok(value.clone()))
    }

    /// Replace the score this fallback reports when it applies.
    ///
    /// ```rust
    /// use steadfast::{Error, Fallback, Priority};
    ///
    /// let fb = Fallback::<u8>::any(|_| Ok(0)).with_priority(10);
    /// assert_eq!(fb.priority(&Error::msg("x")), Priority::Score(10));
    /// ```
    pub fn with_priority(self, score: i32) -> Self {
        let inner = self.priority;
        Self {
            priority: Arc::new(move |error| match inner(error) {
                Priority::Score(_) => Priority::Score(score),
                Priority::NotApplicable => Priority::NotApplicable,
            }),
            recover: self.recover,
        }
    }

    /// How well this fallback fits `error`.
    pub fn priority(&self, error: &Error) -> Priority {
        (self.priority)(error)
    }

    /// Recover from `error`.
    pub fn apply(&self, error: Error) -> Result<T> {
        (self.recover)(error)
    }
}

/// Pick the applicable fallback with the highest score.
///
/// Among equal scores the one that comes first wins.
pub(crate) fn best<'a, T>(fallbacks: &'a [Fallback<T>], error: &Error) -> Option<(usize, &'a Fallback<T>)> {
    let mut best: Option<(i32, usize)> = None;
    for (index, fallback) in fallbacks.iter().enumerate() {
        if let Some(score) = fallback.priority(error).score() {
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, index));
            }
        }
    }
    best.map(|(_, index)| (index, &fallbacks[index]))
}
