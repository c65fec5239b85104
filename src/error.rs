//! The error type shared by every scalar in the crate.
//!
//! Scalars fail with [`Error`]. User failures are stored behind an `Arc` so an
//! error can be cloned (a [`Solid`](crate::Solid) replays the same failure to
//! every caller) and still be downcast to its concrete type when a
//! [`Fallback`](crate::Fallback) wants to match on it.

use std::fmt;
use std::sync::Arc;

/// Convenience alias used by every scalar.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure produced by a scalar.
///
/// # Examples
///
/// ```rust
/// use steadfast::{Error, ErrorKind};
///
/// let err = Error::msg("disk is full");
/// assert_eq!(err.kind(), ErrorKind::Failed);
/// assert_eq!(err.to_string(), "disk is full");
///
/// let io = Error::new(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
/// assert!(io.downcast_ref::<std::io::Error>().is_some());
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// An ordinary failure raised by user code.
    #[error(transparent)]
    Failed(Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// The executing thread was asked to stop.
    #[error("computation was cancelled")]
    Cancelled,

    /// A retry exit condition rejected the very first attempt.
    #[error("an immediate exit, didn't have a chance to try at least once")]
    NoAttempts,

    /// No fallback handler applied to the failure.
    #[error("no fallback found for failure: {cause}")]
    NoFallback {
        /// The failure nobody could recover from.
        #[source]
        cause: Box<Error>,
    },

    /// The computation panicked.
    #[error("computation panicked: {0}")]
    Panicked(String),
}

/// Discriminant of an [`Error`], convenient for matching and fallback selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// See [`Error::Failed`].
    Failed,
    /// See [`Error::Cancelled`].
    Cancelled,
    /// See [`Error::NoAttempts`].
    NoAttempts,
    /// See [`Error::NoFallback`].
    NoFallback,
    /// See [`Error::Panicked`].
    Panicked,
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}

impl Error {
    /// Wrap any error as an ordinary failure.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Failed(Arc::new(error))
    }

    /// Create an ordinary failure from a message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::Failed(Arc::new(Message(message.to_string())))
    }

    /// Build the error for a panic payload caught with `catch_unwind`.
    pub(crate) fn panicked(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Self::Panicked(message)
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Failed(_) => ErrorKind::Failed,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::NoAttempts => ErrorKind::NoAttempts,
            Self::NoFallback { .. } => ErrorKind::NoFallback,
            Self::Panicked(_) => ErrorKind::Panicked,
        }
    }

    /// Returns true if the failure means the thread was asked to stop.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Attempt to view the user error as a concrete type.
    ///
    /// Only [`Error::Failed`] carries a user error; other variants return `None`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Failed(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// The failure a [`Error::NoFallback`] wraps, if this is one.
    pub fn cause(&self) -> Option<&Error> {
        match self {
            Self::NoFallback { cause } => Some(cause),
            _ => None,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Failed(a), Self::Failed(b)) => {
                Arc::ptr_eq(a, b) || a.to_string() == b.to_string()
            }
            (Self::NoFallback { cause: a }, Self::NoFallback { cause: b }) => a == b,
            (Self::Panicked(a), Self::Panicked(b)) => a == b,
            (a, b) => a.kind() == b.kind() && a.kind() != ErrorKind::Failed,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::new(error)
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    #[test]
    fn test_msg_display() {
        assert_eq!(Error::msg("boom").to_string(), "boom");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Error::msg("x").kind(), ErrorKind::Failed);
        assert_eq!(Error::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(Error::NoAttempts.kind(), ErrorKind::NoAttempts);
        assert_eq!(Error::Panicked("p".into()).kind(), ErrorKind::Panicked);
        let nf = Error::NoFallback {
            cause: Box::new(Error::msg("x")),
        };
        assert_eq!(nf.kind(), ErrorKind::NoFallback);
    }

    #[test]
    fn test_downcast_ref() {
        let err = Error::new(QuotaExceeded);
        assert!(err.downcast_ref::<QuotaExceeded>().is_some());
        assert!(err.downcast_ref::<std::io::Error>().is_none());
        assert!(Error::Cancelled.downcast_ref::<QuotaExceeded>().is_none());
    }

    #[test]
    fn test_equality_by_message() {
        assert_eq!(Error::msg("same"), Error::msg("same"));
        assert_ne!(Error::msg("one"), Error::msg("two"));
        assert_eq!(Error::Cancelled, Error::Cancelled);
        assert_ne!(Error::Cancelled, Error::NoAttempts);
    }

    #[test]
    fn test_no_fallback_source_chain() {
        use std::error::Error as _;

        let err = Error::NoFallback {
            cause: Box::new(Error::msg("root cause")),
        };
        assert!(err.to_string().contains("root cause"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("root cause".into()));
        assert_eq!(err.cause(), Some(&Error::msg("root cause")));
    }

    #[test]
    fn test_clone_shares_inner() {
        let err = Error::new(QuotaExceeded);
        let copy = err.clone();
        assert_eq!(err, copy);
    }

    #[test]
    fn test_panicked_payloads() {
        let from_str = Error::panicked(Box::new("static"));
        assert_eq!(from_str, Error::Panicked("static".into()));
        let from_string = Error::panicked(Box::new(String::from("owned")));
        assert_eq!(from_string, Error::Panicked("owned".into()));
        let other = Error::panicked(Box::new(7_u8));
        assert_eq!(other.kind(), ErrorKind::Panicked);
    }
}
