//! Exit conditions for the retry loop.

/// Decides whether the retry loop stops before attempt `attempt` (zero-based).
///
/// Any `Fn(u32) -> bool` is an exit condition.
///
/// ```rust
/// use steadfast::{Attempts, ExitCondition};
///
/// assert!(!Attempts(2).exit(1));
/// assert!(Attempts(2).exit(2));
///
/// let until_ten = |attempt: u32| attempt >= 10;
/// assert!(until_ten.exit(10));
/// ```
pub trait ExitCondition {
    /// Returns true to stop trying.
    fn exit(&self, attempt: u32) -> bool;
}

impl<F> ExitCondition for F
where
    F: Fn(u32) -> bool,
{
    fn exit(&self, attempt: u32) -> bool {
        self(attempt)
    }
}

/// Stop once `n` attempts have been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempts(pub u32);

impl Default for Attempts {
    fn default() -> Self {
        Attempts(3)
    }
}

impl ExitCondition for Attempts {
    fn exit(&self, attempt: u32) -> bool {
        attempt >= self.0
    }
}
