//! Delay schedules between retry attempts.

use std::time::Duration;

/// How long a [`Retry`](crate::Retry) waits after a failed attempt.
///
/// Backoffs are plain data: they describe the schedule, the retry loop does
/// the sleeping. The default is no delay at all.
///
/// # Examples
///
/// ```rust
/// use steadfast::Backoff;
/// use std::time::Duration;
///
/// let backoff = Backoff::exponential(Duration::from_millis(100))
///     .with_max_delay(Duration::from_millis(300));
///
/// assert_eq!(backoff.base_delay(0), Duration::from_millis(100));
/// assert_eq!(backoff.base_delay(1), Duration::from_millis(200));
/// assert_eq!(backoff.base_delay(2), Duration::from_millis(300)); // capped
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Backoff {
    strategy: Strategy,
    #[cfg_attr(feature = "serde", serde(default))]
    max_delay: Option<Duration>,
    #[cfg_attr(feature = "serde", serde(default))]
    jitter: Jitter,
}

/// The shape of the delay schedule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Same delay after every attempt.
    Constant(Duration),
    /// base * (attempt + 1).
    Linear {
        /// Base delay.
        base: Duration,
    },
    /// base * 2^attempt.
    Exponential {
        /// Base delay.
        base: Duration,
    },
    /// base * fib(attempt + 1).
    Fibonacci {
        /// Base delay.
        base: Duration,
    },
}

/// Randomness added on top of the computed delay.
///
/// Only takes effect with the `jitter` feature; without it every variant
/// leaves the delay untouched.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Jitter {
    /// Use the computed delay as is.
    #[default]
    None,
    /// Add up to ±factor of the delay.
    Proportional(f64),
    /// Pick uniformly between zero and the computed delay.
    Full,
}

impl Backoff {
    /// No delay between attempts.
    pub fn none() -> Self {
        Self::constant(Duration::ZERO)
    }

    /// The same delay after every failed attempt.
    pub fn constant(delay: Duration) -> Self {
        Self::from_strategy(Strategy::Constant(delay))
    }

    /// Linearly growing delay: 1x, 2x, 3x, ...
    ///
    /// ```rust
    /// use steadfast::Backoff;
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::linear(Duration::from_millis(100));
    /// assert_eq!(backoff.base_delay(0), Duration::from_millis(100));
    /// assert_eq!(backoff.base_delay(2), Duration::from_millis(300));
    /// ```
    pub fn linear(base: Duration) -> Self {
        Self::from_strategy(Strategy::Linear { base })
    }

    /// Doubling delay: 1x, 2x, 4x, ...
    pub fn exponential(base: Duration) -> Self {
        Self::from_strategy(Strategy::Exponential { base })
    }

    /// Fibonacci delay: 1x, 1x, 2x, 3x, 5x, ...
    pub fn fibonacci(base: Duration) -> Self {
        Self::from_strategy(Strategy::Fibonacci { base })
    }

    fn from_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            max_delay: None,
            jitter: Jitter::None,
        }
    }

    /// Never wait longer than `max`, whatever the strategy computes.
    pub fn with_max_delay(mut self, max: Duration) -> Self {
        self.max_delay = Some(max);
        self
    }

    /// Add ±`factor` proportional jitter, clamped to `0.0..=1.0`.
    ///
    /// A non-finite factor means no jitter.
    pub fn with_jitter(mut self, factor: f64) -> Self {
        self.jitter = Jitter::Proportional(jitter_factor(factor));
        self
    }

    /// Pick each delay uniformly between zero and the computed delay.
    pub fn with_full_jitter(mut self) -> Self {
        self.jitter = Jitter::Full;
        self
    }

    /// The schedule's shape.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// The delay cap, if any.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// The jitter applied on top of the schedule.
    pub fn jitter(&self) -> &Jitter {
        &self.jitter
    }

    /// Delay after the failed attempt `attempt` (zero-based), before jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let delay = match &self.strategy {
            Strategy::Constant(d) => *d,
            Strategy::Linear { base } => base.saturating_mul(attempt.saturating_add(1)),
            Strategy::Exponential { base } => base.saturating_mul(2u32.saturating_pow(attempt)),
            Strategy::Fibonacci { base } => base.saturating_mul(fibonacci(attempt.saturating_add(1))),
        };
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// Delay after the failed attempt `attempt`, with jitter applied.
    pub fn delay(&self, attempt: u32) -> Duration {
        let jittered = self.jitter.apply(self.base_delay(attempt));
        match self.max_delay {
            Some(max) => jittered.min(max),
            None => jittered,
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::none()
    }
}

impl Jitter {
    /// Apply this jitter to `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            Jitter::None => delay,
            #[cfg(feature = "jitter")]
            Jitter::Proportional(factor) => {
                use rand::Rng;
                let millis = delay.as_millis() as f64;
                let spread = millis * jitter_factor(*factor);
                let low = (millis - spread).max(0.0);
                let high = millis + spread;
                if high <= low {
                    delay
                } else {
                    Duration::from_millis(rand::rng().random_range(low..=high) as u64)
                }
            }
            #[cfg(feature = "jitter")]
            Jitter::Full => {
                use rand::Rng;
                let millis = delay.as_millis() as u64;
                if millis == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_millis(rand::rng().random_range(0..=millis))
                }
            }
            #[cfg(not(feature = "jitter"))]
            Jitter::Proportional(_) | Jitter::Full => delay,
        }
    }
}

/// Jitter factors outside `0.0..=1.0` are clamped; NaN and infinities become 0.
fn jitter_factor(factor: f64) -> f64 {
    if factor.is_finite() {
        factor.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// fib(1) = fib(2) = 1, saturating.
fn fibonacci(n: u32) -> u32 {
    let (mut a, mut b) = (0u32, 1u32);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}
