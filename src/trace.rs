//! Internal logging macros.
//!
//! `warning!` forwards to `tracing::warn!`; a local `warn` would clash with
//! the built-in lint attribute.
//!
//! They forward to `tracing` when the `tracing` feature is enabled and expand
//! to nothing otherwise.

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::trace!($($arg)*);
        }
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::debug!($($arg)*);
        }
    };
}

macro_rules! warning {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::warn!($($arg)*);
        }
    };
}

pub(crate) use {debug, trace, warning};
