//! Cooperative cancellation.
//!
//! Every thread owns a cancellation flag. Raising it does not stop anything by
//! itself: scalars observe it at their own boundaries ([`checkpoint`],
//! [`sleep`]) and fail with [`Error::Cancelled`]. A component that observes a
//! cancellation re-asserts it with [`interrupt`] so that code further up the
//! stack still sees the request.
//!
//! # Example
//!
//! ```rust
//! use steadfast::cancel;
//! use std::time::Duration;
//!
//! let handle = std::thread::spawn(|| {
//!     let me = cancel::current();
//!     me.interrupt();
//!     cancel::sleep(Duration::from_secs(60))
//! });
//!
//! assert!(handle.join().unwrap().is_err());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Thread};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

#[derive(Debug)]
struct Flag {
    raised: AtomicBool,
    thread: Thread,
}

thread_local! {
    static CURRENT: Arc<Flag> = Arc::new(Flag {
        raised: AtomicBool::new(false),
        thread: thread::current(),
    });
}

/// Handle to another thread's cancellation flag.
///
/// Obtained with [`current`] on the thread that should be cancellable and
/// then moved to whoever decides to cancel it.
#[derive(Debug, Clone)]
pub struct Interrupter {
    flag: Arc<Flag>,
}

impl Interrupter {
    /// Raise the target thread's flag and wake it if it is sleeping.
    pub fn interrupt(&self) {
        self.flag.raised.store(true, Ordering::SeqCst);
        self.flag.thread.unpark();
    }

    /// Returns true if the target thread's flag is raised.
    pub fn is_interrupted(&self) -> bool {
        self.flag.raised.load(Ordering::SeqCst)
    }
}

/// Handle to the current thread's flag.
pub fn current() -> Interrupter {
    CURRENT.with(|flag| Interrupter { flag: flag.clone() })
}

/// Raise the current thread's flag.
///
/// Used to re-assert a cancellation that was observed as an [`Error::Cancelled`].
pub fn interrupt() {
    CURRENT.with(|flag| flag.raised.store(true, Ordering::SeqCst));
}

/// Returns true if the current thread's flag is raised. Does not clear it.
pub fn is_interrupted() -> bool {
    CURRENT.with(|flag| flag.raised.load(Ordering::SeqCst))
}

/// Returns true if the current thread's flag was raised, clearing it.
pub fn interrupted() -> bool {
    CURRENT.with(|flag| flag.raised.swap(false, Ordering::SeqCst))
}

/// Fail with [`Error::Cancelled`] if the current thread was interrupted.
///
/// Clears the flag, the same way a failed [`sleep`] does. Callers that want to
/// keep the request visible re-assert it with [`interrupt`].
pub fn checkpoint() -> Result<()> {
    if interrupted() {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}

/// Block the current thread for `duration`, waking early on interruption.
///
/// Returns [`Error::Cancelled`] (and clears the flag) if the thread is
/// interrupted before or while sleeping.
pub fn sleep(duration: Duration) -> Result<()> {
    let deadline = Instant::now() + duration;
    loop {
        checkpoint()?;
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        // unpark() from an Interrupter ends the park early; spurious wakeups
        // just loop around.
        thread::park_timeout(deadline - now);
    }
}
