//! Tests for the retry loop.

use super::*;
use crate::scalar::{fail, from_fn};
use crate::testing::{Counting, Flaky};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

#[test]
fn test_exhaustion_invokes_exactly_attempts_times() {
    let counted = Counting::new(fail::<()>(Error::msg("always fails")));
    let retry = Retry::with_attempts(&counted, 3);

    assert_eq!(retry.value(), Err(Error::msg("always fails")));
    assert_eq!(counted.count(), 3);
}

#[test]
fn test_succeeds_on_third_attempt() {
    let flaky = Counting::new(Flaky::new(2, "success"));
    let retry = Retry::with_attempts(&flaky, 5);

    assert_eq!(retry.value(), Ok("success"));
    assert_eq!(flaky.count(), 3);
}

#[test]
fn test_default_is_three_attempts() {
    let counted = Counting::new(fail::<u8>(Error::msg("x")));
    assert!(Retry::new(&counted).value().is_err());
    assert_eq!(counted.count(), 3);
}

#[test]
fn test_immediate_exit_reports_no_attempts() {
    let counted = Counting::new(from_fn(|| Ok(1)));
    let retry = Retry::with_attempts(&counted, 0);

    assert_eq!(retry.value(), Err(Error::NoAttempts));
    assert_eq!(counted.count(), 0);
}

#[test]
fn test_returns_last_failure() {
    let calls = AtomicU32::new(0);
    let scalar = from_fn(|| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(Error::msg(format!("failure #{n}")))
    });

    assert_eq!(
        Retry::with_attempts(scalar, 4).value(),
        Err(Error::msg("failure #3"))
    );
}

#[test]
fn test_custom_exit_condition_sees_attempt_numbers() {
    let seen = std::sync::Mutex::new(Vec::new());
    let exit = |attempt: u32| {
        seen.lock().unwrap().push(attempt);
        attempt >= 2
    };
    let retry = Retry::with_exit(fail::<()>(Error::msg("x")), exit);

    assert!(retry.value().is_err());
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_cancellation_stops_retrying_and_is_reasserted() {
    let counted = Counting::new(fail::<()>(Error::Cancelled));
    let retry = Retry::with_attempts(&counted, 5);

    assert_eq!(retry.value(), Err(Error::Cancelled));
    assert_eq!(counted.count(), 1);
    assert!(cancel::interrupted());
}

#[test]
fn test_cancellation_skips_delay() {
    let counted = Counting::new(fail::<()>(Error::Cancelled));
    let retry = Retry::with_attempts(&counted, 5).with_delay(Duration::from_secs(30));

    let start = Instant::now();
    assert_eq!(retry.value(), Err(Error::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(counted.count(), 1);
    assert!(cancel::interrupted());
}

#[test]
fn test_interrupted_delay_stops_retrying() {
    let counted = Counting::new(from_fn(|| {
        // Raise the flag so the following delay is cut short.
        cancel::interrupt();
        Err::<(), _>(Error::msg("transient"))
    }));
    let retry = Retry::with_attempts(&counted, 5).with_delay(Duration::from_secs(30));

    let start = Instant::now();
    assert_eq!(retry.value(), Err(Error::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(counted.count(), 1);
    assert!(cancel::interrupted());
}

#[test]
fn test_delay_between_attempts() {
    let retry = Retry::with_attempts(fail::<()>(Error::msg("x")), 3)
        .with_delay(Duration::from_millis(10));

    let start = Instant::now();
    assert!(retry.value().is_err());
    // A delay follows each of the three failures.
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn test_retry_if_skips_permanent_failures() {
    let counted = Counting::new(fail::<()>(Error::msg("permanent")));
    let retry = Retry::with_attempts(&counted, 5).retry_if(|e| e.to_string() != "permanent");

    assert_eq!(retry.value(), Err(Error::msg("permanent")));
    assert_eq!(counted.count(), 1);
}

#[test]
fn test_retry_if_retries_transient_failures() {
    let flaky = Counting::new(Flaky::new(2, 7));
    let retry = Retry::with_attempts(&flaky, 5).retry_if(|e| e.to_string().contains("flaky"));

    assert_eq!(retry.value(), Ok(7));
    assert_eq!(flaky.count(), 3);
}

#[test]
fn test_retry_is_reusable() {
    let flaky = Flaky::new(1, "ok");
    let retry = Retry::with_attempts(&flaky, 2);

    assert_eq!(retry.value(), Ok("ok"));
    // Flaky only fails on its first invocation overall.
    assert_eq!(retry.value(), Ok("ok"));
}

#[test]
fn test_from_config() {
    let config = RetryConfig {
        attempts: 2,
        backoff: Backoff::constant(Duration::from_millis(1)),
    };
    let counted = Counting::new(fail::<()>(Error::msg("x")));
    let retry = Retry::from_config(&counted, &config);

    assert!(retry.value().is_err());
    assert_eq!(counted.count(), 2);
    assert_eq!(retry.backoff(), &config.backoff);
}

#[cfg(feature = "serde")]
#[test]
fn test_config_json() {
    let json = r#"{"attempts":5,"backoff":{"strategy":{"exponential":{"base":{"secs":0,"nanos":1000000}}}}}"#;
    let config: RetryConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.attempts, 5);
    assert_eq!(
        config.backoff,
        Backoff::exponential(Duration::from_millis(1))
    );

    let defaults: RetryConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, RetryConfig::default());
}

#[cfg(feature = "tracing")]
mod logging {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logs_failed_attempts_and_give_up() {
        let retry = Retry::with_attempts(fail::<()>(Error::msg("db down")), 2);
        assert!(retry.value().is_err());

        assert!(logs_contain("attempt failed"));
        assert!(logs_contain("db down"));
        assert!(logs_contain("retry gave up"));
    }
}
