//! Solid under contention: many threads, one computation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use steadfast::prelude::*;

const CALLERS: usize = 50;

#[test]
fn test_fifty_callers_one_execution() {
    let executions = Arc::new(AtomicUsize::new(0));
    let solid = Arc::new(Solid::new(from_fn({
        let executions = executions.clone();
        move || {
            let n = executions.fetch_add(1, Ordering::SeqCst);
            // Keep the first execution in flight while the others arrive.
            thread::sleep(Duration::from_millis(50));
            Ok(vec![n, 1, 2])
        }
    })));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let solid = solid.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                solid.value()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(executions.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| r == &Ok(vec![0, 1, 2])));
}

#[test]
fn test_fifty_callers_share_cached_failure() {
    let executions = AtomicUsize::new(0);
    let solid = Solid::new(from_fn(|| {
        executions.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Err::<u64, _>(Error::msg("entropy source unavailable"))
    }));

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CALLERS).map(|_| scope.spawn(|| solid.value())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(executions.load(Ordering::SeqCst), 1);
    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Failed);
        assert_eq!(err.to_string(), "entropy source unavailable");
    }
    // Still cached after the storm.
    assert_eq!(solid.value(), Err(Error::msg("entropy source unavailable")));
    assert_eq!(executions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_solid_over_parallel_reducer() {
    let evaluations = AtomicUsize::new(0);
    let check = |n: &i32| {
        evaluations.fetch_add(1, Ordering::SeqCst);
        *n % 2 == 0
    };
    let all_even = AndInThreads::matching(check, vec![2, 4, 6, 8]).solid();

    assert_eq!(all_even.value(), Ok(true));
    assert_eq!(all_even.value(), Ok(true));
    assert_eq!(evaluations.load(Ordering::SeqCst), 4);
}

#[test]
fn test_warm_reads_from_many_threads() {
    let solid = Solid::new(constant(String::from("warm")));
    assert_eq!(solid.value().unwrap(), "warm");

    thread::scope(|scope| {
        for _ in 0..CALLERS {
            scope.spawn(|| assert_eq!(solid.value().unwrap(), "warm"));
        }
    });
}
