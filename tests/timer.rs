use std::time::Duration;

use pixen::timer::{Profiler, Stopwatch};

#[test]
fn stopwatch_measures_elapsed_time() {
    let mut watch = Stopwatch::new();
    watch.start();
    std::thread::sleep(Duration::from_millis(5));
    let elapsed = watch.stop();
    assert!(elapsed >= 5_000, "expected >= 5000 us, got {elapsed}");
    assert!(!watch.is_running());
}

#[test]
fn stop_and_start_chains_measurements() {
    let mut watch = Stopwatch::new();
    watch.start();
    let first = watch.stop_and_start();
    let second = watch.stop();
    // both measurements are valid and independent
    assert!(first < 1_000_000);
    assert!(second < 1_000_000);
}

#[test]
fn misuse_warns_but_does_not_panic() {
    let mut watch = Stopwatch::new();
    // stop while idle
    let _ = watch.stop();
    // double start
    watch.start();
    watch.start();
    assert!(watch.is_running());
    let _ = watch.stop();
}

#[test]
fn profiler_accumulates_counts_per_probe() {
    let mut profiler = Profiler::new();
    profiler.init_probes(&["alpha", "beta"]);

    profiler.probe(0);
    profiler.probe(1);
    profiler.probe(0);

    assert_eq!(profiler.probe_count(0), 2);
    assert_eq!(profiler.probe_count(1), 1);
    assert_eq!(profiler.probe_name(0), "alpha");
    assert_eq!(profiler.probe_name(1), "beta");
}

#[test]
fn profiler_probe_values_grow_with_time() {
    let mut profiler = Profiler::new();
    profiler.init_probes(&["slow"]);
    std::thread::sleep(Duration::from_millis(3));
    profiler.probe(0);
    assert!(profiler.probe_value(0) >= 3_000);
}

#[test]
fn out_of_range_probe_is_reported_not_fatal() {
    let mut profiler = Profiler::new();
    profiler.init_probes(&["only"]);
    profiler.probe(7); // logged, ignored
    assert_eq!(profiler.probe_count(7), 0);
    assert_eq!(profiler.probe_value(7), 0);
    assert_eq!(profiler.probe_name(7), "");
}

#[test]
fn init_probes_resets_previous_data() {
    let mut profiler = Profiler::new();
    profiler.init_probes(&["a"]);
    profiler.probe(0);
    profiler.init_probes(&["a", "b"]);
    assert_eq!(profiler.probe_count(0), 0);
}

#[test]
fn print_stats_handles_unused_probes() {
    let mut profiler = Profiler::new();
    profiler.init_probes(&["used", "never"]);
    profiler.probe(0);
    // must not divide by a zero count
    profiler.print_stats("stats");
}
