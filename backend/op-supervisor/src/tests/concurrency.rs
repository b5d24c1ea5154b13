use crate::concurrency::{host_parallelism, resolve_workers};

use op_config::WorkerSetting;

use std::io;

use googletest::prelude::*;

fn detect_fails() -> io::Result<usize> {
    Err(io::Error::other("no cgroup information"))
}

fn explicit(text: &str) -> WorkerSetting {
    WorkerSetting::Explicit(text.to_string())
}

// =========================================================================
// Explicit settings
// =========================================================================

#[test]
fn given_explicit_three_when_resolve_then_three_regardless_of_cpus() {
    assert_that!(resolve_workers(&explicit("3"), || Ok(64)).as_str(), eq("3"));
}

#[test]
fn given_explicit_degenerate_values_when_resolve_then_passed_through() {
    for count in ["0", "-1", "-8", "99999999999999999999"] {
        assert_that!(resolve_workers(&explicit(count), || Ok(4)).as_str(), eq(count));
    }
}

#[test]
fn given_padded_or_signed_value_when_resolve_then_text_unchanged() {
    assert_that!(resolve_workers(&explicit("007"), || Ok(4)).as_str(), eq("007"));
    assert_that!(resolve_workers(&explicit("+3"), || Ok(4)).as_str(), eq("+3"));
}

#[test]
fn given_explicit_value_when_resolve_then_detection_not_consulted() {
    let mut called = false;

    let workers = resolve_workers(&explicit("2"), || {
        called = true;
        Ok(16)
    });

    assert_that!(workers.as_str(), eq("2"));
    assert!(!called);
}

// =========================================================================
// Auto detection
// =========================================================================

#[test]
fn given_auto_and_four_cpus_when_resolve_then_four() {
    assert_that!(resolve_workers(&WorkerSetting::Auto, || Ok(4)).as_str(), eq("4"));
}

#[test]
fn given_auto_and_zero_cpus_when_resolve_then_one() {
    assert_that!(resolve_workers(&WorkerSetting::Auto, || Ok(0)).as_str(), eq("1"));
}

#[test]
fn given_auto_and_detection_failure_when_resolve_then_one() {
    assert_that!(resolve_workers(&WorkerSetting::Auto, detect_fails).as_str(), eq("1"));
}

#[test]
fn given_same_inputs_when_resolve_twice_then_same_result() {
    let first = resolve_workers(&WorkerSetting::Auto, host_parallelism);
    let second = resolve_workers(&WorkerSetting::Auto, host_parallelism);

    assert_that!(first, eq(&second));
    assert_that!(first.parse::<usize>().unwrap(), ge(1));
}
