#![cfg(unix)]

mod common;

use common::{ScriptedProbe, is_alive, kill_process, pid_recording_command, read_pid, test_config};

use op_supervisor::error::{EXIT_NOT_READY, EXIT_STARTUP};
use op_supervisor::{ReadinessOutcome, Supervisor, SupervisorError, SupervisorState};

use op_config::WorkerSetting;

use std::time::Duration;

use googletest::prelude::*;
use tempfile::TempDir;

// =========================================================================
// Success path
// =========================================================================

#[tokio::test]
async fn given_ready_when_run_then_plan_returned_and_token_manager_left_running() {
    // Given
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("token_manager.pid");
    let mut config = test_config(pid_recording_command(&pid_file));
    config.server.workers = WorkerSetting::Auto;
    let probe = ScriptedProbe::new(&pid_file, ReadinessOutcome::Ready);

    // When
    let mut supervisor = Supervisor::new(&config, &probe).with_parallelism(|| Ok(4));
    let plan = supervisor.run(&[]).await.unwrap();

    // Then
    let pid = read_pid(&pid_file).unwrap();
    assert!(is_alive(pid), "token manager must survive handoff");
    assert_that!(probe.calls(), eq(1));
    assert_that!(plan.program.as_str(), eq("uvicorn"));
    assert_that!(plan.args.last().map(String::as_str), some(eq("4")));
    assert_that!(supervisor.state(), eq(SupervisorState::HandedOff));
    assert_that!(
        supervisor.history().to_vec(),
        elements_are![
            eq(&SupervisorState::Starting),
            eq(&SupervisorState::AwaitingReadiness),
            eq(&SupervisorState::Ready),
            eq(&SupervisorState::HandedOff)
        ]
    );

    kill_process(pid);
}

#[tokio::test]
async fn given_zero_detected_cpus_when_run_then_one_worker() {
    // Given
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("token_manager.pid");
    let config = test_config(pid_recording_command(&pid_file));
    let probe = ScriptedProbe::new(&pid_file, ReadinessOutcome::Ready);

    // When
    let plan = Supervisor::new(&config, &probe)
        .with_parallelism(|| Ok(0))
        .run(&[])
        .await
        .unwrap();

    // Then
    assert_that!(plan.args.last().map(String::as_str), some(eq("1")));

    kill_process(read_pid(&pid_file).unwrap());
}

#[tokio::test]
async fn given_explicit_workers_and_passthrough_when_run_then_both_forwarded_verbatim() {
    // Given
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("token_manager.pid");
    let mut config = test_config(pid_recording_command(&pid_file));
    config.server.workers = WorkerSetting::Explicit(String::from("007"));
    let probe = ScriptedProbe::new(&pid_file, ReadinessOutcome::Ready);

    // When
    let plan = Supervisor::new(&config, &probe)
        .with_parallelism(|| Ok(64))
        .run(&[String::from("--reload")])
        .await
        .unwrap();

    // Then
    let workers_at = plan.args.iter().position(|arg| arg == "--workers").unwrap();
    assert_that!(plan.args[workers_at + 1].as_str(), eq("007"));
    assert_that!(plan.args.last().map(String::as_str), some(eq("--reload")));
    assert_that!(plan.args.len(), eq(workers_at + 3));

    kill_process(read_pid(&pid_file).unwrap());
}

// =========================================================================
// Failure path
// =========================================================================

#[tokio::test]
async fn given_timed_out_when_run_then_token_manager_stopped_and_not_ready() {
    // Given
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("token_manager.pid");
    let config = test_config(pid_recording_command(&pid_file));
    let probe = ScriptedProbe::new(&pid_file, ReadinessOutcome::TimedOut);

    // When
    let mut supervisor = Supervisor::new(&config, &probe);
    let result = supervisor.run(&[]).await;

    // Then
    let error = result.unwrap_err();
    assert!(matches!(error, SupervisorError::NotReady { .. }), "{error:?}");
    assert_that!(error.exit_code(), eq(EXIT_NOT_READY));
    assert_that!(error.to_string(), contains_substring("not initialised"));

    let pid = read_pid(&pid_file).unwrap();
    assert!(!is_alive(pid), "token manager must be stopped and reaped");
    assert_that!(
        supervisor.history().to_vec(),
        elements_are![
            eq(&SupervisorState::Starting),
            eq(&SupervisorState::AwaitingReadiness),
            eq(&SupervisorState::FailedReadiness),
            eq(&SupervisorState::Terminated)
        ]
    );
}

#[tokio::test]
async fn given_probe_error_when_run_then_same_teardown_with_reason() {
    // Given
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("token_manager.pid");
    let config = test_config(pid_recording_command(&pid_file));
    let probe = ScriptedProbe::new(
        &pid_file,
        ReadinessOutcome::Error(String::from("database is locked")),
    );

    // When
    let mut supervisor = Supervisor::new(&config, &probe);
    let error = supervisor.run(&[]).await.unwrap_err();

    // Then
    assert!(matches!(error, SupervisorError::ReadinessFailed { .. }), "{error:?}");
    assert_that!(error.exit_code(), eq(EXIT_NOT_READY));
    assert_that!(error.to_string(), contains_substring("database is locked"));
    assert!(!is_alive(read_pid(&pid_file).unwrap()));
    assert_that!(supervisor.state(), eq(SupervisorState::Terminated));
}

#[tokio::test]
async fn given_token_manager_ignores_sigterm_when_readiness_fails_then_killed() {
    // Given
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("token_manager.pid");
    let command = format!(
        "sh -c 'trap \"\" TERM; echo $$ > {}; while true; do sleep 1; done'",
        pid_file.display()
    );
    let mut config = test_config(command);
    config.token_manager.stop_timeout = Duration::from_millis(300);
    let probe = ScriptedProbe::new(&pid_file, ReadinessOutcome::TimedOut);

    // When
    let error = Supervisor::new(&config, &probe).run(&[]).await.unwrap_err();

    // Then
    assert_that!(error.exit_code(), eq(EXIT_NOT_READY));
    assert!(!is_alive(read_pid(&pid_file).unwrap()));
}

#[tokio::test]
async fn given_missing_token_manager_when_run_then_launch_error_and_probe_not_called() {
    // Given
    let temp = TempDir::new().unwrap();
    let pid_file = temp.path().join("token_manager.pid");
    let config = test_config(String::from("/nonexistent/open115/token-manager"));
    let probe = ScriptedProbe::new(&pid_file, ReadinessOutcome::Ready);

    // When
    let mut supervisor = Supervisor::new(&config, &probe);
    let error = supervisor.run(&[]).await.unwrap_err();

    // Then
    assert!(matches!(error, SupervisorError::ProcessLaunch { .. }), "{error:?}");
    assert_that!(error.exit_code(), eq(EXIT_STARTUP));
    assert_that!(probe.calls(), eq(0));
    assert_that!(supervisor.state(), eq(SupervisorState::Starting));
}
