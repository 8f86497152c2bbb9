// ABOUTME: Integration tests for the remote lifecycle typestate machine.
// ABOUTME: Exercises ordering, not-found tolerance, and short-circuit on fatal steps.

mod support;

use std::sync::Arc;
use support::{ScriptedShell, ShellState, failed_output};
use vnollx_deploy::config::TargetRegistry;
use vnollx_deploy::deploy::{Lifecycle, LifecycleError};
use vnollx_deploy::types::{ImageRef, VersionTag};

fn image() -> ImageRef {
    let tag = VersionTag::new("2.0.1").unwrap();
    ImageRef::qualified("vnollx", "vnollx", &tag).unwrap()
}

/// Drive the whole stage, prune included, against a scripted shell.
async fn run_full(state: &Arc<ShellState>) -> Result<(), LifecycleError> {
    let registry = TargetRegistry::builtin();
    let target = registry.get("1").unwrap();
    let image = image();
    let mut shell = ScriptedShell::new(Arc::clone(state));

    let stage = Lifecycle::new(&mut shell, target, &image);
    let stage = stage.pull().await?;
    let stage = stage.stop_existing().await?;
    let stage = stage.remove_existing().await?;
    let stage = stage.start().await?;
    stage.prune().await
}

#[tokio::test]
async fn full_sequence_runs_in_fixed_order() {
    let state = Arc::new(ShellState::default());
    run_full(&state).await.unwrap();

    assert_eq!(
        state.commands(),
        vec![
            "docker pull vnollx/vnollx:2.0.1",
            "docker stop vnollx",
            "docker rm vnollx",
            "docker run -d --name vnollx --network app-network -p 8080:8080 vnollx/vnollx:2.0.1",
            "docker image prune -f",
        ]
    );
}

#[tokio::test]
async fn first_deploy_reaches_the_same_terminal_state_as_a_replacement() {
    // Replacement deploy: stop and rm find a running container.
    let existing = Arc::new(ShellState::default());
    run_full(&existing).await.unwrap();

    // First deploy: the daemon reports no such container for both.
    let fresh = Arc::new(ShellState::default());
    fresh.fail_when(
        "docker stop",
        failed_output("Error response from daemon: No such container: vnollx"),
    );
    fresh.fail_when(
        "docker rm",
        failed_output("Error response from daemon: No such container: vnollx"),
    );
    run_full(&fresh).await.unwrap();

    assert_eq!(existing.commands(), fresh.commands());
}

#[tokio::test]
async fn pull_failure_short_circuits_the_stage() {
    let state = Arc::new(ShellState::default());
    state.fail_when("docker pull", failed_output("manifest unknown"));

    let err = run_full(&state).await.unwrap_err();

    assert!(matches!(err, LifecycleError::PullFailed { .. }));
    assert_eq!(state.commands().len(), 1);
}

#[tokio::test]
async fn stop_error_other_than_not_found_is_fatal() {
    let state = Arc::new(ShellState::default());
    state.fail_when(
        "docker stop",
        failed_output("Error response from daemon: permission denied"),
    );

    let err = run_full(&state).await.unwrap_err();

    match err {
        LifecycleError::StopFailed { container, detail } => {
            assert_eq!(container, "vnollx");
            assert!(detail.contains("permission denied"));
        }
        other => panic!("expected StopFailed, got: {other}"),
    }
    assert_eq!(state.commands().len(), 2);
}

#[tokio::test]
async fn remove_not_found_is_tolerated_on_its_own() {
    let state = Arc::new(ShellState::default());
    state.fail_when(
        "docker rm",
        failed_output("Error response from daemon: No such container: vnollx"),
    );

    run_full(&state).await.unwrap();
    assert_eq!(state.commands().len(), 5);
}

#[tokio::test]
async fn start_failure_reports_the_container_and_skips_prune() {
    let state = Arc::new(ShellState::default());
    state.fail_when(
        "docker run",
        failed_output("Error response from daemon: port is already allocated"),
    );

    let err = run_full(&state).await.unwrap_err();

    assert!(matches!(err, LifecycleError::StartFailed { .. }));
    assert!(err.to_string().contains("vnollx"));
    assert!(!state.commands().iter().any(|c| c.contains("prune")));
}

#[tokio::test]
async fn prune_failure_surfaces_as_its_own_error() {
    let state = Arc::new(ShellState::default());
    state.fail_when(
        "docker image prune",
        failed_output("a prune operation is already running"),
    );

    let err = run_full(&state).await.unwrap_err();

    assert!(matches!(err, LifecycleError::PruneFailed { .. }));
    // Everything before prune completed.
    assert_eq!(state.commands().len(), 5);
}
