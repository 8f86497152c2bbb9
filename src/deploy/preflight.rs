// ABOUTME: Environment preflight gates run before any mutating action.
// ABOUTME: Verifies the local engine is up and the operator is logged in to the registry.

use crate::exec::CommandRunner;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("container engine is not running: {0}")]
    EngineNotRunning(String),

    #[error("not logged in to the registry; run `docker login` and retry")]
    NotAuthenticated,

    #[error(transparent)]
    Exec(#[from] crate::exec::Error),
}

/// Check that the local container engine answers `docker info`.
pub async fn check_engine<R>(runner: &R) -> Result<(), PreflightError>
where
    R: CommandRunner + ?Sized,
{
    let output = runner.run("docker", &["info"], None).await?;
    if output.success() {
        Ok(())
    } else {
        Err(PreflightError::EngineNotRunning(output.detail()))
    }
}

/// Check registry authentication via `docker login`.
///
/// Runs non-interactively against the stored credentials; when the operator
/// has never logged in, the command fails and the error tells them to do so
/// themselves.
pub async fn check_registry_auth<R>(runner: &R) -> Result<(), PreflightError>
where
    R: CommandRunner + ?Sized,
{
    let output = runner.run("docker", &["login"], None).await?;
    if output.success() {
        Ok(())
    } else {
        Err(PreflightError::NotAuthenticated)
    }
}
