// ABOUTME: Remote container lifecycle as a typestate machine over the shell.
// ABOUTME: Pull, stop, remove, start in fixed order, then best-effort prune.

use crate::config::DeployTarget;
use crate::exec::CommandOutput;
use crate::ssh::{self, RemoteShell};
use crate::types::ImageRef;
use std::marker::PhantomData;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to pull {image}: {detail}")]
    PullFailed { image: String, detail: String },

    #[error("failed to stop container {container}: {detail}")]
    StopFailed { container: String, detail: String },

    #[error("failed to remove container {container}: {detail}")]
    RemoveFailed { container: String, detail: String },

    #[error("failed to start container {container}: {detail}")]
    StartFailed { container: String, detail: String },

    #[error("failed to prune dangling images: {detail}")]
    PruneFailed { detail: String },

    #[error("remote session error: {0}")]
    Ssh(#[from] ssh::Error),
}

/// Initial state: session open, nothing issued yet.
/// Available action: `pull()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// Image pulled on the remote host.
/// Available action: `stop_existing()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pulled;

/// Existing container stopped (or there was none).
/// Available action: `remove_existing()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopped;

/// Existing container removed (or there was none).
/// Available action: `start()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Removed;

/// New container running.
/// Available action: `prune()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Started;

/// The remote lifecycle stage for one target and image.
///
/// Each transition issues one command through the shell and consumes the
/// stage, so steps cannot run out of order or repeat. Stop and remove
/// tolerate a verified "no such container"; every other failure is fatal
/// to the run.
pub struct Lifecycle<'a, S: ?Sized, State> {
    shell: &'a mut S,
    target: &'a DeployTarget,
    image: &'a ImageRef,
    _state: PhantomData<State>,
}

impl<'a, S: ?Sized, State> Lifecycle<'a, S, State> {
    fn transition<Next>(self) -> Lifecycle<'a, S, Next> {
        Lifecycle {
            shell: self.shell,
            target: self.target,
            image: self.image,
            _state: PhantomData,
        }
    }
}

impl<'a, S: RemoteShell + ?Sized> Lifecycle<'a, S, Idle> {
    pub fn new(shell: &'a mut S, target: &'a DeployTarget, image: &'a ImageRef) -> Self {
        Self {
            shell,
            target,
            image,
            _state: PhantomData,
        }
    }

    /// Pull the fully qualified image. An unreachable image is unrecoverable
    /// without operator intervention.
    pub async fn pull(self) -> Result<Lifecycle<'a, S, Pulled>, LifecycleError> {
        let command = format!("docker pull {}", self.image);
        let output = self.shell.exec(&command).await?;

        if !output.success() {
            return Err(LifecycleError::PullFailed {
                image: self.image.to_string(),
                detail: output.detail(),
            });
        }

        Ok(self.transition())
    }
}

impl<'a, S: RemoteShell + ?Sized> Lifecycle<'a, S, Pulled> {
    /// Stop the existing container. First-time deploys have no prior
    /// container, so "no such container" counts as success.
    pub async fn stop_existing(self) -> Result<Lifecycle<'a, S, Stopped>, LifecycleError> {
        let command = format!("docker stop {}", self.target.container);
        let output = self.shell.exec(&command).await?;

        if !output.success() && !is_not_found(&output) {
            return Err(LifecycleError::StopFailed {
                container: self.target.container.to_string(),
                detail: output.detail(),
            });
        }

        Ok(self.transition())
    }
}

impl<'a, S: RemoteShell + ?Sized> Lifecycle<'a, S, Stopped> {
    /// Remove the existing container, with the same not-found tolerance as
    /// `stop_existing`.
    pub async fn remove_existing(self) -> Result<Lifecycle<'a, S, Removed>, LifecycleError> {
        let command = format!("docker rm {}", self.target.container);
        let output = self.shell.exec(&command).await?;

        if !output.success() && !is_not_found(&output) {
            return Err(LifecycleError::RemoveFailed {
                container: self.target.container.to_string(),
                detail: output.detail(),
            });
        }

        Ok(self.transition())
    }
}

impl<'a, S: RemoteShell + ?Sized> Lifecycle<'a, S, Removed> {
    /// Start the new container with the configured name, network, and port
    /// binding. The old container is already gone, so a failure here leaves
    /// the target offline.
    pub async fn start(self) -> Result<Lifecycle<'a, S, Started>, LifecycleError> {
        let command = format!(
            "docker run -d --name {} --network {} -p {} {}",
            self.target.container, self.target.network, self.target.ports, self.image
        );
        let output = self.shell.exec(&command).await?;

        if !output.success() {
            return Err(LifecycleError::StartFailed {
                container: self.target.container.to_string(),
                detail: output.detail(),
            });
        }

        Ok(self.transition())
    }
}

impl<'a, S: RemoteShell + ?Sized> Lifecycle<'a, S, Started> {
    /// Prune dangling images on the remote host. Best-effort: the caller
    /// logs a failure and keeps the run successful.
    pub async fn prune(self) -> Result<(), LifecycleError> {
        let output = self.shell.exec("docker image prune -f").await?;

        if !output.success() {
            return Err(LifecycleError::PruneFailed {
                detail: output.detail(),
            });
        }

        Ok(())
    }
}

/// The daemon reports a missing container the same way for stop and rm:
/// "Error response from daemon: No such container: <name>".
fn is_not_found(output: &CommandOutput) -> bool {
    output.stderr.to_lowercase().contains("no such container")
}
