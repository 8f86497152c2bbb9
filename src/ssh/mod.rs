// ABOUTME: SSH client module for the remote host connection.
// ABOUTME: Key-based authentication plus the shell seams the pipeline deploys through.

mod client;
mod error;

pub use client::{HostKeyPolicy, Session, SessionConfig};
pub use error::{Error, Result};

use crate::exec::CommandOutput;
use async_trait::async_trait;

/// An open remote shell: executes commands and is closed exactly once.
#[async_trait]
pub trait RemoteShell: Send {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput>;
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
impl RemoteShell for Session {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput> {
        self.run_command(command).await
    }

    async fn close(&mut self) -> Result<()> {
        self.disconnect().await
    }
}

/// Opens a remote shell for a pipeline run.
///
/// The seam that lets tests inject a scripted shell and verify the
/// close-exactly-once guarantee under failure injection.
#[async_trait]
pub trait Connector: Send + Sync {
    type Shell: RemoteShell + Send;

    async fn connect(&self, config: &SessionConfig) -> Result<Self::Shell>;
}

/// Real SSH connector backed by [`Session`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SshConnector;

#[async_trait]
impl Connector for SshConnector {
    type Shell = Session;

    async fn connect(&self, config: &SessionConfig) -> Result<Session> {
        Session::connect(config.clone()).await
    }
}
