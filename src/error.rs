// ABOUTME: Application-wide error type for vnollx-deploy.
// ABOUTME: Aggregates stage errors so every failure carries its stage label.

use crate::config::ConfigError;
use crate::deploy::{LifecycleError, PreflightError, PublishError};
use crate::ssh;
use crate::types::{ImageRefError, VersionTagError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown deployment target: {0}")]
    UnknownTarget(String),

    #[error("invalid version: {0}")]
    Version(#[from] VersionTagError),

    #[error("invalid image reference: {0}")]
    ImageRef(#[from] ImageRefError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("preflight: {0}")]
    Preflight(#[from] PreflightError),

    #[error("local stage: {0}")]
    Publish(#[from] PublishError),

    #[error("remote session: {0}")]
    Ssh(#[from] ssh::Error),

    #[error("remote stage: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
