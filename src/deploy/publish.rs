// ABOUTME: Local build, tag, and push stage.
// ABOUTME: Builds without layer cache so the published image matches the source tree.

use crate::config::DeployTarget;
use crate::exec::CommandRunner;
use crate::types::ImageRef;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("build failed for {target}: {detail}")]
    BuildFailed { target: String, detail: String },

    #[error("failed to tag {image}: {detail}")]
    TagFailed { image: String, detail: String },

    #[error("failed to push {image}: {detail}")]
    PushFailed { image: String, detail: String },

    #[error(transparent)]
    Exec(#[from] crate::exec::Error),
}

/// Build the target's image from its build context, with the layer cache
/// disabled unconditionally.
pub async fn build<R>(runner: &R, target: &DeployTarget) -> Result<(), PublishError>
where
    R: CommandRunner + ?Sized,
{
    let output = runner
        .run(
            "docker",
            &["build", "--no-cache", "-t", target.image, "."],
            Some(Path::new(target.build_path)),
        )
        .await?;

    if output.success() {
        Ok(())
    } else {
        Err(PublishError::BuildFailed {
            target: target.display_name.to_string(),
            detail: output.detail(),
        })
    }
}

/// Tag the local image with its fully qualified registry reference.
pub async fn tag_image<R>(
    runner: &R,
    target: &DeployTarget,
    image: &ImageRef,
) -> Result<(), PublishError>
where
    R: CommandRunner + ?Sized,
{
    let reference = image.to_string();
    let output = runner
        .run("docker", &["tag", target.image, &reference], None)
        .await?;

    if output.success() {
        Ok(())
    } else {
        Err(PublishError::TagFailed {
            image: reference,
            detail: output.detail(),
        })
    }
}

/// Push the fully qualified image to the registry.
pub async fn push<R>(runner: &R, image: &ImageRef) -> Result<(), PublishError>
where
    R: CommandRunner + ?Sized,
{
    let reference = image.to_string();
    let output = runner.run("docker", &["push", &reference], None).await?;

    if output.success() {
        Ok(())
    } else {
        Err(PublishError::PushFailed {
            image: reference,
            detail: output.detail(),
        })
    }
}
