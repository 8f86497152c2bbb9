// ABOUTME: The pipeline controller: preflight, publish, session, lifecycle in fixed order.
// ABOUTME: First failure aborts the run; an opened session is always closed exactly once.

use crate::config::{DeployTarget, Settings, TargetRegistry};
use crate::deploy::{Lifecycle, preflight, publish};
use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::output::Output;
use crate::prompt::Prompter;
use crate::ssh::{self, Connector, RemoteShell};
use crate::types::{ImageRef, VersionTag};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Report {
    pub target: String,
    pub version: VersionTag,
}

/// Sequences the deployment stages against injected collaborators.
///
/// Strictly sequential: no step is issued until the previous one reported
/// success, and nothing is retried or rolled back.
pub struct Pipeline<R, C> {
    settings: Settings,
    registry: TargetRegistry,
    runner: R,
    connector: C,
}

impl<R, C> Pipeline<R, C>
where
    R: CommandRunner,
    C: Connector,
{
    pub fn new(settings: Settings, registry: TargetRegistry, runner: R, connector: C) -> Self {
        Self {
            settings,
            registry,
            runner,
            connector,
        }
    }

    pub async fn run(&self, prompter: &mut dyn Prompter, out: &mut Output) -> Result<Report> {
        out.section("preflight");
        out.step("checking container engine");
        observe(out, preflight::check_engine(&self.runner).await)?;
        out.step("checking registry login");
        observe(out, preflight::check_registry_auth(&self.runner).await)?;

        // The key is the run's only credential; a missing file should
        // surface before the operator answers any prompt.
        if !self.settings.key_path.exists() {
            return Err(Error::Ssh(ssh::Error::KeyNotFound(
                self.settings.key_path.clone(),
            )));
        }

        let target = self.select_target(prompter, out)?;
        let version = ask_version(prompter, target)?;
        let image = ImageRef::qualified(&self.settings.registry_user, target.image, &version)?;

        out.section(&format!("local stage: {}", target.display_name));
        out.step("building image (no cache)");
        observe(out, publish::build(&self.runner, target).await)?;
        out.step("tagging image");
        observe(out, publish::tag_image(&self.runner, target, &image).await)?;
        out.step(&format!("pushing {image}"));
        observe(out, publish::push(&self.runner, &image).await)?;

        out.section(&format!("remote stage: {}", self.settings.remote_host));
        out.step("opening SSH session");
        let mut shell = observe(
            out,
            self.connector.connect(&self.settings.session_config()).await,
        )?;

        let result = run_lifecycle(&mut shell, target, &image, out).await;

        if let Err(e) = shell.close().await {
            tracing::warn!("failed to close remote session cleanly: {e}");
        }
        result?;

        Ok(Report {
            target: target.display_name.to_string(),
            version,
        })
    }

    fn select_target(
        &self,
        prompter: &mut dyn Prompter,
        out: &mut Output,
    ) -> Result<&DeployTarget> {
        out.section("targets");
        for target in self.registry.iter() {
            out.note(&format!("{}. {}", target.id, target.display_name));
        }

        let choice = prompter.ask("Select deployment target: ")?;
        let choice = choice.trim();
        self.registry
            .get(choice)
            .ok_or_else(|| Error::UnknownTarget(choice.to_string()))
    }
}

fn ask_version(prompter: &mut dyn Prompter, target: &DeployTarget) -> Result<VersionTag> {
    let answer = prompter.ask(&format!("Version for {}: ", target.display_name))?;
    Ok(VersionTag::new(&answer)?)
}

async fn run_lifecycle<S>(
    shell: &mut S,
    target: &DeployTarget,
    image: &ImageRef,
    out: &mut Output,
) -> Result<()>
where
    S: RemoteShell + ?Sized,
{
    let stage = Lifecycle::new(shell, target, image);

    out.step(&format!("pulling {image}"));
    let stage = observe(out, stage.pull().await)?;
    out.step("stopping old container");
    let stage = observe(out, stage.stop_existing().await)?;
    out.step("removing old container");
    let stage = observe(out, stage.remove_existing().await)?;
    out.step("starting new container");
    let stage = observe(out, stage.start().await)?;

    out.step("pruning dangling images");
    match stage.prune().await {
        Ok(()) => out.step_ok(),
        // Best-effort cleanup: the new container is already serving.
        Err(e) => {
            out.step_failed();
            tracing::warn!("image prune failed: {e}");
        }
    }

    Ok(())
}

fn observe<T, E>(out: &mut Output, result: std::result::Result<T, E>) -> Result<T>
where
    E: Into<Error>,
{
    match result {
        Ok(value) => {
            out.step_ok();
            Ok(value)
        }
        Err(e) => {
            out.step_failed();
            Err(e.into())
        }
    }
}
