// ABOUTME: Entry point for the vnollx-deploy CLI.
// ABOUTME: Wires real collaborators into the pipeline and prints the final banner.

mod cli;

use clap::Parser;
use cli::Cli;
use std::env;
use tracing_subscriber::EnvFilter;
use vnollx_deploy::config::{ConfigError, Settings, TargetRegistry};
use vnollx_deploy::exec::ProcessRunner;
use vnollx_deploy::output::Output;
use vnollx_deploy::pipeline::Pipeline;
use vnollx_deploy::prompt::TerminalPrompter;
use vnollx_deploy::ssh::SshConnector;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mut output = Output::new();

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            output.banner_failure(&e.to_string());
            return;
        }
    };

    let pipeline = Pipeline::new(
        settings,
        TargetRegistry::builtin(),
        ProcessRunner,
        SshConnector,
    );
    let mut prompter = TerminalPrompter::new();

    // The exit code stays 0 in both outcomes; the banner reports the result
    // and an outer wrapper may map it to a code.
    match pipeline.run(&mut prompter, &mut output).await {
        Ok(report) => output.banner_success(&report.target, report.version.as_str()),
        Err(e) => output.banner_failure(&e.to_string()),
    }
}

fn load_settings() -> Result<Settings, ConfigError> {
    match env::current_dir() {
        Ok(dir) => Settings::load(&dir),
        Err(_) => Settings::from_env(),
    }
}
