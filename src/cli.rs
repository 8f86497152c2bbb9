// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: The deploy flow itself is interactive; flags only tune diagnostics.

use clap::Parser;

#[derive(Parser)]
#[command(name = "vnollx-deploy")]
#[command(about = "Build, publish and redeploy the Vnollx OJ containers over SSH")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
