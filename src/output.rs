// ABOUTME: Operator-facing progress reporting for the deploy pipeline.
// ABOUTME: Step lines end in an ok/failed marker; banners close out the run.

use std::io::{self, Write};
use std::time::Instant;

/// Prints pipeline progress: section headers, per-step lines with a
/// completion or failure marker, and the final banner.
pub struct Output {
    step_started: Option<Instant>,
}

impl Output {
    pub fn new() -> Self {
        Self { step_started: None }
    }

    /// Print a stage header, e.g. `[local stage: backend]`.
    pub fn section(&self, title: &str) {
        println!("\n[{title}]");
    }

    /// Print an informational line.
    pub fn note(&self, message: &str) {
        println!("{message}");
    }

    /// Begin a step line; the marker from `step_ok`/`step_failed` completes it.
    pub fn step(&mut self, message: &str) {
        self.step_started = Some(Instant::now());
        print!("  → {message} ... ");
        let _ = io::stdout().flush();
    }

    pub fn step_ok(&mut self) {
        match self.step_started.take() {
            Some(started) => println!("ok ({:.1}s)", started.elapsed().as_secs_f64()),
            None => println!("ok"),
        }
    }

    pub fn step_failed(&mut self) {
        self.step_started = None;
        println!("failed");
    }

    pub fn banner_success(&self, target: &str, version: &str) {
        println!("\n✓ Deployed {target} version {version}");
    }

    pub fn banner_failure(&self, error: &str) {
        println!("\n✗ Deployment failed: {error}");
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
