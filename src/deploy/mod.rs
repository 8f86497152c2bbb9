// ABOUTME: Deployment stages: preflight gates, local publish, remote lifecycle.
// ABOUTME: Stage sequencing and abort policy live in pipeline.rs.

pub mod lifecycle;
pub mod preflight;
pub mod publish;

pub use lifecycle::{Lifecycle, LifecycleError};
pub use preflight::PreflightError;
pub use publish::PublishError;
