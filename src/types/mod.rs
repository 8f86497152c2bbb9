// ABOUTME: Validated domain types shared across the pipeline.
// ABOUTME: Catches malformed versions and image references before any command runs.

mod image_ref;
mod version_tag;

pub use image_ref::{ImageRef, ImageRefError};
pub use version_tag::{VersionTag, VersionTagError};
