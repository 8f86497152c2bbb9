// ABOUTME: Fully qualified image reference assembly and validation.
// ABOUTME: Renders the exact registry-user/image:version pushed and pulled.

use super::version_tag::VersionTag;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("registry user cannot be empty")]
    EmptyUser,

    #[error("image name cannot be empty")]
    EmptyName,

    #[error("invalid character in image reference: '{0}'")]
    InvalidChar(char),
}

/// A fully qualified image reference, `registry-user/image:version`.
///
/// Built once per run from the selected target and the operator's version;
/// `Display` is the reference handed to every tag/push/pull/run command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: VersionTag,
}

impl ImageRef {
    pub fn qualified(
        registry_user: &str,
        image: &str,
        tag: &VersionTag,
    ) -> Result<Self, ImageRefError> {
        if registry_user.is_empty() {
            return Err(ImageRefError::EmptyUser);
        }
        if image.is_empty() {
            return Err(ImageRefError::EmptyName);
        }

        for c in registry_user.chars().chain(image.chars()) {
            if !c.is_ascii_alphanumeric() && c != '.' && c != '-' && c != '_' {
                return Err(ImageRefError::InvalidChar(c));
            }
        }

        Ok(Self {
            repository: format!("{registry_user}/{image}"),
            tag: tag.clone(),
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &VersionTag {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
