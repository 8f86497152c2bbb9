// ABOUTME: Runtime settings with layering: defaults, optional deploy.yml, env overrides.
// ABOUTME: Read once at startup; the static target table lives in targets.rs.

mod targets;

pub use targets::{DeployTarget, TargetRegistry};

use crate::ssh::{HostKeyPolicy, SessionConfig};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "deploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "deploy.yaml";

pub const ENV_REGISTRY_USER: &str = "DOCKERHUB_USER";
pub const ENV_REMOTE_HOST: &str = "REMOTE_IP";
pub const ENV_REMOTE_USER: &str = "REMOTE_USER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME is not set; cannot locate the SSH key")]
    MissingHome,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Connection and registry settings for a pipeline run.
///
/// Layered lowest to highest: built-in defaults, a `deploy.yml` next to the
/// invocation, then the environment variables named above. The private key
/// lives at the conventional `~/.ssh/id_ed25519` and is never written.
#[derive(Debug, Clone)]
pub struct Settings {
    pub registry_user: String,
    pub remote_host: String,
    pub remote_user: String,
    pub remote_port: u16,
    pub trust_first_connection: bool,
    pub key_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    registry_user: Option<String>,
    host: Option<String>,
    user: Option<String>,
    port: Option<u16>,
    trust_first_connection: Option<bool>,
}

impl Settings {
    pub fn defaults() -> Result<Self, ConfigError> {
        let home = env::var("HOME").map_err(|_| ConfigError::MissingHome)?;
        Ok(Self {
            registry_user: "vnollx".to_string(),
            remote_host: "111.230.105.54".to_string(),
            remote_user: "root".to_string(),
            remote_port: 22,
            trust_first_connection: false,
            key_path: Path::new(&home).join(".ssh").join("id_ed25519"),
        })
    }

    /// Load settings, discovering an optional config file in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut settings = Self::defaults()?;
        if let Some(file) = SettingsFile::discover(dir)? {
            settings.apply_file(file);
        }
        settings.apply_env();
        Ok(settings)
    }

    /// Load settings from defaults and environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::defaults()?;
        settings.apply_env();
        Ok(settings)
    }

    fn apply_file(&mut self, file: SettingsFile) {
        if let Some(registry_user) = file.registry_user {
            self.registry_user = registry_user;
        }
        if let Some(host) = file.host {
            self.remote_host = host;
        }
        if let Some(user) = file.user {
            self.remote_user = user;
        }
        if let Some(port) = file.port {
            self.remote_port = port;
        }
        if let Some(trust) = file.trust_first_connection {
            self.trust_first_connection = trust;
        }
    }

    fn apply_env(&mut self) {
        env_override(ENV_REGISTRY_USER, &mut self.registry_user);
        env_override(ENV_REMOTE_HOST, &mut self.remote_host);
        env_override(ENV_REMOTE_USER, &mut self.remote_user);
    }

    /// Derive the SSH session configuration for the remote host.
    pub fn session_config(&self) -> SessionConfig {
        let policy = if self.trust_first_connection {
            HostKeyPolicy::TrustOnFirstUse
        } else {
            HostKeyPolicy::Strict
        };

        SessionConfig::new(&self.remote_host, &self.remote_user, &self.key_path)
            .port(self.remote_port)
            .host_key_policy(policy)
    }
}

impl SettingsFile {
    fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        for name in [CONFIG_FILENAME, CONFIG_FILENAME_ALT] {
            let path = dir.join(name);
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                return Ok(Some(serde_yaml::from_str(&content)?));
            }
        }
        Ok(None)
    }
}

fn env_override(var: &str, slot: &mut String) {
    if let Ok(value) = env::var(var) {
        if !value.trim().is_empty() {
            *slot = value;
        }
    }
}
