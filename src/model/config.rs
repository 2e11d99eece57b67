use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub view: ViewConfig,
    pub bootstrap: BootstrapConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    pub title: String,
    pub panes: Vec<String>,
}

/// What the ready handler writes and which host function it calls.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    pub display_target: String,
    pub greeting: String,
    pub host_function: String,
    pub argument: toml::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    pub latency_ms: u64,
}

impl HostConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let user_path = user_config_path().filter(|path| path.exists());
        Self::load_from(user_path.as_deref())
    }

    pub fn load_from(user_path: Option<&Path>) -> Result<Self> {
        let mut layered: toml::Value =
            toml::from_str(DEFAULT_CONFIG).context("parsing built-in default config")?;

        if let Some(path) = user_path {
            let user_str = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let user_layer: toml::Value = toml::from_str(&user_str)
                .with_context(|| format!("parsing {}", path.display()))?;
            merge(&mut layered, user_layer);
            tracing::info!("merged user config from {}", path.display());
        }

        layered
            .try_into::<AppConfig>()
            .context("config does not match the expected layout")
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "viewboot")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Tables merge key by key; any other overlay value replaces the base.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
