use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::{normalize_base_url, DEFAULT_REQUEST_TIMEOUT};

pub const DEFAULT_CONFIG_FILE: &str = "account_gui.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api/".into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

/// Command-line values; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub config_path: Option<PathBuf>,
}

pub fn load_settings(cli: &CliOverrides) -> anyhow::Result<Settings> {
    let path = cli
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let file = read_config_file(&path, cli.config_path.is_some())?;
    let settings = layer_settings(file.as_deref(), |name| std::env::var(name).ok(), cli);
    normalize_base_url(&settings.api_url)
        .with_context(|| format!("invalid account API url '{}'", settings.api_url))?;
    Ok(settings)
}

/// A missing default file is fine; a missing file the user asked for is not.
fn read_config_file(path: &Path, explicit: bool) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read config '{}'", path.display())),
    }
}

fn layer_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    cli: &CliOverrides,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.api_url = v.clone();
                }
                if let Some(v) = file_cfg.get("request_timeout_secs") {
                    apply_timeout(&mut settings, v);
                }
            }
            Err(err) => tracing::warn!("ignoring malformed config file: {err}"),
        }
    }

    if let Some(v) = env("ACCOUNT_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        apply_timeout(&mut settings, &v);
    }

    if let Some(v) = &cli.api_url {
        settings.api_url = v.clone();
    }

    settings
}

fn apply_timeout(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => settings.request_timeout_secs = secs,
        _ => tracing::warn!(value = raw, "ignoring invalid request timeout"),
    }
}
