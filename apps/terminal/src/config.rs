use std::{fs, io, path::Path};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub log_filter: String,
    pub auto_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080/api".into(),
            log_filter: "info".into(),
            auto_start: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    log_filter: Option<String>,
    auto_start: Option<bool>,
}

/// Defaults, then the TOML file at `path` if it exists, then environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.auto_start {
        settings.auto_start = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("WORDGAME_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("WORDGAME_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("APP__AUTO_START") {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.auto_start = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
