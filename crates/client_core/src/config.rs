use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::input::DEFAULT_CITY;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const SETTINGS_FILE: &str = "bookdesk.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
    pub default_city: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            default_city: DEFAULT_CITY.into(),
        }
    }
}

/// Defaults, then `bookdesk.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();
    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Like [`load_settings`] but with an explicit file that must exist and parse.
pub fn load_settings_from(path: &Path) -> anyhow::Result<ClientSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;

    let mut settings = ClientSettings::default();
    apply_file(&mut settings, &raw);
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("base_url") {
        settings.base_url = normalize_base_url(v);
    }
    if let Some(v) = file_cfg.get("default_city") {
        settings.default_city = v.clone();
    }
}

fn apply_env(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("BOOKDESK_BASE_URL") {
        settings.base_url = normalize_base_url(&v);
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = normalize_base_url(&v);
    }

    if let Some(v) = lookup("BOOKDESK_DEFAULT_CITY") {
        settings.default_city = v;
    }
    if let Some(v) = lookup("APP__DEFAULT_CITY") {
        settings.default_city = v;
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');

    if raw.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }

    if raw.contains("://") {
        return raw.to_string();
    }

    format!("http://{raw}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
