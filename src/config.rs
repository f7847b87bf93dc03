//! Runtime configuration read from the environment.
//!
//! `.env` is loaded first (desktop dev); builds without one fall back to the
//! bundled `assets/config.env`. Neither overrides a variable that is already
//! set.

use anyhow::{Context, Result};
use std::time::Duration;

/// Bundled config for mobile builds (iOS/Android)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub autosave_path: String,
    pub toast_duration: Duration,
    pub search_debounce: Duration,
    pub autosave_debounce: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            autosave_path: crate::api::DEFAULT_AUTOSAVE_PATH.to_string(),
            toast_duration: crate::notify::DEFAULT_DURATION,
            search_debounce: crate::search::DEFAULT_DEBOUNCE,
            autosave_debounce: crate::autosave::DEFAULT_DEBOUNCE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let millis = |key: &str, fallback: Duration| -> Result<Duration> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .with_context(|| format!("{key} must be a whole number of milliseconds")),
                None => Ok(fallback),
            }
        };
        Ok(Self {
            base_url: lookup("CMS_BASE_URL").unwrap_or(defaults.base_url),
            autosave_path: lookup("CMS_AUTOSAVE_PATH").unwrap_or(defaults.autosave_path),
            toast_duration: millis("CMS_TOAST_MS", defaults.toast_duration)?,
            search_debounce: millis("CMS_SEARCH_DEBOUNCE_MS", defaults.search_debounce)?,
            autosave_debounce: millis("CMS_AUTOSAVE_DEBOUNCE_MS", defaults.autosave_debounce)?,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if std::env::var(key).is_err() {
            // SAFETY: called from `main` before the runtime or any other thread starts
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(source: &str) -> impl Iterator<Item = (&str, &str)> {
    source.lines().filter_map(|line| {
        let line = line.trim();
        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
}
