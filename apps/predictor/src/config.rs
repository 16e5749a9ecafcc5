use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::{Locale, PresentationOptions};
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "predictor.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub locale: Locale,
    pub request_timeout_secs: u64,
    pub result_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".into(),
            locale: Locale::Tr,
            request_timeout_secs: 30,
            result_delay_ms: 500,
        }
    }
}

/// Defaults, then `predictor.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(Path::new(SETTINGS_FILE)) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

impl Settings {
    /// Applies the flat key/value table from a settings file. Unknown keys
    /// and unreadable values are skipped.
    pub fn apply_file(&mut self, raw: &str) {
        let table = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, file = SETTINGS_FILE, "ignoring unreadable settings file");
                return;
            }
        };

        for (key, value) in table {
            let value = match value {
                toml::Value::String(v) => v,
                toml::Value::Integer(v) => v.to_string(),
                other => {
                    warn!(%key, value = %other, "ignoring setting with unsupported value type");
                    continue;
                }
            };
            self.apply_value(&key, &value);
        }
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PREDICTOR_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("APP__API_URL") {
            self.api_url = v;
        }
        for (env_key, key) in [
            ("APP__LOCALE", "locale"),
            ("APP__REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
            ("APP__RESULT_DELAY_MS", "result_delay_ms"),
        ] {
            if let Some(v) = lookup(env_key) {
                self.apply_value(key, &v);
            }
        }
    }

    fn apply_value(&mut self, key: &str, value: &str) {
        match key {
            "api_url" => self.api_url = value.to_string(),
            "locale" => match value.parse() {
                Ok(locale) => self.locale = locale,
                Err(err) => warn!(error = %err, "keeping configured locale"),
            },
            "request_timeout_secs" => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => warn!(%value, "request_timeout_secs must be a positive integer"),
            },
            "result_delay_ms" => match value.parse::<u64>() {
                Ok(ms) => self.result_delay_ms = ms,
                Err(_) => warn!(%value, "result_delay_ms must be a non-negative integer"),
            },
            _ => warn!(%key, "ignoring unknown setting"),
        }
    }

    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.api_url.trim())
            .with_context(|| format!("invalid prediction service url '{}'", self.api_url))?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "prediction service url must be http or https, got '{}'",
            url.scheme()
        );
        Ok(url)
    }

    pub fn presentation_options(&self) -> PresentationOptions {
        PresentationOptions {
            locale: self.locale,
            result_delay: Duration::from_millis(self.result_delay_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
