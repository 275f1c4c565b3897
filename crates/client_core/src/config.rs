use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "govansh.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub login_path: String,
    pub request_timeout_secs: u64,
    pub report_dir: PathBuf,
    pub session_cookie: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            login_path: "/login".into(),
            request_timeout_secs: 30,
            report_dir: PathBuf::from("."),
            session_cookie: None,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Absolute URL the page navigates to when the server says "not logged in".
    pub fn login_url(&self) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.login_path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let parsed = Url::parse(&self.server_url)
            .with_context(|| format!("server_url `{}` is not a valid url", self.server_url))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(anyhow!("server_url must use http or https, got `{other}`")),
        }
    }
}

/// Defaults, overlaid by `govansh.toml` (or `path`), overlaid by the environment.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(file) {
        Ok(raw) => apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("failed to parse {}", file.display()))?,
        Err(err) if path.is_some() => {
            return Err(err).with_context(|| format!("failed to read {}", file.display()));
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

fn apply_file_overrides(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("login_path").and_then(toml::Value::as_str) {
        settings.login_path = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(toml::Value::as_integer)
    {
        settings.request_timeout_secs =
            u64::try_from(v).context("request_timeout_secs must not be negative")?;
    }
    if let Some(v) = file_cfg.get("report_dir").and_then(toml::Value::as_str) {
        settings.report_dir = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("session_cookie").and_then(toml::Value::as_str) {
        settings.session_cookie = Some(v.to_string());
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut ClientSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("GOVANSH_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("GOVANSH_LOGIN_PATH") {
        settings.login_path = v;
    }
    if let Some(v) = var("GOVANSH_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = var("GOVANSH_REPORT_DIR") {
        settings.report_dir = PathBuf::from(v);
    }
    if let Some(v) = var("GOVANSH_SESSION_COOKIE") {
        settings.session_cookie = Some(v);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
