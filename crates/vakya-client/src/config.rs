//! Client configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vakya_core::exercise::EngineConfig;

/// Top-level vakya configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VakyaConfig {
    /// Base URL of the auth service (`/login`, `/register`, `/profile`).
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Base URL of the sentence service.
    #[serde(default = "default_sentence_url")]
    pub sentence_url: String,
    /// Base URL of the verb game service.
    #[serde(default = "default_verb_quiz_url")]
    pub verb_quiz_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Serve the built-in sentence when the sentence service fails.
    #[serde(default = "default_offline_fallback")]
    pub offline_fallback: bool,
    /// Where the credential token is kept. Defaults to
    /// `~/.config/vakya/credentials.json`.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

fn default_auth_url() -> String {
    "http://localhost:5000/api".to_string()
}
fn default_sentence_url() -> String {
    "http://127.0.0.1:5001".to_string()
}
fn default_verb_quiz_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout() -> u64 {
    10
}
fn default_offline_fallback() -> bool {
    true
}

impl Default for VakyaConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            sentence_url: default_sentence_url(),
            verb_quiz_url: default_verb_quiz_url(),
            timeout_secs: default_timeout(),
            offline_fallback: default_offline_fallback(),
            token_path: None,
        }
    }
}

impl VakyaConfig {
    /// The token file path, falling back to the per-user default.
    pub fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .or_else(|| dirs_path().map(|d| d.join("credentials.json")))
            .unwrap_or_else(|| PathBuf::from(".vakya-credentials.json"))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            offline_fallback: self.offline_fallback,
        }
    }

    fn resolve_env(&mut self) {
        self.auth_url = resolve_env_vars(&self.auth_url);
        self.sentence_url = resolve_env_vars(&self.sentence_url);
        self.verb_quiz_url = resolve_env_vars(&self.verb_quiz_url);
        if let Some(path) = &self.token_path {
            self.token_path = Some(PathBuf::from(resolve_env_vars(&path.to_string_lossy())));
        }
    }
}

/// Starter file written by `vakya init`.
pub const STARTER_CONFIG: &str = r#"# vakya configuration

# Auth service (login, register, profile).
auth_url = "http://localhost:5000/api"

# Sentence service.
sentence_url = "http://127.0.0.1:5001"

# Verb game service.
verb_quiz_url = "http://localhost:5000"

timeout_secs = 10

# Play the built-in sentence when the sentence service is down.
offline_fallback = true

# token_path = "${HOME}/.config/vakya/credentials.json"
"#;

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `vakya.toml` in the current directory
/// 2. `~/.config/vakya/config.toml`
///
/// Environment variable overrides: `VAKYA_AUTH_URL`, `VAKYA_SENTENCE_URL`.
pub fn load_config() -> Result<VakyaConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<VakyaConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("vakya.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<VakyaConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => VakyaConfig::default(),
    };

    if let Ok(url) = std::env::var("VAKYA_AUTH_URL") {
        config.auth_url = url;
    }
    if let Ok(url) = std::env::var("VAKYA_SENTENCE_URL") {
        config.sentence_url = url;
    }

    config.resolve_env();
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vakya"))
}
