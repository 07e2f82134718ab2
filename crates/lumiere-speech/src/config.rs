//! Configuration loading and service factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lumiere_core::traits::SpeechService;
use lumiere_core::unlock::DEFAULT_UNLOCK_CODE;

use crate::proxy::{ProxyClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::scenario::VoicePair;

/// Connection settings for the speech/explanation proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Top-level lumiere configuration.
///
/// Note: custom Debug impl masks the unlock code.
#[derive(Clone, Serialize, Deserialize)]
pub struct LumiereConfig {
    /// Voice for single phrases, cues, and even-numbered dialogue lines.
    #[serde(default = "default_voice")]
    pub default_voice: String,
    /// Voice for odd-numbered dialogue lines.
    #[serde(default = "default_partner_voice")]
    pub partner_voice: String,
    /// Speak "Correct" / "Incorrect" after each quiz answer.
    #[serde(default = "default_true")]
    pub cues: bool,
    /// Code that unlocks premium levels.
    #[serde(default = "default_unlock_code")]
    pub unlock_code: String,
    /// Where learner state (mistakes, unlock flag) is kept.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
    /// Custom curriculum TOML; the built-in catalog is used when unset.
    #[serde(default)]
    pub curriculum: Option<PathBuf>,
    #[serde(default)]
    pub service: ServiceConfig,
}

impl std::fmt::Debug for LumiereConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LumiereConfig")
            .field("default_voice", &self.default_voice)
            .field("partner_voice", &self.partner_voice)
            .field("cues", &self.cues)
            .field("unlock_code", &"***")
            .field("state_path", &self.state_path)
            .field("curriculum", &self.curriculum)
            .field("service", &self.service)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_voice() -> String {
    "Kore".to_string()
}
fn default_partner_voice() -> String {
    "Fenrir".to_string()
}
fn default_true() -> bool {
    true
}
fn default_unlock_code() -> String {
    DEFAULT_UNLOCK_CODE.to_string()
}

impl Default for LumiereConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
            partner_voice: default_partner_voice(),
            cues: true,
            unlock_code: default_unlock_code(),
            state_path: None,
            curriculum: None,
            service: ServiceConfig::default(),
        }
    }
}

impl LumiereConfig {
    /// The state file to use: explicit setting, else the XDG data dir.
    pub fn state_path(&self) -> PathBuf {
        if let Some(path) = &self.state_path {
            return path.clone();
        }
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("lumiere")
                .join("state.json"),
            Err(_) => PathBuf::from("lumiere-state.json"),
        }
    }

    pub fn voices(&self) -> VoicePair {
        VoicePair {
            primary: self.default_voice.clone(),
            partner: self.partner_voice.clone(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `lumiere.toml` in the current directory
/// 2. `~/.config/lumiere/config.toml`
///
/// Environment variable overrides: `LUMIERE_SERVICE_URL`, `LUMIERE_STATE_PATH`.
pub fn load_config() -> Result<LumiereConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LumiereConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("lumiere.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<LumiereConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LumiereConfig::default(),
    };

    if let Ok(url) = std::env::var("LUMIERE_SERVICE_URL") {
        config.service.base_url = url;
    }
    if let Ok(state) = std::env::var("LUMIERE_STATE_PATH") {
        config.state_path = Some(PathBuf::from(state));
    }

    config.service.base_url = resolve_env_vars(&config.service.base_url);
    config.unlock_code = resolve_env_vars(&config.unlock_code);
    config.state_path = config.state_path.as_deref().map(resolve_path);
    config.curriculum = config.curriculum.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lumiere"))
}

/// Create the speech service described by the configuration.
pub fn create_service(config: &ServiceConfig) -> Result<Arc<dyn SpeechService>> {
    let client = ProxyClient::new(&config.base_url, config.timeout_secs)
        .with_context(|| format!("failed to create client for {}", config.base_url))?;
    Ok(Arc::new(client))
}
