//! brevet configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::ExamConfig;

/// Environment variable overriding [`BrevetConfig::state_file`].
pub const STATE_FILE_ENV: &str = "BREVET_STATE_FILE";

/// Top-level brevet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrevetConfig {
    /// JSON file holding practice answers and the exam session.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Custom bank file or directory. The built-in bank is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<PathBuf>,
    #[serde(default)]
    pub exam: ExamConfig,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".brevet/state.json")
}

impl Default for BrevetConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            bank: None,
            exam: ExamConfig::default(),
        }
    }
}

impl BrevetConfig {
    /// Reject settings that would make an exam impossible.
    pub fn validate(&self) -> Result<()> {
        if self.exam.duration_secs == 0 {
            anyhow::bail!("exam.duration_secs must be greater than zero");
        }
        if self.exam.per_subject == 0 {
            anyhow::bail!("exam.per_subject must be greater than zero");
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `brevet.toml` in the current directory
/// 2. `~/.config/brevet/config.toml`
///
/// `BREVET_STATE_FILE` overrides the state file location.
pub fn load_config_from(path: Option<&Path>) -> Result<BrevetConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("brevet.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<BrevetConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BrevetConfig::default(),
    };

    if let Ok(state_file) = std::env::var(STATE_FILE_ENV) {
        if !state_file.is_empty() {
            config.state_file = PathBuf::from(state_file);
        }
    }

    config.state_file = resolve_path(&config.state_file);
    config.bank = config.bank.as_deref().map(resolve_path);

    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
        None => tracing::debug!("no config file found, using defaults"),
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("brevet"))
}

/// Starter `brevet.toml` written by `brevet init`.
pub const STARTER_CONFIG: &str = r#"# brevet configuration

# Where practice answers and the exam session are saved.
state_file = ".brevet/state.json"

# Custom question bank (file or directory). Omit to use the built-in bank.
# bank = "banks"

[exam]
duration_secs = 1500
per_subject = 3
auto_submit_on_timeout = true
"#;
