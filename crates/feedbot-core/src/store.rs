//! Persisted per-bot settings: command prefix, input channel, output channel.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::{domain::ChannelId, errors::Error, Result};

pub const DEFAULT_PREFIX: &str = "$";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    pub prefix: String,
    pub input_channel: ChannelId,
    pub output_channel: ChannelId,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            input_channel: ChannelId::UNSET,
            output_channel: ChannelId::UNSET,
        }
    }
}

impl BotConfig {
    /// Relaying only happens once both channels are configured.
    pub fn relay_active(&self) -> bool {
        self.input_channel.is_set() && self.output_channel.is_set()
    }
}

/// A prefix is exactly one printable, non-whitespace character.
pub fn validate_prefix(prefix: &str) -> std::result::Result<(), String> {
    let mut chars = prefix.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err("prefix must not be empty".to_string()),
        (Some(_), Some(_)) => Err(format!("prefix must be a single character, got {prefix:?}")),
        (Some(c), None) if c.is_whitespace() || c.is_control() => {
            Err("prefix must be a printable character".to_string())
        }
        (Some(_), None) => Ok(()),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(rename = "FEEDBOT", default)]
    feedbot: Section,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Section {
    #[serde(default = "default_prefix")]
    prefix: String,
    #[serde(default = "unset_channel")]
    input_channel: String,
    #[serde(default = "unset_channel")]
    output_channel: String,
}

impl Default for Section {
    fn default() -> Self {
        Section::from(&BotConfig::default())
    }
}

impl From<&BotConfig> for Section {
    fn from(cfg: &BotConfig) -> Self {
        Self {
            prefix: cfg.prefix.clone(),
            input_channel: cfg.input_channel.to_string(),
            output_channel: cfg.output_channel.to_string(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn unset_channel() -> String {
    "0".to_string()
}

fn persist_err(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Persistence {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Render settings in their on-disk form.
pub fn render(cfg: &BotConfig) -> Result<String> {
    let file = SettingsFile {
        feedbot: Section::from(cfg),
    };
    toml::to_string(&file).map_err(|e| Error::Config(format!("failed to encode settings: {e}")))
}

/// Parse the on-disk form. Missing keys take their defaults.
pub fn parse(text: &str, path: &Path) -> Result<BotConfig> {
    let file: SettingsFile = toml::from_str(text).map_err(|e| persist_err(path, e))?;
    let section = file.feedbot;

    validate_prefix(&section.prefix).map_err(|e| persist_err(path, e))?;

    let channel = |key: &str, raw: &str| -> Result<ChannelId> {
        raw.trim()
            .parse::<u64>()
            .map(ChannelId)
            .map_err(|_| persist_err(path, format!("{key} is not a channel id: {raw:?}")))
    };

    Ok(BotConfig {
        prefix: section.prefix,
        input_channel: channel("INPUT_CHANNEL", &section.input_channel)?,
        output_channel: channel("OUTPUT_CHANNEL", &section.output_channel)?,
    })
}

/// Load settings, creating the file with defaults on first run.
pub async fn load(path: &Path) -> Result<BotConfig> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => parse(&text, path),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let cfg = BotConfig::default();
            save(path, &cfg).await?;
            info!("no settings file found, wrote defaults to {}", path.display());
            Ok(cfg)
        }
        Err(e) => Err(persist_err(path, e)),
    }
}

/// Overwrite the settings file atomically (temp file + rename).
pub async fn save(path: &Path, cfg: &BotConfig) -> Result<()> {
    let text = render(cfg)?;
    let tmp = temp_path(path);

    tokio::fs::write(&tmp, text.as_bytes())
        .await
        .map_err(|e| persist_err(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(persist_err(path, e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "settings".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Process-wide settings with serialized mutations.
///
/// The in-memory value is only replaced after the new state has been written,
/// so memory and disk never diverge.
pub struct ConfigStore {
    path: PathBuf,
    current: Mutex<BotConfig>,
}

impl ConfigStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cfg = load(&path).await?;
        Ok(Self {
            path,
            current: Mutex::new(cfg),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> BotConfig {
        self.current.lock().await.clone()
    }

    /// Apply `f` to a copy, persist it, then publish it.
    pub async fn update<F>(&self, f: F) -> Result<BotConfig>
    where
        F: FnOnce(&mut BotConfig),
    {
        let mut guard = self.current.lock().await;
        let mut next = guard.clone();
        f(&mut next);
        save(&self.path, &next).await?;
        *guard = next.clone();
        Ok(next)
    }

    pub async fn set_prefix(&self, prefix: &str) -> Result<BotConfig> {
        validate_prefix(prefix).map_err(Error::Usage)?;
        let prefix = prefix.to_string();
        self.update(move |cfg| cfg.prefix = prefix).await
    }

    pub async fn set_input_channel(&self, channel: ChannelId) -> Result<BotConfig> {
        self.update(|cfg| cfg.input_channel = channel).await
    }

    pub async fn set_output_channel(&self, channel: ChannelId) -> Result<BotConfig> {
        self.update(|cfg| cfg.output_channel = channel).await
    }
}

#[cfg(test)]
pub(crate) fn tmp_path(prefix: &str) -> PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static SEQ: AtomicUsize = AtomicUsize::new(0);

    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let pid = std::process::id();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("{prefix}-{pid}-{ts}-{seq}.toml"))
}
