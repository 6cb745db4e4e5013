use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Default size limit of a card field (Discord embed field value).
pub const DEFAULT_FIELD_LIMIT: usize = 1024;

/// Process-level configuration read from the environment.
///
/// The per-server settings (prefix and channels) live in the
/// [`ConfigStore`](crate::store::ConfigStore), not here.
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub settings_file: PathBuf,
    pub field_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let discord_token = env_str("FEEDBOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("FEEDBOT_TOKEN environment variable is required".to_string())
        })?;

        let settings_file =
            env_path("FEEDBOT_CONFIG_FILE").unwrap_or_else(|| PathBuf::from("FEEDBOT.toml"));

        let field_limit = env_usize("FEEDBOT_FIELD_LIMIT")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_FIELD_LIMIT);

        Ok(Self {
            discord_token,
            settings_file,
            field_limit,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_strips_quotes_and_export() {
        let parsed = parse_dotenv(
            "# comment\nexport FEEDBOT_TOKEN='abc'\nFEEDBOT_CONFIG_FILE = \"/srv/fb.toml\"\n\nnoequals\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("FEEDBOT_TOKEN".to_string(), "abc".to_string()),
                ("FEEDBOT_CONFIG_FILE".to_string(), "/srv/fb.toml".to_string()),
            ]
        );
    }

    #[test]
    fn blank_token_is_rejected() {
        assert_eq!(non_empty("   ".to_string()), None);
        assert_eq!(non_empty("tok".to_string()), Some("tok".to_string()));
    }
}
