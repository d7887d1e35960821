use serde::{Deserialize, Serialize};
use serenity::model::id::UserId;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "FUN_BOT_CONFIG";

/// Every sentinel written into a fresh config file starts with this.
pub const PLACEHOLDER_PREFIX: &str = "YOUR_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} did not exist; a template was written, fill in your bot token, owner ID and Gemini API key", .0.display())]
    Created(PathBuf),
    #[error("placeholder values still present in {}: {}", .path.display(), .keys.join(", "))]
    Placeholder { path: PathBuf, keys: Vec<&'static str> },
    #[error("owner_id {0:?} is not a valid Discord user ID")]
    OwnerId(String),
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape of the config file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub token: String,
    pub owner_id: String,
    pub gemini_api_key: String,
}

impl ConfigFile {
    fn template() -> Self {
        Self {
            token: format!("{PLACEHOLDER_PREFIX}DISCORD_BOT_TOKEN"),
            owner_id: format!("{PLACEHOLDER_PREFIX}DISCORD_USER_ID"),
            gemini_api_key: format!("{PLACEHOLDER_PREFIX}GEMINI_API_KEY"),
        }
    }

    fn placeholder_keys(&self) -> Vec<&'static str> {
        [
            ("token", &self.token),
            ("owner_id", &self.owner_id),
            ("gemini_api_key", &self.gemini_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| is_placeholder(value))
        .map(|(key, _)| key)
        .collect()
    }
}

pub fn is_placeholder(value: &str) -> bool {
    value.starts_with(PLACEHOLDER_PREFIX)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub owner_id: UserId,
    pub gemini_api_key: String,
}

impl Config {
    /// Resolves the config path from `FUN_BOT_CONFIG`, falling back to `config.json`.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Reads the config file, writing a template and failing if it is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading configuration from {}", path.display());

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                write_template(path)?;
                return Err(ConfigError::Created(path.to_path_buf()));
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let raw: ConfigFile =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::validate(path, raw)
    }

    /// Rejects leftover placeholders before anything touches the network.
    pub fn validate(path: &Path, raw: ConfigFile) -> Result<Self, ConfigError> {
        let keys = raw.placeholder_keys();
        if !keys.is_empty() {
            warn!("Placeholder values left in {}: {:?}", path.display(), keys);
            return Err(ConfigError::Placeholder {
                path: path.to_path_buf(),
                keys,
            });
        }

        let owner_id = raw
            .owner_id
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(UserId::new)
            .ok_or_else(|| ConfigError::OwnerId(raw.owner_id.clone()))?;

        debug!("Discord token length: {}", raw.token.len());
        debug!("Gemini API key length: {}", raw.gemini_api_key.len());

        Ok(Config {
            discord_token: raw.token,
            owner_id,
            gemini_api_key: raw.gemini_api_key,
        })
    }
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(io_err)?;
    write_template_into(path, file)?;

    info!("Wrote config template to {}", path.display());
    Ok(())
}

fn write_template_into<W: Write>(path: &Path, sink: W) -> Result<(), ConfigError> {
    let mut writer = BufWriter::new(sink);
    serde_json::to_writer_pretty(&mut writer, &ConfigFile::template()).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    // a failed flush means a truncated template
    writer.flush().map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
