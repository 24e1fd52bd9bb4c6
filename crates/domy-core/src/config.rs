use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

const USER_CONFIG_FILE: &str = "user.toml";

/// Persisted identity of the authenticated user.
///
/// `dir` is the user's default catalog and `key` the access token sent with
/// every registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub user: String,
    pub dir: String,
    pub key: String,
}

impl UserConfig {
    /// A freshly authenticated user owns the catalog named after them.
    pub fn for_user(user: &str, token: &str) -> Self {
        Self {
            user: user.to_string(),
            dir: user.to_string(),
            key: token.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserConfigStore {
    root: PathBuf,
}

impl UserConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(USER_CONFIG_FILE)
    }

    pub fn load(&self) -> Result<Option<UserConfig>> {
        let path = self.config_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SyncError::fs("failed reading user config", &path, err)),
        };

        let config: UserConfig =
            toml::from_str(&content).map_err(|err| SyncError::document(&path, err))?;
        if config.dir.trim().is_empty() || config.key.trim().is_empty() {
            return Err(SyncError::Auth(format!(
                "user config is incomplete: {}",
                path.display()
            )));
        }
        Ok(Some(config))
    }

    pub fn save(&self, config: &UserConfig) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .map_err(|err| SyncError::fs("failed creating config directory", &self.root, err))?;

        let path = self.config_path();
        let content = toml::to_string(config).map_err(|err| SyncError::document(&path, err))?;
        fs::write(&path, content)
            .map_err(|err| SyncError::fs("failed writing user config", &path, err))?;
        log::debug!("persisted credentials for '{}' at {}", config.user, path.display());
        Ok(path)
    }
}

/// Directory holding the user config: `$DOMY_HOME`, else `~/.domy`.
pub fn default_config_root() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("DOMY_HOME").filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    if cfg!(windows) {
        let app_data = std::env::var_os("LOCALAPPDATA").ok_or_else(|| {
            SyncError::Validation(
                "LOCALAPPDATA is not set; cannot resolve the config directory".to_string(),
            )
        })?;
        return Ok(PathBuf::from(app_data).join("Domy"));
    }

    let home = std::env::var_os("HOME").ok_or_else(|| {
        SyncError::Validation("HOME is not set; cannot resolve the config directory".to_string())
    })?;
    Ok(PathBuf::from(home).join(".domy"))
}

/// Access token for registry mutations.
pub fn require_token(config: Option<&UserConfig>) -> Result<&str> {
    config
        .map(|config| config.key.as_str())
        .ok_or_else(|| SyncError::Auth("no local user config; run `domy login` first".to_string()))
}
