use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::directory::DEFAULT_ENDPOINT;

/// On-disk configuration for the tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    endpoint: Option<String>,
}

/// Tool configuration, backed by a toml file in the user config directory.
///
/// A missing file is not an error; defaults apply until something is saved.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    data: ConfigFile,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(config_file_path()?)
    }

    fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                data: ConfigFile::default(),
            });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading config file from {}", path.display()))?;
        let data = toml::from_str(&contents)
            .with_context(|| format!("parsing config file at {}", path.display()))?;

        Ok(Self { path, data })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory at {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(&self.data).context("serializing config to toml")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("writing config file to {}", self.path.display()))?;
        Ok(())
    }

    /// Configured endpoint, falling back to the public demo collection.
    pub fn endpoint(&self) -> &str {
        self.data.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn set_endpoint<S: Into<String>>(&mut self, endpoint: S) {
        self.data.endpoint = Some(endpoint.into());
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn config_file_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("unable to determine user config directory")?
        .join("udir");
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_default_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("config.toml")).unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn save_then_load_round_trips_the_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("udir").join("config.toml");

        let mut config = Config::load_from(path.clone()).unwrap();
        config.set_endpoint("http://localhost:9000/users");
        config.save().unwrap();

        let reloaded = Config::load_from(path).unwrap();
        assert_eq!(reloaded.endpoint(), "http://localhost:9000/users");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint = [not toml").unwrap();
        assert!(Config::load_from(path).is_err());
    }
}
