//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "data";

/// mathdb tool configuration
///
/// Sources, lowest priority first: built-in defaults, the global user file
/// (`~/.config/mathdb/config.yaml` or the platform equivalent), then
/// `MATHDB_*` environment variables. Command-line flags are applied on top
/// by the commands themselves.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory used by `serve` when none is given
    pub data_dir: Option<PathBuf>,

    /// Output directory used by `build` when none is given
    pub output_dir: Option<PathBuf>,

    /// Address the server binds to
    pub host: Option<String>,

    /// Port the server listens on
    pub port: Option<u16>,

    /// Base URL for `build --deploy` (overrides `main.json`)
    pub deploy_url: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match std::fs::read_to_string(&global_path)
                    .map_err(|e| e.to_string())
                    .and_then(|s| serde_yml::from_str::<Config>(&s).map_err(|e| e.to_string()))
                {
                    Ok(global) => config.merge(global),
                    Err(e) => tracing::warn!("ignoring {}: {}", global_path.display(), e),
                }
            }
        }

        config.merge(Self::from_env(|key| std::env::var(key).ok()));
        config
    }

    /// Read the `MATHDB_*` variables through `lookup`
    fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            data_dir: lookup("MATHDB_DATA_DIR").map(PathBuf::from),
            output_dir: lookup("MATHDB_OUTPUT_DIR").map(PathBuf::from),
            host: lookup("MATHDB_HOST"),
            port: lookup("MATHDB_PORT").and_then(|p| match p.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!("ignoring MATHDB_PORT={}: not a port number", p);
                    None
                }
            }),
            deploy_url: lookup("MATHDB_DEPLOY_URL"),
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mathdb")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.deploy_url.is_some() {
            self.deploy_url = other.deploy_url;
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir(), PathBuf::from("data"));
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: Config = serde_yml::from_str("host: 127.0.0.1\nport: 9000\n").unwrap();

        let env: HashMap<&str, &str> = [("MATHDB_PORT", "9100"), ("MATHDB_DATA_DIR", "/srv/data")]
            .into_iter()
            .collect();
        config.merge(Config::from_env(|k| env.get(k).map(|v| v.to_string())));

        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 9100);
        assert_eq!(config.data_dir(), PathBuf::from("/srv/data"));
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let config = Config::from_env(|k| (k == "MATHDB_PORT").then(|| "http".to_string()));
        assert_eq!(config.port, None);
    }
}
