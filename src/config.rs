use crate::options::Options;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the directory under the platform's config & data directories in
/// which the program keeps its files
const APP_DIR: &str = "timed-snake";

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Options selected on the main menu when the program starts
    pub(crate) options: Options,

    /// Settings about data files
    pub(crate) files: FileConfig,

    /// Name to save records under
    pub(crate) player_name: Option<String>,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the path to the records file: the one given in the
    /// configuration or, if that is not set, the default
    pub(crate) fn records_file(&self) -> Result<PathBuf, ConfigError> {
        match self.files.records_file {
            Some(ref p) => Ok(p.clone()),
            None => data_file("records.json"),
        }
    }

    /// Return the path to the log file: the one given in the configuration
    /// or, if that is not set, the default
    pub(crate) fn log_file(&self) -> Result<PathBuf, ConfigError> {
        match self.files.log_file {
            Some(ref p) => Ok(p.clone()),
            None => data_file("timed-snake.log"),
        }
    }
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which records of finished games are stored
    pub(crate) records_file: Option<PathBuf>,

    /// Path to which log messages are appended
    pub(crate) log_file: Option<PathBuf>,
}

fn data_file(name: &str) -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR).join(name))
        .ok_or(ConfigError::NoDataPath)
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to determine path to local data directory")]
    NoDataPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Variant;
    use crate::options::LevelSize;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty() {
        let config = toml::from_str::<Config>("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.options.mode, Variant::Classic);
        assert_eq!(config.options.level_size, LevelSize::Large);
    }

    #[test]
    fn full() {
        let config = toml::from_str::<Config>(
            r#"
player-name = "Jane"

[options]
mode = "basic"
level-size = "small"

[files]
records-file = "/tmp/records.json"
log-file = "/tmp/snake.log"
"#,
        )
        .unwrap();
        assert_eq!(
            config,
            Config {
                options: Options {
                    mode: Variant::Basic,
                    level_size: LevelSize::Small,
                },
                files: FileConfig {
                    records_file: Some(PathBuf::from("/tmp/records.json")),
                    log_file: Some(PathBuf::from("/tmp/snake.log")),
                },
                player_name: Some(String::from("Jane")),
            }
        );
        assert_eq!(
            config.records_file().unwrap(),
            PathBuf::from("/tmp/records.json")
        );
        assert_eq!(config.log_file().unwrap(), PathBuf::from("/tmp/snake.log"));
    }

    #[test]
    fn partial_options() {
        let config = toml::from_str::<Config>("[options]\nlevel-size = \"medium\"\n").unwrap();
        assert_eq!(config.options.mode, Variant::Classic);
        assert_eq!(config.options.level_size, LevelSize::Medium);
        assert_eq!(config.files, FileConfig::default());
    }

    #[test]
    fn bad_mode() {
        let r = toml::from_str::<Config>("[options]\nmode = \"turbo\"\n");
        assert!(r.is_err());
    }

    #[test]
    fn load_missing() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn load_invalid() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("config.toml");
        fs_err::write(&path, "player-name = [").unwrap();
        assert!(matches!(
            Config::load(&path, true),
            Err(ConfigError::Parse(_))
        ));
    }
}
