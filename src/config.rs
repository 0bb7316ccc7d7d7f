use crate::options::Options;
use crate::scores::ScoreLog;
use crate::util::{data_file_path, LoadError, SaveError};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Default options when no options file is present
    #[serde(default)]
    pub(crate) options: Options,

    /// Name to prefill in the main menu
    #[serde(default)]
    pub(crate) player_name: Option<String>,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// A configuration that never touches the disk
    #[cfg(test)]
    pub(crate) fn offline() -> Config {
        Config {
            files: FileConfig {
                save_options: false,
                save_scores: false,
                ..FileConfig::default()
            },
            ..Config::default()
        }
    }

    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
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

    /// Return the filepath at which gameplay options should be stored: the
    /// file given in the configuration or, if that is not set, the default
    /// options file path.  Return `None` if no path is present in the
    /// configuration and the default path could not be computed.
    fn options_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .options_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| Options::default_path().map(Cow::from))
    }

    /// Load gameplay options from a file.  If the file does not exist, `self.options`
    /// is returned.
    ///
    /// If `self.files.save_options` is `false`, `self.options` is returned
    /// without reading anything from disk.
    pub(crate) fn load_options(&self) -> Result<Options, LoadError> {
        let r = if !self.files.save_options {
            Ok(None)
        } else if let Some(p) = self.options_file() {
            Options::load(&p)
        } else {
            Err(LoadError::no_path("options"))
        };
        match r {
            Ok(Some(opts)) => Ok(opts),
            Ok(None) => Ok(self.options),
            Err(e) => Err(e),
        }
    }

    /// Save the given gameplay options to a file.
    ///
    /// If `self.files.save_options` is `false`, nothing is saved.
    pub(crate) fn save_options(&self, options: Options) -> Result<(), SaveError> {
        if !self.files.save_options {
            return Ok(());
        }
        if let Some(p) = self.options_file() {
            options.save(&p)
        } else {
            Err(SaveError::no_path("options"))
        }
    }

    /// Return the score log that finished games should be recorded in.  If
    /// `self.files.save_scores` is `false`, the log discards everything.
    pub(crate) fn score_log(&self) -> ScoreLog {
        if !self.files.save_scores {
            return ScoreLog::disabled();
        }
        let path = self
            .files
            .scores_file
            .clone()
            .or_else(|| data_file_path("scores.jsonl"));
        ScoreLog::new(path)
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which gameplay options should be stored
    options_file: Option<PathBuf>,

    /// Whether to load & save gameplay options in a file
    save_options: bool,

    /// Path of the log of finished games
    scores_file: Option<PathBuf>,

    /// Whether to record finished games
    save_scores: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            options_file: None,
            save_options: true,
            scores_file: None,
            save_scores: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    options_file: Option<String>,
    save_options: bool,
    scores_file: Option<String>,
    save_scores: bool,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            options_file: None,
            save_options: true,
            scores_file: None,
            save_scores: true,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            options_file: value.options_file.map(expanduser::expanduser).transpose()?,
            save_options: value.save_options,
            scores_file: value.scores_file.map(expanduser::expanduser).transpose()?,
            save_scores: value.save_scores,
        })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BoardSize, BoundaryPolicy, Speed};
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_empty() {
        let cfg = toml::from_str::<Config>("").expect("empty config should parse");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parse_full() {
        let src = concat!(
            "player-name = \"Sam\"\n",
            "\n",
            "[options]\n",
            "speed = \"fast\"\n",
            "board-size = \"large\"\n",
            "walls = \"terminate\"\n",
            "\n",
            "[files]\n",
            "options-file = \"/tmp/gridsnake/options.json\"\n",
            "save-options = false\n",
            "scores-file = \"/tmp/gridsnake/scores.jsonl\"\n",
            "save-scores = true\n",
        );
        let cfg = toml::from_str::<Config>(src).expect("config should parse");
        assert_eq!(
            cfg,
            Config {
                options: Options {
                    speed: Speed::Fast,
                    board_size: BoardSize::Large,
                    walls: BoundaryPolicy::Terminate,
                },
                player_name: Some(String::from("Sam")),
                files: FileConfig {
                    options_file: Some(PathBuf::from("/tmp/gridsnake/options.json")),
                    save_options: false,
                    scores_file: Some(PathBuf::from("/tmp/gridsnake/scores.jsonl")),
                    save_scores: true,
                },
            }
        );
    }

    #[test]
    fn parse_partial_options() {
        let cfg = toml::from_str::<Config>("[options]\nboard-size = \"medium\"\n")
            .expect("config should parse");
        assert_eq!(
            cfg.options,
            Options {
                board_size: BoardSize::Medium,
                ..Options::default()
            }
        );
    }

    #[test]
    fn parse_bad_speed() {
        assert!(toml::from_str::<Config>("[options]\nspeed = \"ludicrous\"\n").is_err());
    }

    #[test]
    fn load_missing() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let path = tmpdir.path().join("config.toml");
        assert_eq!(
            Config::load(&path, true).expect("missing file is allowed"),
            Config::default()
        );
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn options_roundtrip_through_files() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let cfg = Config {
            files: FileConfig {
                options_file: Some(tmpdir.path().join("options.json")),
                ..FileConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(cfg.load_options().expect("should load"), Options::default());
        let opts = Options {
            speed: Speed::Medium,
            board_size: BoardSize::Large,
            walls: BoundaryPolicy::Terminate,
        };
        cfg.save_options(opts).expect("should save");
        assert_eq!(cfg.load_options().expect("should load"), opts);
    }

    #[test]
    fn options_not_saved_when_disabled() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let path = tmpdir.path().join("options.json");
        let cfg = Config {
            files: FileConfig {
                options_file: Some(path.clone()),
                save_options: false,
                ..FileConfig::default()
            },
            ..Config::default()
        };
        let opts = Options {
            speed: Speed::Fast,
            ..Options::default()
        };
        cfg.save_options(opts).expect("should be a no-op");
        assert!(!path.exists());
        assert_eq!(cfg.load_options().expect("should load"), Options::default());
    }
}
