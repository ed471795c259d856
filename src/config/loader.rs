//! Configuration loading: CLI flags, environment and an optional TOML file.
//!
//! Precedence is flag or environment variable, then file, then default. File
//! values are fed back through the CLI parser as `--flag=value` arguments so
//! they are validated exactly like flags.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::parser::ValueSource;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches};
use thiserror::Error;

use crate::config::schema::{ConfigFile, ServiceConfig};

/// Arguments that never come from the config file.
const NON_FILE_ARGS: [&str; 3] = ["config_path", "help", "version"];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Command line could not be parsed (includes `--help` and `--version`).
    #[error(transparent)]
    Cli(clap::Error),

    /// Config file exists but could not be read.
    #[error("could not read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Config file is not valid TOML.
    #[error("could not parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config file value could not be applied to its flag.
    #[error("could not set flag '{key}': {reason}")]
    Flag { key: String, reason: String },
}

/// Load configuration from the process arguments.
pub fn load_config() -> Result<ServiceConfig, ConfigError> {
    load_config_from(std::env::args_os())
}

/// Load configuration from an explicit argument list (first item is the binary name).
pub fn load_config_from<I, T>(args: I) -> Result<ServiceConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let command = ServiceConfig::command();

    let matches = command
        .clone()
        .try_get_matches_from(argv.iter().cloned())
        .map_err(ConfigError::Cli)?;

    let mut config_file = ConfigFile::NotSet;
    if let Some(path) = matches.get_one::<PathBuf>("config_path") {
        config_file = match read_config_file(path)? {
            Some(table) => {
                let extra = file_arguments(&command, &matches, &table)?;
                let binary = argv.first().cloned().unwrap_or_else(|| OsString::from("cosmos-exporter"));
                for (key, argument) in &extra {
                    check_file_argument(&command, &binary, key, argument)?;
                }

                let applied = extra.len();
                argv.extend(extra.into_iter().map(|(_, argument)| argument));
                ConfigFile::Merged {
                    path: path.clone(),
                    applied,
                }
            }
            None => ConfigFile::Missing(path.clone()),
        };
    }

    let matches = command
        .try_get_matches_from(argv)
        .map_err(|e| ConfigError::Flag {
            key: "config".to_string(),
            reason: e.to_string(),
        })?;
    let mut config = ServiceConfig::from_arg_matches(&matches).map_err(ConfigError::Cli)?;
    config.resolve_prefixes();
    config.config_file = config_file;

    Ok(config)
}

/// Parse one file-derived argument on its own so a rejected value names its key.
fn check_file_argument(
    command: &Command,
    binary: &OsString,
    key: &str,
    argument: &OsString,
) -> Result<(), ConfigError> {
    command
        .clone()
        .try_get_matches_from([binary.clone(), argument.clone()])
        .map(|_| ())
        .map_err(|e| ConfigError::Flag {
            key: key.to_string(),
            reason: e.to_string().trim().to_string(),
        })
}

/// Read and parse the config file. A missing file is not an error.
fn read_config_file(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let table = toml::from_str::<toml::Table>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(table))
}

/// Turn file values into `--flag=value` arguments for every flag the user
/// did not set on the command line or through the environment.
fn file_arguments(
    command: &Command,
    matches: &ArgMatches,
    table: &toml::Table,
) -> Result<Vec<(String, OsString)>, ConfigError> {
    let mut extra = Vec::new();

    for arg in command.get_arguments() {
        let id = arg.get_id().as_str();
        if NON_FILE_ARGS.contains(&id) {
            continue;
        }

        let Some(long) = arg.get_long() else {
            continue;
        };

        if matches!(
            matches.value_source(id),
            Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
        ) {
            continue;
        }

        let Some(value) = table.get(long) else {
            continue;
        };

        if let Some(rendered) = flag_value(long, value)? {
            extra.push((long.to_string(), OsString::from(format!("--{long}={rendered}"))));
        }
    }

    Ok(extra)
}

/// Render a TOML value the way it would be typed on the command line.
/// Empty arrays render to nothing.
fn flag_value(key: &str, value: &toml::Value) -> Result<Option<String>, ConfigError> {
    let rendered = match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(d) => d.to_string(),
        toml::Value::Array(items) => {
            if items.is_empty() {
                return Ok(None);
            }
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                if matches!(item, toml::Value::Array(_) | toml::Value::Table(_)) {
                    return Err(ConfigError::Flag {
                        key: key.to_string(),
                        reason: "nested values are not supported".to_string(),
                    });
                }
                if let Some(part) = flag_value(key, item)? {
                    parts.push(part);
                }
            }
            parts.join(",")
        }
        toml::Value::Table(_) => {
            return Err(ConfigError::Flag {
                key: key.to_string(),
                reason: "tables are not supported".to_string(),
            })
        }
    };

    Ok(Some(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_flags_override_defaults() {
        let config =
            load_config_from(["cosmos-exporter", "--oracle=true", "--lcd=http://x:1317"]).unwrap();
        assert!(config.oracle);
        assert_eq!(config.lcd, "http://x:1317");
    }

    #[test]
    fn test_bare_bool_flag() {
        let config = load_config_from(["cosmos-exporter", "--oracle", "--single"]).unwrap();
        assert!(config.oracle);
        assert!(config.single_req);
    }

    #[test]
    fn test_defaults() {
        let config = load_config_from(["cosmos-exporter"]).unwrap();
        assert!(!config.oracle);
        assert!(!config.single_req);
        assert_eq!(config.lcd, "http://localhost:1317");
        assert_eq!(config.listen_address, ":9300");
        assert_eq!(config.prefixes.account, "persistence");
        assert_eq!(config.prefixes.validator, "persistencevaloper");
    }

    #[test]
    fn test_file_fills_unset_flags() {
        let file = write_config(
            r#"
            lcd = "http://file:1317"
            bech-prefix = "pryzm"
            oracle = true
            wallets = ["pryzm1a", "pryzm1b"]
            limit = 50
            unknown-key = "ignored"
            "#,
        );
        let path = file.path().to_str().unwrap();

        let config = load_config_from(["cosmos-exporter", "--config", path]).unwrap();
        assert_eq!(config.lcd, "http://file:1317");
        assert_eq!(config.prefix, "pryzm");
        assert_eq!(config.prefixes.validator, "pryzmvaloper");
        assert!(config.oracle);
        assert_eq!(config.wallets, vec!["pryzm1a", "pryzm1b"]);
        assert_eq!(config.limit, 50);
    }

    #[test]
    fn test_explicit_flag_beats_file() {
        let file = write_config(
            r#"
            lcd = "http://file:1317"
            oracle = true
            "#,
        );
        let path = file.path().to_str().unwrap();

        let config = load_config_from([
            "cosmos-exporter",
            "--config",
            path,
            "--lcd",
            "http://flag:1317",
            "--oracle=false",
        ])
        .unwrap();
        assert_eq!(config.lcd, "http://flag:1317");
        assert!(!config.oracle);
    }

    #[test]
    fn test_missing_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config =
            load_config_from(["cosmos-exporter", "--config", path.to_str().unwrap()]).unwrap();
        assert_eq!(config.lcd, "http://localhost:1317");
        assert_eq!(config.config_file, ConfigFile::Missing(path));
    }

    #[test]
    fn test_merged_file_is_reported() {
        let file = write_config("lcd = \"http://file:1317\"\nlimit = 5");
        let config = load_config_from(["cosmos-exporter", "--config", file.path().to_str().unwrap()])
            .unwrap();
        assert_eq!(
            config.config_file,
            ConfigFile::Merged {
                path: file.path().to_path_buf(),
                applied: 2,
            }
        );
    }

    #[test]
    fn test_no_config_flag() {
        let config = load_config_from(["cosmos-exporter"]).unwrap();
        assert_eq!(config.config_file, ConfigFile::NotSet);
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        // A directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();

        let err = load_config_from(["cosmos-exporter", "--config", dir.path().to_str().unwrap()])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let file = write_config("lcd = \"unterminated");
        let err = load_config_from(["cosmos-exporter", "--config", file.path().to_str().unwrap()])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_bad_file_value_is_fatal() {
        let file = write_config("lcd = \"http://file:1317\"\nlimit = \"many\"");
        let err = load_config_from(["cosmos-exporter", "--config", file.path().to_str().unwrap()])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Flag { ref key, .. } if key == "limit"));
    }

    #[test]
    fn test_table_value_rejected() {
        let file = write_config("[lcd]\nurl = \"http://x\"");
        let err = load_config_from(["cosmos-exporter", "--config", file.path().to_str().unwrap()])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Flag { ref key, .. } if key == "lcd"));
    }
}
