//! TOML configuration file loading
//!
//! The default file is `<config dir>/prioq/prioq.toml`; a missing default
//! file is not an error. Keys mirror the long flag names:
//!
//! ```toml
//! queue = "/var/lib/app/jobs.db"
//! priorities = 4
//! log-level = "debug"
//! log-format = "ext"
//! log-file = "none"
//! color = false
//! ```
//!
//! Values given on the command line always win over the file.

use super::args::Args;
use super::error::CliError;
use std::path::{Path, PathBuf};

const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const VALID_LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("prioq").join("prioq.toml"))
}

/// Read and parse the configuration file
///
/// An explicitly named file must exist; the default file is optional.
pub async fn load_config_file(config_file: Option<&Path>) -> Result<Option<toml::Table>, CliError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(CliError::Config {
                message: format!(
                    "The specified configuration file does not exist: {}",
                    path.display()
                ),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| CliError::Config {
            message: format!("Error reading configuration file {}: {}", path.display(), e),
        })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|e| CliError::Config {
        message: format!("Error parsing configuration file {}: {}", path.display(), e),
    })?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(Some(table))
}

impl Args {
    /// Fill options not given on the command line from the config file
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), CliError> {
        if self.queue.is_none() {
            if let Some(queue) = string_value(config, "queue")? {
                self.queue = Some(PathBuf::from(queue));
            }
        }

        if self.priorities.is_none() {
            if let Some(value) = config.get("priorities") {
                let priorities = value
                    .as_integer()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| invalid("priorities", "a positive integer"))?;
                self.priorities = Some(priorities as u64);
            }
        }

        if self.log_level.is_none() {
            if let Some(level) = string_value(config, "log-level")? {
                if !VALID_LOG_LEVELS.contains(&level) {
                    return Err(invalid("log-level", &VALID_LOG_LEVELS.join(", ")));
                }
                self.log_level = Some(level.to_string());
            }
        }

        if self.log_format.is_none() {
            if let Some(format) = string_value(config, "log-format")? {
                if !VALID_LOG_FORMATS.contains(&format) {
                    return Err(invalid("log-format", &VALID_LOG_FORMATS.join(", ")));
                }
                self.log_format = Some(format.to_string());
            }
        }

        if self.log_file.is_none() {
            if let Some(log_file) = string_value(config, "log-file")? {
                self.log_file = Some(PathBuf::from(log_file));
            }
        }

        if let Some(value) = config.get("color") {
            let color = value.as_bool().ok_or_else(|| invalid("color", "true or false"))?;
            self.config_color = Some(color);
        }

        Ok(())
    }
}

fn string_value<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, CliError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| invalid(key, "a string")),
    }
}

fn invalid(key: &str, expected: &str) -> CliError {
    CliError::Config {
        message: format!("Invalid value for '{}' in configuration file: expected {}", key, expected),
    }
}
