//! TOML configuration file loading and settings resolution
//!
//! Settings are layered: built-in defaults, then the configuration file,
//! then command-line arguments.
//!
//! ```toml
//! capacity = 20
//! aging-interval = 4
//! expiry-time = 40
//! log-level = "debug"
//! log-format = "ext"
//! log-file = "none"
//! color = false
//! delay-ms = 250
//! ```

use crate::app::cli::args::Args;
use crate::app::error::{AppError, AppResult};
use crate::core::logging::{level_from_verbosity, DEFAULT_LOG_LEVEL};
use crate::core::validation::{
    validate_log_format, validate_log_level, validate_positive_int, ValidationError,
    ValidationResult,
};
use crate::queue::QueueConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DELAY_MS: u64 = 500;
pub const CONFIG_DIR_NAME: &str = "Printqueue";
pub const CONFIG_FILE_NAME: &str = "printqueue.toml";

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub queue: QueueConfig,
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<PathBuf>,
    /// `None` means decide from the terminal
    pub color: Option<bool>,
    pub delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: "text".to_string(),
            log_file: None,
            color: None,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read the configuration file, if any
///
/// An explicit path must exist. Without one the default location is used
/// only when a file is present there.
pub fn load_config_file(explicit: Option<&Path>) -> AppResult<Option<toml::Table>> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(AppError::Config {
                message: format!(
                    "The specified configuration file does not exist: {}",
                    path.display()
                ),
            });
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| AppError::Config {
        message: format!("Error reading configuration file {}: {}", path.display(), e),
    })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|e| AppError::Config {
        message: format!("Error parsing configuration file {}: {}", path.display(), e),
    })?;
    Ok(Some(table))
}

fn integer_field(config: &toml::Table, key: &str) -> ValidationResult<Option<i64>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| ValidationError::new(format!("{} must be an integer", key))),
    }
}

fn string_field<'a>(config: &'a toml::Table, key: &str) -> ValidationResult<Option<&'a str>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ValidationError::new(format!("{} must be a string", key))),
    }
}

impl Settings {
    /// Defaults, overlaid with `config`, overlaid with `args`
    pub fn resolve(args: &Args, config: Option<&toml::Table>) -> ValidationResult<Self> {
        let mut settings = Settings::default();
        if let Some(config) = config {
            settings.apply_toml_values(config)?;
        }
        settings.apply_args(args);
        settings.queue.validate().map_err(|e| ValidationError::new(e.to_string()))?;
        Ok(settings)
    }

    /// Apply TOML configuration values
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> ValidationResult<()> {
        if let Some(capacity) = integer_field(config, "capacity")? {
            self.queue.capacity = validate_positive_int("capacity", capacity)? as usize;
        }
        if let Some(interval) = integer_field(config, "aging-interval")? {
            self.queue.aging_interval = validate_positive_int("aging-interval", interval)?;
        }
        if let Some(expiry) = integer_field(config, "expiry-time")? {
            self.queue.expiry_time = validate_positive_int("expiry-time", expiry)?;
        }
        if let Some(level) = string_field(config, "log-level")? {
            self.log_level = validate_log_level(level)?;
        }
        if let Some(format) = string_field(config, "log-format")? {
            self.log_format = validate_log_format(format)?;
        }
        if let Some(log_file) = string_field(config, "log-file")? {
            self.log_file = parse_log_file(log_file);
        }
        if let Some(value) = config.get("color") {
            let color = value
                .as_bool()
                .ok_or_else(|| ValidationError::new("color must be true or false"))?;
            self.color = Some(color);
        }
        if let Some(delay_ms) = integer_field(config, "delay-ms")? {
            if delay_ms < 0 {
                return Err(ValidationError::new(format!(
                    "delay-ms must not be negative (got {})",
                    delay_ms
                )));
            }
            self.delay = Duration::from_millis(delay_ms as u64);
        }
        Ok(())
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(capacity) = args.capacity {
            self.queue.capacity = capacity as usize;
        }
        if let Some(interval) = args.aging_interval {
            self.queue.aging_interval = interval;
        }
        if let Some(expiry) = args.expiry_time {
            self.queue.expiry_time = expiry;
        }

        // An explicit --log-level beats -v/-q, which beat the file
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        } else if args.verbosity() != 0 {
            self.log_level = level_from_verbosity(args.verbosity()).to_string();
        }
        if let Some(format) = &args.log_format {
            self.log_format = format.clone();
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = parse_log_file(&log_file.to_string_lossy());
        }
        if let Some(color) = args.color_override() {
            self.color = Some(color);
        }
    }

    /// Colour decision for stdout: explicit setting, else `NO_COLOR`, else TTY
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        self.color.unwrap_or_else(|| {
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
        })
    }
}

// "none" and "-" mean log to stderr
fn parse_log_file(value: &str) -> Option<PathBuf> {
    if value.eq_ignore_ascii_case("none") || value == "-" || value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
