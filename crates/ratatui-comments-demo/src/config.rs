//! Demo settings, resolved as defaults, then the TOML file, then command-line flags.
//!
//! ```toml
//! [thread]
//! max_depth = 3
//! admin = true
//! accent = "#10b981"
//! logged_in = true
//! author = "Dana"
//!
//! [logging]
//! level = "debug"
//! file = "comments-demo.log"
//! ```

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use ratatui_comments::format::AvatarColor;
use serde::Deserialize;

pub const DEFAULT_LOG_FILE: &str = "comments-demo.log";
pub const DEFAULT_MAX_DEPTH: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub thread: ThreadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreadConfig {
    pub max_depth: Option<usize>,
    pub admin: Option<bool>,
    pub accent: Option<String>,
    pub logged_in: Option<bool>,
    pub author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Flag values that override the file. `None` means the flag was not given.
#[derive(Debug, Default)]
pub struct Overrides {
    pub max_depth: Option<usize>,
    pub admin: bool,
    pub accent: Option<String>,
    pub logged_in: Option<bool>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub max_depth: usize,
    pub admin: bool,
    pub accent: Option<AvatarColor>,
    pub logged_in: Option<bool>,
    pub author: Option<String>,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

pub fn parse_config(contents: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

impl Settings {
    pub fn resolve(file: FileConfig, flags: Overrides) -> Result<Self, ConfigError> {
        let max_depth = flags
            .max_depth
            .or(file.thread.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH);
        let accent = flags
            .accent
            .or(file.thread.accent)
            .map(|raw| {
                AvatarColor::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
                    field: "accent",
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let log_level = match flags.log_level.or(file.logging.level) {
            Some(raw) => LevelFilter::from_str(&raw).map_err(|_| ConfigError::InvalidValue {
                field: "level",
                reason: format!("unknown log level {raw:?}"),
            })?,
            None => LevelFilter::Info,
        };
        let settings = Self {
            max_depth,
            admin: flags.admin || file.thread.admin.unwrap_or(false),
            accent,
            logged_in: flags.logged_in.or(file.thread.logged_in),
            author: file.thread.author.filter(|a| !a.trim().is_empty()),
            log_level,
            log_file: flags
                .log_file
                .or(file.logging.file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::resolve(parse_config("").unwrap(), Overrides::default()).unwrap();
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!settings.admin);
        assert_eq!(settings.accent, None);
        assert_eq!(settings.logged_in, None);
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert_eq!(settings.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn flags_override_file() {
        let file = parse_config(
            r##"
            [thread]
            max_depth = 2
            accent = "#10b981"
            logged_in = false
            author = "Dana"

            [logging]
            level = "warn"
            "##,
        )
        .unwrap();
        let flags = Overrides {
            max_depth: Some(4),
            logged_in: Some(true),
            log_level: Some("trace".to_string()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(file, flags).unwrap();
        assert_eq!(settings.max_depth, 4);
        assert_eq!(settings.accent, Some(AvatarColor::new(0x10, 0xb9, 0x81)));
        assert_eq!(settings.logged_in, Some(true));
        assert_eq!(settings.author.as_deref(), Some("Dana"));
        assert_eq!(settings.log_level, LevelFilter::Trace);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("[thread]\ncolour = \"red\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_depth_is_invalid() {
        let file = parse_config("[thread]\nmax_depth = 0\n").unwrap();
        let err = Settings::resolve(file, Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_depth",
                ..
            }
        ));
    }

    #[test]
    fn bad_accent_is_invalid() {
        let flags = Overrides {
            accent: Some("blue".to_string()),
            ..Overrides::default()
        };
        let err = Settings::resolve(FileConfig::default(), flags).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "accent", .. }));
    }
}
