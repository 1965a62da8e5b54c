use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Component, Path};
use crate::errors::AppError;

/// Application configuration module
/// This module handles loading and validating the converter settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Subdirectory (next to each input) receiving the filtered scripts
    #[serde(default = "default_filtered_dir")]
    pub filtered_dir: String,

    /// Extension of the subtitle files to pick up
    #[serde(default = "default_input_extension")]
    pub input_extension: String,

    /// Extension of the lyric files to produce
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Descend into subdirectories when given a folder
    #[serde(default)]
    pub recursive: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_filtered_dir() -> String {
    "filtered".to_string()
}

fn default_input_extension() -> String {
    "ass".to_string()
}

fn default_output_extension() -> String {
    "lrc".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.input_extension.trim_start_matches('.').is_empty() {
            return Err(AppError::Config("input_extension must not be empty".to_string()));
        }

        if self.output_extension.trim_start_matches('.').is_empty() {
            return Err(AppError::Config("output_extension must not be empty".to_string()));
        }

        // Must be a single plain directory name
        let mut components = Path::new(&self.filtered_dir).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(AppError::Config(format!(
                    "filtered_dir must be a plain directory name, got {:?}",
                    self.filtered_dir
                )));
            }
        }

        if self
            .input_extension
            .trim_start_matches('.')
            .eq_ignore_ascii_case(self.output_extension.trim_start_matches('.'))
        {
            return Err(AppError::Config(
                "input_extension and output_extension must differ".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            filtered_dir: default_filtered_dir(),
            input_extension: default_input_extension(),
            output_extension: default_output_extension(),
            recursive: false,
            log_level: LogLevel::default(),
        }
    }
}
