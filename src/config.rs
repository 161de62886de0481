// Configuration
//
// Loaded in order of precedence:
// 1. Environment variables (highest priority)
// 2. Config file (~/.config/dashkit/config.toml)
// 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name: "dusk" or "paper"
    pub theme: String,

    /// Timestamp display format for chat entries
    pub timestamp_format: String,

    /// Initial page size for both dashboards
    pub page_size: usize,

    /// Page sizes offered by the paginator controls
    pub page_size_options: Vec<usize>,

    /// Log filter directive: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dusk".to_string(),
            timestamp_format: crate::widgets::chat::message::DEFAULT_TIMESTAMP_FORMAT.to_string(),
            page_size: 5,
            page_size_options: crate::widgets::paginator::DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            log_level: "info".to_string(),
        }
    }
}

/// Config file structure (everything optional; missing keys keep defaults)
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    ui: Option<FileUi>,
    chat: Option<FileChat>,
    paginator: Option<FilePaginator>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Deserialize, Default)]
struct FileUi {
    theme: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FileChat {
    timestamp_format: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FilePaginator {
    page_size: Option<usize>,
    page_size_options: Option<Vec<usize>>,
}

#[derive(Debug, Deserialize, Default)]
struct FileLogging {
    level: Option<String>,
}

impl Config {
    /// Load configuration: defaults, then config file, then environment
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
                        Ok(file) => config.apply_file(file),
                        Err(error) => {
                            tracing::warn!(%error, path = %path.display(), "ignoring bad config file")
                        }
                    },
                    Err(error) => {
                        tracing::warn!(%error, path = %path.display(), "could not read config file")
                    }
                }
            }
        }

        if let Ok(theme) = std::env::var("DASHKIT_THEME") {
            config.theme = theme;
        }
        if let Ok(size) = std::env::var("DASHKIT_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(size) if size >= 1 => config.page_size = size,
                _ => tracing::warn!(value = %size, "ignoring invalid DASHKIT_PAGE_SIZE"),
            }
        }
        if let Ok(level) = std::env::var("DASHKIT_LOG") {
            config.log_level = level;
        }

        config
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(ui) = file.ui {
            if let Some(theme) = ui.theme {
                self.theme = theme;
            }
        }
        if let Some(chat) = file.chat {
            if let Some(format) = chat.timestamp_format {
                self.timestamp_format = format;
            }
        }
        if let Some(paginator) = file.paginator {
            if let Some(size) = paginator.page_size {
                if size >= 1 {
                    self.page_size = size;
                }
            }
            if let Some(options) = paginator.page_size_options {
                if !options.is_empty() && options.iter().all(|&s| s >= 1) {
                    self.page_size_options = options;
                }
            }
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = level;
            }
        }
    }

    /// Path of the config file, platform dependent
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dashkit").join("config.toml"))
    }

    /// Serialize the effective configuration as a commented TOML document
    pub fn to_toml(&self) -> String {
        let options = self
            .page_size_options
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "# dashkit configuration\n\
             # Environment variables override this file:\n\
             #   DASHKIT_THEME, DASHKIT_PAGE_SIZE, DASHKIT_LOG\n\
             \n\
             [ui]\n\
             # Bundled themes: dusk, paper\n\
             theme = {theme:?}\n\
             \n\
             [chat]\n\
             # chrono strftime pattern for the message timestamp footer\n\
             timestamp_format = {timestamp_format:?}\n\
             \n\
             [paginator]\n\
             page_size = {page_size}\n\
             page_size_options = [{options}]\n\
             \n\
             [logging]\n\
             # trace, debug, info, warn, error\n\
             level = {log_level:?}\n",
            theme = self.theme,
            timestamp_format = self.timestamp_format,
            page_size = self.page_size,
            log_level = self.log_level,
        )
    }

    /// Create the config file with defaults if it does not exist yet
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(error) = std::fs::write(&path, Self::default().to_toml()) {
            tracing::warn!(%error, "could not write default config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serialized config must parse back; catches TOML syntax slips in
    /// to_toml when fields are added.
    #[test]
    fn test_config_roundtrip_default() {
        let config = Config::default();
        let toml_str = config.to_toml();

        let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
        assert!(
            parsed.is_ok(),
            "default config should round-trip.\nTOML:\n{}\nError: {:?}",
            toml_str,
            parsed.err()
        );

        let mut reloaded = Config::default();
        reloaded.apply_file(parsed.unwrap());
        assert_eq!(reloaded.theme, config.theme);
        assert_eq!(reloaded.page_size, config.page_size);
        assert_eq!(reloaded.page_size_options, config.page_size_options);
        assert_eq!(reloaded.timestamp_format, config.timestamp_format);
        assert_eq!(reloaded.log_level, config.log_level);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file: FileConfig = toml::from_str(
            "[ui]\ntheme = \"paper\"\n\
             [paginator]\npage_size = 10\npage_size_options = [10, 20]\n\
             [logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file);
        assert_eq!(config.theme, "paper");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_size_options, vec![10, 20]);
        assert_eq!(config.log_level, "debug");
        // Untouched section keeps its default
        assert_eq!(config.timestamp_format, "%H:%M");
    }

    #[test]
    fn test_invalid_paginator_values_are_rejected() {
        let file: FileConfig =
            toml::from_str("[paginator]\npage_size = 0\npage_size_options = []\n").unwrap();

        let mut config = Config::default();
        config.apply_file(file);
        assert_eq!(config.page_size, 5);
        assert_eq!(
            config.page_size_options,
            crate::widgets::paginator::DEFAULT_PAGE_SIZE_OPTIONS.to_vec()
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file: FileConfig = toml::from_str("[chat]\ntimestamp_format = \"%H:%M:%S\"\n").unwrap();
        let mut config = Config::default();
        config.apply_file(file);
        assert_eq!(config.timestamp_format, "%H:%M:%S");
        assert_eq!(config.theme, "dusk");
    }
}
