//! Configuration management for dokumd.
//!
//! Parses `dokumd.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `paths.source_dir`
//! - `paths.destination_dir`
//! - `paths.media_folder`
//! - `logging.level`
//! - `logging.file`

mod expand;
mod source;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use source::{PAGES_DIR, SourceError, validate_source};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override DokuWiki data directory.
    pub source_dir: Option<PathBuf>,
    /// Override vault directory.
    pub destination_dir: Option<PathBuf>,
    /// Override media folder name.
    pub media_folder: Option<String>,
    /// Override worker thread count.
    pub threads: Option<usize>,
    /// Override default image width.
    pub image_width: Option<u32>,
    /// Override log file path.
    pub log_file: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dokumd.toml";

/// Default log file name, relative to the config directory.
const DEFAULT_LOG_FILE: &str = "converter.log";

const DEFAULT_MEDIA_FOLDER: &str = "media";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Paths as relative strings from TOML.
    paths: PathsConfigRaw,
    /// Conversion settings.
    pub convert: ConvertConfig,
    /// Worker pool settings.
    pub runtime: RuntimeConfig,
    /// Logging settings as parsed from TOML.
    logging: LoggingConfigRaw,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Resolved logging configuration (set after loading).
    #[serde(skip)]
    pub logging_resolved: LoggingConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    #[allow(clippy::derivable_impls)]
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw path configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    source_dir: Option<String>,
    destination_dir: Option<String>,
    media_folder: Option<String>,
}

/// Resolved path configuration with absolute paths.
///
/// Source and destination stay `None` when neither the file nor the CLI
/// names them; the CLI prompts for them.
#[derive(Debug)]
pub struct PathsConfig {
    /// DokuWiki data directory (contains `pages/`).
    pub source_dir: Option<PathBuf>,
    /// Obsidian vault directory.
    pub destination_dir: Option<PathBuf>,
    /// Media folder name, both under the source and the destination.
    pub media_folder: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            destination_dir: None,
            media_folder: DEFAULT_MEDIA_FOLDER.to_owned(),
        }
    }
}

/// Conversion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Width for embedded images without an explicit size.
    pub default_image_width: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            default_image_width: 300,
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of worker threads for page conversion and media copies.
    pub threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { threads: 4 }
    }
}

/// Raw logging configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LoggingConfigRaw {
    level: Option<String>,
    file: Option<String>,
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set.
    pub level: String,
    /// Log file appended to on every run.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`paths.source_dir`").
        field: String,
        /// Error message (e.g., "${`WIKI_DATA`} is not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a numeric field to fall inside an inclusive range.
fn require_in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ConfigError::Validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dokumd.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged
    /// configuration is validated once more.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.paths_resolved.source_dir = Some(source_dir.clone());
        }
        if let Some(destination_dir) = &settings.destination_dir {
            self.paths_resolved.destination_dir = Some(destination_dir.clone());
        }
        if let Some(media_folder) = &settings.media_folder {
            self.paths_resolved.media_folder.clone_from(media_folder);
        }
        if let Some(threads) = settings.threads {
            self.runtime.threads = threads;
        }
        if let Some(image_width) = settings.image_width {
            self.convert.default_image_width = image_width;
        }
        if let Some(log_file) = &settings.log_file {
            self.logging_resolved.file.clone_from(log_file);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            paths: PathsConfigRaw::default(),
            convert: ConvertConfig::default(),
            runtime: RuntimeConfig::default(),
            logging: LoggingConfigRaw::default(),
            paths_resolved: PathsConfig::default(),
            logging_resolved: LoggingConfig {
                file: base.join(DEFAULT_LOG_FILE),
                ..LoggingConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_paths()?;
        self.validate_limits()?;
        self.validate_logging()?;
        Ok(())
    }

    /// Media folder must be one plain path segment.
    fn validate_paths(&self) -> Result<(), ConfigError> {
        let media_folder = &self.paths_resolved.media_folder;
        require_non_empty(media_folder, "paths.media_folder")?;
        if media_folder.contains(['/', '\\']) || media_folder == "." || media_folder == ".." {
            return Err(ConfigError::Validation(format!(
                "paths.media_folder must be a single folder name, got '{media_folder}'"
            )));
        }
        Ok(())
    }

    fn validate_limits(&self) -> Result<(), ConfigError> {
        const MAX_THREADS: usize = 256;
        const MAX_IMAGE_WIDTH: u32 = 10_000;

        require_in_range(self.runtime.threads, 1, MAX_THREADS, "runtime.threads")?;
        require_in_range(
            self.convert.default_image_width,
            1,
            MAX_IMAGE_WIDTH,
            "convert.default_image_width",
        )?;
        Ok(())
    }

    fn validate_logging(&self) -> Result<(), ConfigError> {
        let level = &self.logging_resolved.level;
        if !LOG_LEVELS.iter().any(|known| level.eq_ignore_ascii_case(known)) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}, got '{level}'",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.paths.source_dir =
            expand::expand_opt(self.paths.source_dir.as_deref(), "paths.source_dir")?;
        self.paths.destination_dir = expand::expand_opt(
            self.paths.destination_dir.as_deref(),
            "paths.destination_dir",
        )?;
        self.paths.media_folder =
            expand::expand_opt(self.paths.media_folder.as_deref(), "paths.media_folder")?;
        self.logging.level = expand::expand_opt(self.logging.level.as_deref(), "logging.level")?;
        self.logging.file = expand::expand_opt(self.logging.file.as_deref(), "logging.file")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>| path.map(|p| config_dir.join(p));

        self.paths_resolved = PathsConfig {
            source_dir: resolve(self.paths.source_dir.as_deref()),
            destination_dir: resolve(self.paths.destination_dir.as_deref()),
            media_folder: self
                .paths
                .media_folder
                .clone()
                .unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_owned()),
        };

        self.logging_resolved = LoggingConfig {
            level: self
                .logging
                .level
                .clone()
                .unwrap_or_else(|| "info".to_owned()),
            file: config_dir.join(self.logging.file.as_deref().unwrap_or(DEFAULT_LOG_FILE)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.paths_resolved.source_dir, None);
        assert_eq!(config.paths_resolved.destination_dir, None);
        assert_eq!(config.paths_resolved.media_folder, "media");
        assert_eq!(config.convert.default_image_width, 300);
        assert_eq!(config.runtime.threads, 4);
        assert_eq!(config.logging_resolved.level, "info");
        assert_eq!(
            config.logging_resolved.file,
            PathBuf::from("/test/converter.log")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.convert.default_image_width, 300);
        assert_eq!(config.runtime.threads, 4);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[paths]
source_dir = "data"
destination_dir = "vault"
media_folder = "attachments"

[convert]
default_image_width = 480

[runtime]
threads = 8

[logging]
level = "debug"
file = "logs/dokumd.log"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.paths_resolved.source_dir,
            Some(PathBuf::from("/project/data"))
        );
        assert_eq!(
            config.paths_resolved.destination_dir,
            Some(PathBuf::from("/project/vault"))
        );
        assert_eq!(config.paths_resolved.media_folder, "attachments");
        assert_eq!(config.convert.default_image_width, 480);
        assert_eq!(config.runtime.threads, 8);
        assert_eq!(config.logging_resolved.level, "debug");
        assert_eq!(
            config.logging_resolved.file,
            PathBuf::from("/project/logs/dokumd.log")
        );
    }

    #[test]
    fn test_absolute_paths_kept() {
        let toml = r#"
[paths]
source_dir = "/srv/dokuwiki/data"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.paths_resolved.source_dir,
            Some(PathBuf::from("/srv/dokuwiki/data"))
        );
    }

    #[test]
    fn test_unknown_field_type_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[runtime]\nthreads = \"many\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/wiki/data")),
            threads: Some(16),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.paths_resolved.source_dir,
            Some(PathBuf::from("/wiki/data"))
        );
        assert_eq!(config.runtime.threads, 16);
        assert_eq!(config.paths_resolved.destination_dir, None); // Unchanged
        assert_eq!(config.convert.default_image_width, 300); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_log_file_and_width() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            image_width: Some(640),
            log_file: Some(PathBuf::from("/tmp/run.log")),
            media_folder: Some("files".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.convert.default_image_width, 640);
        assert_eq!(config.logging_resolved.file, PathBuf::from("/tmp/run.log"));
        assert_eq!(config.paths_resolved.media_folder, "files");
    }

    #[test]
    fn test_validate_threads_range() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.runtime.threads = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("runtime.threads"));

        config.runtime.threads = 257;
        assert!(config.validate().is_err());

        config.runtime.threads = 256;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_image_width_range() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.convert.default_image_width = 0;
        assert!(config.validate().is_err());

        config.convert.default_image_width = 10_001;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("convert.default_image_width"));
    }

    #[test]
    fn test_validate_media_folder_single_segment() {
        let mut config = Config::default_with_base(Path::new("/test"));
        for bad in ["", "a/b", "a\\b", ".", ".."] {
            config.paths_resolved.media_folder = bad.to_owned();
            assert!(config.validate().is_err(), "accepted {bad:?}");
        }
        config.paths_resolved.media_folder = "assets".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.logging_resolved.level = "WARN".to_owned();
        assert!(config.validate().is_ok());

        config.logging_resolved.level = "loud".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/dokumd.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[paths]\nsource_dir = \"data\"\ndestination_dir = \"vault\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.paths_resolved.source_dir,
            Some(temp.path().join("data"))
        );
        assert_eq!(
            config.paths_resolved.destination_dir,
            Some(temp.path().join("vault"))
        );
        assert_eq!(config.logging_resolved.file, temp.path().join("converter.log"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            threads: Some(0),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_expands_env_vars() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[paths]\nsource_dir = \"${DOKUMD_TEST_SOURCE:-wiki}/data\"\n",
        )
        .unwrap();
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOKUMD_TEST_SOURCE");
        }

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.paths_resolved.source_dir,
            Some(temp.path().join("wiki/data"))
        );
    }
}
