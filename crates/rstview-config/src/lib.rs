//! Configuration management for rstview.
//!
//! Parses `rstview.toml` configuration files with serde and provides
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
//! - `server.host`
//! - `preview.python`
//! - `sphinx.conf_dir`
//! - `sphinx.build_dir`

mod expand;

use std::path::{Path, PathBuf};

use rstview_preview::{BuildConfig, Engine, PreviewSettings, normalize_path};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
/// Paths are used as given; callers pass absolute paths.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override preview engine.
    pub engine: Option<Engine>,
    /// Override Sphinx project directory.
    pub conf_dir: Option<PathBuf>,
    /// Override Sphinx HTML output directory.
    pub build_dir: Option<PathBuf>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override link rewriting flag.
    pub rewrite_links: Option<bool>,
    /// Override Python interpreter.
    pub python: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rstview.toml";

/// Default Sphinx HTML output directory, relative to the project directory.
const DEFAULT_BUILD_DIR: &str = "_build/html";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Preview configuration.
    pub preview: PreviewConfig,
    /// Sphinx project configuration (paths are relative strings from TOML).
    sphinx: SphinxConfigRaw,

    /// Resolved Sphinx configuration (set after loading).
    #[serde(skip)]
    pub sphinx_resolved: SphinxConfig,
    /// Directory relative paths are resolved against and the server serves from.
    #[serde(skip)]
    pub root_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Preview configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Preferred engine. `docutils` forces single-file rendering.
    pub engine: Engine,
    /// Docutils writer name.
    pub writer: String,
    /// Docutils writer part returned to the caller.
    pub writer_part: String,
    /// Rewrite relative resource links in project build output.
    pub rewrite_links: bool,
    /// Python interpreter running docutils.
    pub python: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let settings = PreviewSettings::default();
        Self {
            engine: settings.engine,
            writer: settings.writer,
            writer_part: settings.writer_part,
            rewrite_links: true,
            python: "python3".to_owned(),
        }
    }
}

/// Raw Sphinx configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SphinxConfigRaw {
    conf_dir: Option<String>,
    build_dir: Option<String>,
}

/// Resolved Sphinx configuration with absolute paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SphinxConfig {
    /// Project directory containing `conf.py`. `None` disables project builds.
    pub conf_dir: Option<PathBuf>,
    /// HTML output directory. Defaults to `<conf_dir>/_build/html`.
    pub build_dir: Option<PathBuf>,
}

impl SphinxConfig {
    /// Build configuration of the project, if one is configured.
    #[must_use]
    pub fn build_config(&self) -> Option<BuildConfig> {
        let conf_dir = self.conf_dir.clone()?;
        let output_dir = self
            .build_dir
            .clone()
            .unwrap_or_else(|| conf_dir.join(DEFAULT_BUILD_DIR));
        Some(BuildConfig {
            conf_dir,
            output_dir,
        })
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
        /// Config field path (e.g., "`sphinx.conf_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
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

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rstview.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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

    /// Per-request settings for the preview engine.
    #[must_use]
    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            engine: self.preview.engine,
            writer: self.preview.writer.clone(),
            writer_part: self.preview.writer_part.clone(),
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(engine) = settings.engine {
            self.preview.engine = engine;
        }
        if let Some(conf_dir) = &settings.conf_dir {
            self.sphinx_resolved.conf_dir = Some(normalize_path(conf_dir));
        }
        if let Some(build_dir) = &settings.build_dir {
            self.sphinx_resolved.build_dir = Some(normalize_path(build_dir));
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(rewrite_links) = settings.rewrite_links {
            self.preview.rewrite_links = rewrite_links;
        }
        if let Some(python) = &settings.python {
            self.preview.python.clone_from(python);
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

    /// Create default config rooted at the current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config rooted at the given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            preview: PreviewConfig::default(),
            sphinx: SphinxConfigRaw::default(),
            sphinx_resolved: SphinxConfig::default(),
            root_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        config.resolve_paths(&config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_preview()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_preview(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.preview.writer, "preview.writer")?;
        require_non_empty(&self.preview.writer_part, "preview.writer_part")?;
        require_non_empty(&self.preview.python, "preview.python")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.preview.python = expand::expand_env(&self.preview.python, "preview.python")?;

        if let Some(ref conf_dir) = self.sphinx.conf_dir {
            self.sphinx.conf_dir = Some(expand::expand_env(conf_dir, "sphinx.conf_dir")?);
        }
        if let Some(ref build_dir) = self.sphinx.build_dir {
            self.sphinx.build_dir = Some(expand::expand_env(build_dir, "sphinx.build_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: &str| normalize_path(&config_dir.join(path));

        self.sphinx_resolved = SphinxConfig {
            conf_dir: self.sphinx.conf_dir.as_deref().map(resolve),
            build_dir: self.sphinx.build_dir.as_deref().map(resolve),
        };
        self.root_dir = config_dir.to_path_buf();
    }
}
