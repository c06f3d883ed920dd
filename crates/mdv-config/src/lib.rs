//! Configuration management for mdv.
//!
//! Parses `mdv.toml` configuration files with serde and provides
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
//! - `server.access_token`
//! - `generator.program`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override generated docs directory.
    pub generated_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdv.toml";

/// Default client-side mermaid script.
pub const DEFAULT_MERMAID_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Generator configuration (paths are relative strings from TOML).
    generator: GeneratorConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved generator configuration (set after loading).
    #[serde(skip)]
    pub generator_resolved: GeneratorConfig,
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
    /// Prefix all routes are mounted under (`""` mounts at the root).
    pub base_path: String,
    /// Bearer token required on every request (`None` allows all).
    pub access_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            base_path: String::new(),
            access_token: None,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    generated_dir: Option<String>,
    mermaid_script: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Document root with markdown sources.
    pub source_dir: PathBuf,
    /// Generated-docs root with pre-built static HTML.
    pub generated_dir: PathBuf,
    /// Script URL loaded by rendered pages to draw mermaid diagrams.
    pub mermaid_script: String,
}

/// Raw generator configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GeneratorConfigRaw {
    program: Option<String>,
    args: Option<Vec<String>>,
    output_flag: Option<String>,
    project_dir: Option<String>,
    host_module: Option<String>,
    modules_dir: Option<String>,
    module_prefix: Option<String>,
    marker_file: Option<String>,
    search_path_env: Option<String>,
    install_hint: Option<String>,
    active_modules: Option<Vec<String>>,
}

/// Resolved external documentation generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Executable to run.
    pub program: String,
    /// Arguments placed before the output flag.
    pub args: Vec<String>,
    /// Flag that introduces the output directory argument.
    pub output_flag: String,
    /// Working directory of the generator; also prepended to the search path.
    pub project_dir: PathBuf,
    /// Directory the generator writes into.
    pub output_dir: PathBuf,
    /// Module of the hosting application, always documented first.
    pub host_module: String,
    /// Directory (relative to `project_dir`) holding extension modules.
    pub modules_dir: String,
    /// Prefix turning an extension directory name into a module name.
    pub module_prefix: String,
    /// File an extension directory must contain to count as a module.
    pub marker_file: String,
    /// Environment variable the project directory is prepended to.
    pub search_path_env: Option<String>,
    /// Message returned when the generator executable is missing.
    pub install_hint: String,
    /// Statically configured active modules (`None` documents everything).
    pub active_modules: Option<Vec<String>>,
}

impl GeneratorConfig {
    /// Default generator configuration rooted at `project_dir`.
    #[must_use]
    pub fn with_project_dir(project_dir: &Path) -> Self {
        Self {
            program: "python3".to_owned(),
            args: ["-m", "pdoc", "--docformat", "google", "--no-show-source"]
                .map(str::to_owned)
                .to_vec(),
            output_flag: "--output-dir".to_owned(),
            project_dir: project_dir.to_path_buf(),
            output_dir: project_dir.join("docs_dev"),
            host_module: "app".to_owned(),
            modules_dir: "plugins".to_owned(),
            module_prefix: "plugins.".to_owned(),
            marker_file: "__init__.py".to_owned(),
            search_path_env: Some("PYTHONPATH".to_owned()),
            install_hint: "pdoc not found. Please install it: pip install pdoc".to_owned(),
            active_modules: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::with_project_dir(Path::new("."))
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
        /// Config field path (e.g., "`server.access_token`").
        field: String,
        /// Error message (e.g., "${`MDV_TOKEN`} not set").
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
    /// Otherwise, searches for `mdv.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(generated_dir) = &settings.generated_dir {
            self.docs_resolved.generated_dir.clone_from(generated_dir);
            self.generator_resolved.output_dir.clone_from(generated_dir);
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
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            generator: GeneratorConfigRaw::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                generated_dir: base.join("docs_dev"),
                mermaid_script: DEFAULT_MERMAID_SCRIPT.to_owned(),
            },
            generator_resolved: GeneratorConfig::with_project_dir(base),
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
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_generator()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        let base_path = &self.server.base_path;
        if !base_path.is_empty() && (!base_path.starts_with('/') || base_path.ends_with('/')) {
            return Err(ConfigError::Validation(
                "server.base_path must start with '/' and must not end with '/'".to_owned(),
            ));
        }

        if let Some(token) = &self.server.access_token {
            require_non_empty(token, "server.access_token")?;
        }

        Ok(())
    }

    /// Validate generator configuration.
    fn validate_generator(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.generator_resolved.program, "generator.program")?;
        require_non_empty(&self.generator_resolved.host_module, "generator.host_module")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref token) = self.server.access_token {
            self.server.access_token = Some(expand::expand_env(token, "server.access_token")?);
        }

        if let Some(ref program) = self.generator.program {
            self.generator.program = Some(expand::expand_env(program, "generator.program")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            generated_dir: resolve(self.docs.generated_dir.as_deref(), "docs_dev"),
            mermaid_script: self
                .docs
                .mermaid_script
                .clone()
                .unwrap_or_else(|| DEFAULT_MERMAID_SCRIPT.to_owned()),
        };

        let project_dir = resolve(self.generator.project_dir.as_deref(), ".");
        let defaults = GeneratorConfig::with_project_dir(&project_dir);
        let raw = &self.generator;
        self.generator_resolved = GeneratorConfig {
            program: raw.program.clone().unwrap_or(defaults.program),
            args: raw.args.clone().unwrap_or(defaults.args),
            output_flag: raw.output_flag.clone().unwrap_or(defaults.output_flag),
            output_dir: self.docs_resolved.generated_dir.clone(),
            host_module: raw.host_module.clone().unwrap_or(defaults.host_module),
            modules_dir: raw.modules_dir.clone().unwrap_or(defaults.modules_dir),
            module_prefix: raw.module_prefix.clone().unwrap_or(defaults.module_prefix),
            marker_file: raw.marker_file.clone().unwrap_or(defaults.marker_file),
            // An empty string in the file disables search path injection.
            search_path_env: match &raw.search_path_env {
                Some(name) if name.is_empty() => None,
                Some(name) => Some(name.clone()),
                None => defaults.search_path_env,
            },
            install_hint: raw.install_hint.clone().unwrap_or(defaults.install_hint),
            active_modules: raw.active_modules.clone(),
            project_dir,
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
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.server.base_path, "");
        assert!(config.server.access_token.is_none());
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(
            config.docs_resolved.generated_dir,
            PathBuf::from("/test/docs_dev")
        );
        assert_eq!(config.generator_resolved.program, "python3");
        assert_eq!(
            config.generator_resolved.output_dir,
            PathBuf::from("/test/docs_dev")
        );
        assert!(config.generator_resolved.active_modules.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
base_path = "/admin"
access_token = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.base_path, "/admin");
        assert_eq!(config.server.access_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "manual"
generated_dir = "build/api"

[generator]
project_dir = "src"
active_modules = ["Users"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/manual")
        );
        assert_eq!(
            config.docs_resolved.generated_dir,
            PathBuf::from("/project/build/api")
        );
        assert_eq!(
            config.generator_resolved.project_dir,
            PathBuf::from("/project/src")
        );
        assert_eq!(
            config.generator_resolved.output_dir,
            PathBuf::from("/project/build/api")
        );
        assert_eq!(
            config.generator_resolved.active_modules,
            Some(vec!["Users".to_owned()])
        );
        assert_eq!(config.generator_resolved.host_module, "app");
    }

    #[test]
    fn test_resolve_generator_overrides() {
        let toml = r#"
[generator]
program = "pdoc"
args = ["--no-search"]
output_flag = "-o"
host_module = "core"
modules_dir = "ext"
module_prefix = "ext."
marker_file = "mod.py"
search_path_env = ""
install_hint = "install pdoc"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let generator = &config.generator_resolved;
        assert_eq!(generator.program, "pdoc");
        assert_eq!(generator.args, vec!["--no-search".to_owned()]);
        assert_eq!(generator.output_flag, "-o");
        assert_eq!(generator.host_module, "core");
        assert_eq!(generator.modules_dir, "ext");
        assert_eq!(generator.module_prefix, "ext.");
        assert_eq!(generator.marker_file, "mod.py");
        assert!(generator.search_path_env.is_none());
        assert_eq!(generator.install_hint, "install pdoc");
    }

    #[test]
    fn test_resolve_mermaid_script_default() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.docs_resolved.mermaid_script, DEFAULT_MERMAID_SCRIPT);
    }

    #[test]
    fn test_apply_cli_settings_host() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 7979); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(9000),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(
            config.docs_resolved.generated_dir,
            PathBuf::from("/test/docs_dev")
        );
    }

    #[test]
    fn test_apply_cli_settings_generated_dir_moves_generator_output() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            generated_dir: Some(PathBuf::from("/srv/api")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.generated_dir,
            PathBuf::from("/srv/api")
        );
        assert_eq!(
            config.generator_resolved.output_dir,
            PathBuf::from("/srv/api")
        );
    }

    #[test]
    fn test_expand_env_vars_server_fields() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDV_CONFIG_TEST_HOST", "0.0.0.0");
            std::env::set_var("MDV_CONFIG_TEST_TOKEN", "t0ken");
        }

        let toml = r#"
[server]
host = "${MDV_CONFIG_TEST_HOST}"
access_token = "${MDV_CONFIG_TEST_TOKEN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.access_token.as_deref(), Some("t0ken"));

        unsafe {
            std::env::remove_var("MDV_CONFIG_TEST_HOST");
            std::env::remove_var("MDV_CONFIG_TEST_TOKEN");
        }
    }

    #[test]
    fn test_expand_env_vars_generator_program_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDV_CONFIG_TEST_PYTHON");
        }

        let toml = r#"
[generator]
program = "${MDV_CONFIG_TEST_PYTHON:-python3.12}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.generator.program.as_deref(), Some("python3.12"));
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDV_CONFIG_TEST_MISSING");
        }

        let toml = r#"
[server]
access_token = "${MDV_CONFIG_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MDV_CONFIG_TEST_MISSING"));
        assert!(err.to_string().contains("server.access_token"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/mdv.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("mdv.toml");
        std::fs::write(&path, "[docs]\nsource_dir = \"handbook\"\n").unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(
            config.docs_resolved.source_dir,
            temp_dir.path().join("handbook")
        );
        assert_eq!(
            config.generator_resolved.project_dir,
            temp_dir.path().join(".")
        );
        assert_eq!(config.config_path, Some(path));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_base_path_without_leading_slash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.base_path = "admin".to_owned();
        assert_validation_error(&config, &["server.base_path"]);
    }

    #[test]
    fn test_validate_base_path_trailing_slash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.base_path = "/admin/".to_owned();
        assert_validation_error(&config, &["server.base_path"]);
    }

    #[test]
    fn test_validate_base_path_valid() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.base_path = "/admin".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_access_token_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.access_token = Some(String::new());
        assert_validation_error(&config, &["server.access_token", "empty"]);
    }

    #[test]
    fn test_validate_generator_program_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.generator_resolved.program = String::new();
        assert_validation_error(&config, &["generator.program", "empty"]);
    }
}
