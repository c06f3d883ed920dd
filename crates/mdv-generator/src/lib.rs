//! External documentation generator trigger for mdv.
//!
//! Runs a documentation generator (pdoc by default) as a subprocess over the
//! hosting application module plus every active extension module, writing
//! into the generated-docs root. The run always produces a
//! [`GenerateOutcome`]; failures are reported in it, never raised.
//!
//! # Example
//!
//! ```ignore
//! use mdv_config::GeneratorConfig;
//! use mdv_generator::DocGenerator;
//!
//! let generator = DocGenerator::new(GeneratorConfig::default())
//!     .with_active_modules(|| Some(vec!["Users".to_owned()]));
//! let outcome = generator.generate().await;
//! println!("{}", outcome.message);
//! ```

mod modules;

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::ExitStatus;
use std::sync::Arc;

use mdv_config::GeneratorConfig;
use tokio::process::Command;

use modules::{discover_modules, select_active};

/// Reports the names of currently active extension modules.
///
/// Returns `None` when the registry is unavailable, in which case every
/// discovered module is documented.
pub type ActiveModules = Arc<dyn Fn() -> Option<Vec<String>> + Send + Sync>;

/// Result of a generator run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOutcome {
    /// Whether the generator finished successfully.
    pub success: bool,
    /// Human-readable status including captured output.
    pub message: String,
}

impl GenerateOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Runs the external documentation generator.
#[derive(Clone)]
pub struct DocGenerator {
    config: GeneratorConfig,
    active_modules: ActiveModules,
}

impl fmt::Debug for DocGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DocGenerator {
    /// Create a generator from configuration.
    ///
    /// Active modules default to the statically configured list (if any).
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let configured = config.active_modules.clone();
        Self {
            config,
            active_modules: Arc::new(move || configured.clone()),
        }
    }

    /// Use `provider` to look up active extension modules at each run.
    #[must_use]
    pub fn with_active_modules(
        mut self,
        provider: impl Fn() -> Option<Vec<String>> + Send + Sync + 'static,
    ) -> Self {
        self.active_modules = Arc::new(provider);
        self
    }

    /// Directory the generator writes into.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Modules passed to the generator: host module first, then active extensions.
    #[must_use]
    pub fn modules(&self) -> Vec<String> {
        let discovered = discover_modules(
            &self.config.project_dir.join(&self.config.modules_dir),
            &self.config.marker_file,
        );
        let total = discovered.len();
        let active = (self.active_modules)();
        if active.is_none() {
            tracing::info!("Active modules: registry not available, documenting all modules");
        }
        let selected = select_active(discovered, active.as_deref());
        tracing::info!(active = selected.len(), total, "Selected modules to document");

        std::iter::once(self.config.host_module.clone())
            .chain(
                selected
                    .into_iter()
                    .map(|name| format!("{}{name}", self.config.module_prefix)),
            )
            .collect()
    }

    /// Build the generator command for `modules`.
    fn command(&self, modules: &[String]) -> Command {
        let config = &self.config;
        let mut command = Command::new(&config.program);
        command
            .args(&config.args)
            .arg(&config.output_flag)
            .arg(&config.output_dir)
            .args(modules)
            .current_dir(&config.project_dir);

        if let Some(var) = &config.search_path_env {
            command.env(var, search_path(&config.project_dir, std::env::var_os(var)));
        }

        command
    }

    /// Run the generator and wait for it to finish.
    pub async fn generate(&self) -> GenerateOutcome {
        let output_dir = self.output_dir();
        if !output_dir.exists() {
            if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
                return GenerateOutcome::failure(format!("Error: {e}"));
            }
            tracing::info!(dir = %output_dir.display(), "Created output directory");
        }

        let modules = self.modules();
        tracing::info!(
            program = %self.config.program,
            cwd = %self.config.project_dir.display(),
            modules = ?modules,
            "Generating documentation"
        );

        let output = match self.command(&modules).output().await {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(program = %self.config.program, "Generator not found");
                return GenerateOutcome::failure(self.config.install_hint.clone());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start generator");
                return GenerateOutcome::failure(format!("Error: {e}"));
            }
        };

        let outcome = summarize(
            output.status,
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
            output_dir,
        );
        if !outcome.success {
            tracing::warn!(status = %output.status, "Generator failed");
        }
        outcome
    }
}

/// Prepend `project_dir` to an existing search path value.
fn search_path(project_dir: &Path, existing: Option<OsString>) -> OsString {
    let mut paths = vec![project_dir.to_path_buf()];
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        paths.extend(std::env::split_paths(&existing));
    }
    std::env::join_paths(&paths).unwrap_or_else(|_| project_dir.as_os_str().to_owned())
}

/// Turn a finished run into an outcome message.
fn summarize(status: ExitStatus, stdout: &str, stderr: &str, output_dir: &Path) -> GenerateOutcome {
    let stdout = stdout.trim();
    let stderr = stderr.trim();

    if status.success() {
        let mut message = format!(
            "Documentation generated successfully in {}.",
            output_dir.display()
        );
        if !stdout.is_empty() {
            message.push('\n');
            message.push_str(stdout);
        }
        return GenerateOutcome {
            success: true,
            message,
        };
    }

    let code = status
        .code()
        .map_or_else(|| status.to_string(), |code| code.to_string());
    let mut message = format!("Error generating documentation.\nReturn code: {code}");
    if !stdout.is_empty() {
        message.push_str("\n--- STDOUT ---\n");
        message.push_str(stdout);
    }
    if !stderr.is_empty() {
        message.push_str("\n--- STDERR ---\n");
        message.push_str(stderr);
    }
    GenerateOutcome::failure(message)
}
