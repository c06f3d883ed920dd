//! `mdv serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdv_config::{CliSettings, Config};
use mdv_server::{run_server, server_config_from_mdv_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown documentation directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Generated documentation directory (overrides config).
    #[arg(short, long)]
    generated_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and generator logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            generated_dir: self.generated_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let base_path = &config.server.base_path;
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Documentation: {} (served at {base_path}/docs/)",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Generated docs: {} (served at {base_path}/docs_dev/)",
            config.docs_resolved.generated_dir.display()
        ));
        if config.server.access_token.is_some() {
            output.info("Access: bearer token required");
        }
        if !config.docs_resolved.source_dir.is_dir() {
            output.warning("Documentation directory does not exist yet");
        }

        let server_config = server_config_from_mdv_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
