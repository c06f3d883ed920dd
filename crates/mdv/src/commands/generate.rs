//! `mdv generate` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdv_config::{CliSettings, Config};
use mdv_generator::DocGenerator;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Path to configuration file (default: auto-discover mdv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write generated documentation to (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output (generator progress logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the generator run fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            generated_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let generator = DocGenerator::new(config.generator_resolved);
        output.info(&format!(
            "Generating documentation into {}",
            generator.output_dir().display()
        ));

        let outcome = generator.generate().await;
        output.outcome(outcome.success, &outcome.message);
        if outcome.success {
            Ok(())
        } else {
            Err(CliError::Generation)
        }
    }
}
