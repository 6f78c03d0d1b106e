//! `rstview serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use rstview_config::{CliSettings, Config};
use rstview_preview::Engine;
use rstview_server::{run_server, server_config_from_config};

use super::absolute;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover rstview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Preview engine: sphinx or docutils (overrides config).
    #[arg(long)]
    engine: Option<Engine>,

    /// Sphinx project directory containing conf.py (overrides config).
    #[arg(long)]
    conf_dir: Option<PathBuf>,

    /// Sphinx HTML output directory (overrides config).
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Python interpreter running docutils (overrides config).
    #[arg(long, env = "RSTVIEW_PYTHON")]
    python: Option<String>,

    /// Keep resource links as generated by the build.
    #[arg(long)]
    no_rewrite_links: bool,

    /// Enable verbose output (request and build diagnostics).
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
            engine: self.engine,
            conf_dir: self.conf_dir.as_deref().map(absolute).transpose()?,
            build_dir: self.build_dir.as_deref().map(absolute).transpose()?,
            host: self.host,
            port: self.port,
            rewrite_links: self.no_rewrite_links.then_some(false),
            python: self.python,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.highlight(&format!(
            "Serving previews on http://{}:{}/preview/",
            config.server.host, config.server.port
        ));
        output.info(&format!("Root directory: {}", config.root_dir.display()));
        output.info(&format!("Engine: {}", config.preview.engine));

        match config.sphinx_resolved.build_config() {
            Some(build) => {
                output.info(&format!("Sphinx project: {}", build.conf_dir.display()));
                output.info(&format!("Sphinx output: {}", build.output_dir.display()));
            }
            None => output.info("Sphinx project: none (single-file rendering)"),
        }

        if !config.preview.rewrite_links {
            output.warning("Link rewriting disabled: project images and styles may not load");
        }

        let server_config = server_config_from_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
