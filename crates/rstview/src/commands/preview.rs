//! `rstview preview` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use rstview_config::{CliSettings, Config};
use rstview_preview::{
    DocutilsRenderer, Engine, PrebuiltBuild, PrefixUriMapper, PreviewEngine, PreviewRequest,
};

use super::absolute;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preview command.
#[derive(Args)]
pub(crate) struct PreviewArgs {
    /// Source document to preview.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover rstview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

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

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl PreviewArgs {
    /// Execute the preview command.
    ///
    /// Status pages count as output: the command only fails when the
    /// configuration is invalid or the HTML cannot be written.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            engine: self.engine,
            conf_dir: self.conf_dir.as_deref().map(absolute).transpose()?,
            build_dir: self.build_dir.as_deref().map(absolute).transpose()?,
            rewrite_links: self.no_rewrite_links.then_some(false),
            python: self.python,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = absolute(&self.file)?;
        let request = preview_request(&config, &source);
        let rendered = build_engine(&config)
            .preview(&request, &config.preview_settings())
            .await;

        if let Some(kind) = rendered.status_kind() {
            output.warning(&format!(
                "No preview content for {} ({}), writing status page",
                source.display(),
                kind.as_str()
            ));
        }

        let html = rendered.into_html();
        match &self.output {
            Some(path) => {
                std::fs::write(path, html)?;
                output.info(&format!("Preview written to {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}

/// Engine wired with the stock collaborators and `file://` links.
fn build_engine(
    config: &Config,
) -> PreviewEngine<DocutilsRenderer, Option<PrebuiltBuild>, PrefixUriMapper> {
    let backend = config
        .sphinx_resolved
        .build_config()
        .map(|build| PrebuiltBuild::new(build.conf_dir, build.output_dir));

    PreviewEngine::new(
        DocutilsRenderer::new(&config.preview.python),
        backend,
        PrefixUriMapper::file(),
    )
}

/// Request for `source`, attached to the project when it lies inside it.
fn preview_request(config: &Config, source: &Path) -> PreviewRequest {
    let request = PreviewRequest::new(source).with_rewrite_links(config.preview.rewrite_links);
    match config
        .sphinx_resolved
        .conf_dir
        .as_ref()
        .filter(|conf_dir| source.starts_with(conf_dir))
    {
        Some(conf_dir) => request.with_conf_dir(conf_dir),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use rstview_preview::{BUILD_INFO_FILE, StatusKind};
    use tempfile::TempDir;

    use super::*;

    fn config_with_project(conf_dir: &Path) -> Config {
        let mut config = Config::default();
        config.sphinx_resolved.conf_dir = Some(conf_dir.to_path_buf());
        config
    }

    #[test]
    fn test_request_inside_project_gets_conf_dir() {
        let config = config_with_project(Path::new("/p/docs"));

        let request = preview_request(&config, Path::new("/p/docs/index.rst"));

        assert_eq!(request.conf_dir, Some(PathBuf::from("/p/docs")));
        assert!(request.rewrite_links);
    }

    #[test]
    fn test_request_outside_project_is_single_file() {
        let mut config = config_with_project(Path::new("/p/docs"));
        config.preview.rewrite_links = false;

        let request = preview_request(&config, Path::new("/p/README.rst"));

        assert_eq!(request.conf_dir, None);
        assert!(!request.rewrite_links);
    }

    #[tokio::test]
    async fn test_preview_built_project_page() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        let html = docs.join("_build/html");
        fs::create_dir_all(&html).unwrap();
        fs::write(html.join(BUILD_INFO_FILE), "").unwrap();
        fs::write(html.join("index.html"), r#"<link href="_static/a.css">"#).unwrap();
        let config = config_with_project(&docs);

        let request = preview_request(&config, &docs.join("index.rst"));
        let rendered = build_engine(&config)
            .preview(&request, &config.preview_settings())
            .await;

        assert_eq!(
            rendered.html,
            format!(
                r#"<link href="file://{}">"#,
                html.join("_static/a.css").display()
            )
        );
    }

    #[tokio::test]
    async fn test_preview_unbuilt_project_is_busy() {
        let dir = TempDir::new().unwrap();
        let config = config_with_project(dir.path());

        let request = preview_request(&config, &dir.path().join("index.rst"));
        let rendered = build_engine(&config)
            .preview(&request, &config.preview_settings())
            .await;

        assert_eq!(rendered.status_kind(), Some(StatusKind::Busy));
    }
}
