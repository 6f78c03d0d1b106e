//! HTTP preview server for rstview.
//!
//! Serves live previews of reStructuredText documents below a root
//! directory:
//! - `GET /preview/{path}`: preview HTML (content or status page) of the
//!   source document at `path`, relative to the root
//! - `GET /_resource/{path}`: files referenced by rewritten preview links
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use rstview_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root_dir: PathBuf::from("/srv/project"),
//!         conf_dir: Some(PathBuf::from("/srv/project/docs")),
//!         build_dir: Some(PathBuf::from("/srv/project/docs/_build/html")),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (rstview-server)
//!                        │
//!                        ├─► /preview ──► PreviewEngine
//!                        │                   ├─► docutils subprocess (single file)
//!                        │                   └─► Sphinx HTML output (project build)
//!                        │
//!                        └─► /_resource ──► files under the root or build output directory
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use rstview_preview::{
    DocutilsRenderer, PrebuiltBuild, PrefixUriMapper, PreviewEngine, PreviewSettings,
};
use state::AppState;

pub use error::ServerError;

/// URL prefix resources are served under.
pub const RESOURCE_PREFIX: &str = "/_resource";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory previews and resources are served from.
    pub root_dir: PathBuf,
    /// Sphinx project directory (`None` renders every document on its own).
    pub conf_dir: Option<PathBuf>,
    /// Sphinx HTML output directory (default: `<conf_dir>/_build/html`).
    pub build_dir: Option<PathBuf>,
    /// Python interpreter running docutils.
    pub python: String,
    /// Per-request preview settings.
    pub settings: PreviewSettings,
    /// Rewrite relative resource links in project build output.
    pub rewrite_links: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
            root_dir: PathBuf::from("."),
            conf_dir: None,
            build_dir: None,
            python: "python3".to_owned(),
            settings: PreviewSettings::default(),
            rewrite_links: true,
        }
    }
}

impl ServerConfig {
    /// Build the application state for this configuration.
    fn into_state(self) -> AppState {
        let backend = self.conf_dir.as_ref().map(|conf_dir| {
            let output_dir = self
                .build_dir
                .clone()
                .unwrap_or_else(|| conf_dir.join("_build/html"));
            PrebuiltBuild::new(conf_dir, output_dir)
        });
        let engine = PreviewEngine::new(
            DocutilsRenderer::new(&self.python),
            backend,
            PrefixUriMapper::new(RESOURCE_PREFIX),
        );

        let root_dir = absolute(&self.root_dir);
        let mut resource_roots = vec![root_dir.clone()];
        if let Some(backend) = engine.backend() {
            let output_dir = absolute(&backend.config().output_dir);
            if !output_dir.starts_with(&root_dir) {
                resource_roots.push(output_dir);
            }
        }

        AppState {
            engine,
            settings: self.settings,
            root_dir,
            resource_roots,
            conf_dir: self.conf_dir,
            rewrite_links: self.rewrite_links,
        }
    }
}

/// Make `path` absolute against the working directory and normalize it.
fn absolute(path: &Path) -> PathBuf {
    let path = std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path));
    rstview_preview::normalize_path(&path)
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;

    let state = Arc::new(config.into_state());
    tracing::info!(
        address = %addr,
        root = %state.root_dir.display(),
        conf_dir = ?state.conf_dir,
        engine = %state.settings.engine,
        "Starting preview server"
    );

    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from rstview config.
#[must_use]
pub fn server_config_from_config(config: &rstview_config::Config) -> ServerConfig {
    let build_config = config.sphinx_resolved.build_config();

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root_dir: config.root_dir.clone(),
        conf_dir: build_config.as_ref().map(|c| c.conf_dir.clone()),
        build_dir: build_config.map(|c| c.output_dir),
        python: config.preview.python.clone(),
        settings: config.preview_settings(),
        rewrite_links: config.preview.rewrite_links,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstview_preview::{BuildBackend, Engine};

    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7878);
        assert!(config.conf_dir.is_none());
        assert!(config.rewrite_links);
    }

    #[test]
    fn test_server_config_from_config() {
        let mut config = rstview_config::Config::default();
        config.root_dir = PathBuf::from("/srv");
        config.sphinx_resolved.conf_dir = Some(PathBuf::from("/srv/docs"));
        config.preview.engine = Engine::Docutils;

        let server_config = server_config_from_config(&config);

        assert_eq!(server_config.root_dir, PathBuf::from("/srv"));
        assert_eq!(server_config.conf_dir, Some(PathBuf::from("/srv/docs")));
        assert_eq!(
            server_config.build_dir,
            Some(PathBuf::from("/srv/docs/_build/html"))
        );
        assert_eq!(server_config.settings.engine, Engine::Docutils);
    }

    #[test]
    fn test_state_without_project_has_no_backend() {
        let state = ServerConfig::default().into_state();

        assert!(state.engine.backend().is_none());
        assert_eq!(state.engine.backend().build_config(Path::new("/srv")), None);
    }

    #[test]
    fn test_state_serves_resources_from_root_only_by_default() {
        let state = ServerConfig {
            root_dir: PathBuf::from("/srv"),
            conf_dir: Some(PathBuf::from("/srv/docs")),
            ..ServerConfig::default()
        }
        .into_state();

        assert_eq!(state.resource_roots, vec![PathBuf::from("/srv")]);
    }

    #[test]
    fn test_state_serves_resources_from_external_build_dir() {
        let state = ServerConfig {
            root_dir: PathBuf::from("/srv"),
            conf_dir: Some(PathBuf::from("/srv/docs")),
            build_dir: Some(PathBuf::from("/var/cache/site/./html")),
            ..ServerConfig::default()
        }
        .into_state();

        assert_eq!(
            state.resource_roots,
            vec![PathBuf::from("/srv"), PathBuf::from("/var/cache/site/html")]
        );
    }

    #[test]
    fn test_state_default_build_dir() {
        let state = ServerConfig {
            conf_dir: Some(PathBuf::from("/srv/docs")),
            ..ServerConfig::default()
        }
        .into_state();

        let backend = state.engine.backend().as_ref().unwrap();
        assert_eq!(
            backend.config().output_dir,
            PathBuf::from("/srv/docs/_build/html")
        );
    }
}
