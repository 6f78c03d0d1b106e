//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

use rstview_preview::{
    DocutilsRenderer, PrebuiltBuild, PrefixUriMapper, PreviewEngine, PreviewSettings,
};

/// Preview engine as wired by the server.
pub(crate) type ServerEngine =
    PreviewEngine<DocutilsRenderer, Option<PrebuiltBuild>, PrefixUriMapper>;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Preview engine.
    pub(crate) engine: ServerEngine,
    /// Per-request preview settings.
    pub(crate) settings: PreviewSettings,
    /// Absolute, normalized directory previews and resources are served from.
    pub(crate) root_dir: PathBuf,
    /// Absolute, normalized directories resources may be served from: the
    /// root directory, plus the build output directory when it lies outside.
    pub(crate) resource_roots: Vec<PathBuf>,
    /// Sphinx project directory attached to every request.
    pub(crate) conf_dir: Option<PathBuf>,
    /// Rewrite relative resource links in project build output.
    pub(crate) rewrite_links: bool,
}
