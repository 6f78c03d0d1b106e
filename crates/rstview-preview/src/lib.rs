//! Preview resolution for reStructuredText documents.
//!
//! Given a source document, this crate decides how to produce its HTML
//! preview and returns either the preview content or a status page
//! explaining why no content is available.
//!
//! # Architecture
//!
//! Two backends are supported:
//! - Single file: the document is rendered on its own by a
//!   [`SingleFileRenderer`] (docutils)
//! - Project build: the document's HTML is read from the output of a
//!   [`BuildBackend`] (Sphinx), after a readiness check, and its relative
//!   resource links are rewritten through a [`SandboxUriMapper`]
//!
//! [`PreviewEngine`] ties the pieces together. Every failure below it turns
//! into a [`RenderedHtml`] status page, so callers always get HTML back.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use rstview_preview::{PrefixUriMapper, resolve_output_path, rewrite_links};
//!
//! let output = resolve_output_path(
//!     Path::new("/p/docs/guide/intro.rst"),
//!     Path::new("/p/docs"),
//!     Path::new("_build/html"),
//! );
//! assert_eq!(output, Path::new("/p/docs/_build/html/guide/intro.html"));
//!
//! let html = rewrite_links(r#"<img src="../_images/a.png">"#, &output, &PrefixUriMapper::file());
//! assert_eq!(html, r#"<img src="file:///p/docs/_build/html/_images/a.png">"#);
//! ```

mod backend;
mod docutils;
mod engine;
mod error;
mod gate;
mod loader;
mod mode;
mod output_path;
mod rendered;
mod request;
mod rewrite;
mod sandbox;
mod sphinx;
pub mod status;
mod util;

pub use backend::{
    BackendState, BuildBackend, BuildConfig, OutputReader, SandboxUriMapper, SingleFileRenderer,
};
pub use docutils::DocutilsRenderer;
pub use engine::PreviewEngine;
pub use error::{PreviewError, RendererError};
pub use gate::check_readiness;
pub use loader::{FsReader, load_document};
pub use mode::BackendMode;
pub use output_path::resolve_output_path;
pub use rendered::{HtmlKind, RenderedHtml, StatusKind};
pub use request::{Engine, PreviewRequest, PreviewSettings, UnknownEngine};
pub use rewrite::rewrite_links;
pub use sandbox::PrefixUriMapper;
pub use sphinx::{BUILD_INFO_FILE, PrebuiltBuild};
pub use util::{normalize_path, relative_path};
