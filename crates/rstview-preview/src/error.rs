//! Error types.
//!
//! None of these reach the engine's caller: [`PreviewError::into_rendered`]
//! turns every failure into its status page.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::rendered::{RenderedHtml, StatusKind};
use crate::status;

/// Error returned by a [`SingleFileRenderer`](crate::SingleFileRenderer).
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// Renderer executable could not be found.
    #[error("Renderer unavailable: {0}")]
    NotFound(#[source] io::Error),
    /// I/O error while talking to the renderer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Renderer ran but failed.
    #[error("Renderer failed with {status}: {stderr}")]
    Process {
        /// Exit status of the renderer process.
        status: ExitStatus,
        /// Captured standard error.
        stderr: String,
    },
}

/// Failure inside the preview pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The build backend knows nothing about the requested project.
    #[error("No build configuration available for {}", .conf_dir.display())]
    ConfigurationMissing {
        /// Project configuration directory from the request.
        conf_dir: PathBuf,
    },
    /// The build backend reported a build failure.
    #[error("Build backend reported an error")]
    BackendError,
    /// The build backend has not finished building.
    #[error("Build backend is not ready")]
    BackendBusy,
    /// The generated output file could not be read.
    #[error("Cannot read preview file {}: {source}", .path.display())]
    ReadFailure {
        /// Resolved output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Anything else escaping the pipeline.
    #[error("{0}")]
    Unexpected(#[from] RendererError),
}

impl PreviewError {
    /// Status page kind for this error.
    #[must_use]
    pub fn status_kind(&self) -> StatusKind {
        match self {
            Self::ConfigurationMissing { .. } => StatusKind::ConfigurationMissing,
            Self::BackendError => StatusKind::BuildError,
            Self::BackendBusy => StatusKind::Busy,
            Self::ReadFailure { .. } => StatusKind::ReadError,
            Self::Unexpected(_) => StatusKind::CompileError,
        }
    }

    /// Convert into the status page shown in place of the preview.
    #[must_use]
    pub fn into_rendered(self) -> RenderedHtml {
        let kind = self.status_kind();
        let html = match &self {
            Self::ConfigurationMissing { conf_dir } => status::error_page(
                "The Sphinx build has no configuration for this project.",
                &format!(
                    "No build configuration found for {}.\nCheck the conf_dir and build_dir settings.",
                    conf_dir.display()
                ),
            ),
            Self::BackendError => status::error_page(
                "The Sphinx build failed.",
                "The build backend reported an error. Fix the build errors and preview again.",
            ),
            Self::BackendBusy => status::busy_page(),
            Self::ReadFailure { path, source } => status::read_error_page(path, source),
            Self::Unexpected(err) => status::compile_error_snippet(&err.to_string()),
        };
        RenderedHtml::status(kind, html)
    }
}
