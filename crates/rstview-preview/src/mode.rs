//! Backend selection.

use std::path::{Path, PathBuf};

use crate::request::{Engine, PreviewRequest, PreviewSettings};

/// How a preview request is served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendMode {
    /// Render the document on its own with the single-file renderer.
    SingleFile,
    /// Read the output of the project build rooted at `conf_dir`.
    ProjectBuild {
        /// Project configuration directory.
        conf_dir: PathBuf,
    },
}

impl BackendMode {
    /// Choose the backend for `request`.
    ///
    /// Single-file mode is used when the document has no project or the
    /// settings force docutils; otherwise the project build is used.
    #[must_use]
    pub fn select(request: &PreviewRequest, settings: &PreviewSettings) -> Self {
        match &request.conf_dir {
            Some(conf_dir) if settings.engine != Engine::Docutils => Self::ProjectBuild {
                conf_dir: conf_dir.clone(),
            },
            _ => Self::SingleFile,
        }
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SingleFile => "single-file",
            Self::ProjectBuild { .. } => "project-build",
        }
    }

    /// Project configuration directory in project-build mode.
    #[must_use]
    pub fn conf_dir(&self) -> Option<&Path> {
        match self {
            Self::SingleFile => None,
            Self::ProjectBuild { conf_dir } => Some(conf_dir),
        }
    }
}
