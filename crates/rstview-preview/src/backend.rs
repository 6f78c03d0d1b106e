//! Collaborator ports.
//!
//! The engine never renders markup or drives a build itself. It talks to
//! four injected collaborators:
//!
//! - [`SingleFileRenderer`]: turns one source file into HTML on demand
//! - [`BuildBackend`]: reports project build state and output location
//! - [`SandboxUriMapper`]: maps absolute paths to preview-surface URIs
//! - [`OutputReader`]: reads generated output files

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RendererError;

/// Readiness of the project build backend.
///
/// Polled on every project-build request, never cached by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackendState {
    /// The backend finished building and its output can be trusted.
    pub ready: bool,
    /// The last build failed.
    pub error: bool,
}

impl BackendState {
    /// Backend finished building without errors.
    pub const READY: Self = Self {
        ready: true,
        error: false,
    };

    /// Backend is still working.
    pub const BUSY: Self = Self {
        ready: false,
        error: false,
    };

    /// Backend reported a build failure.
    pub const FAILED: Self = Self {
        ready: false,
        error: true,
    };
}

/// Build configuration as reported by the build backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Project root containing the build configuration (`conf.py`).
    pub conf_dir: PathBuf,
    /// Directory the backend writes HTML into. May live outside `conf_dir`.
    pub output_dir: PathBuf,
}

/// Renderer producing HTML from a single source document.
pub trait SingleFileRenderer: Send + Sync {
    /// Render `source` with the given writer and return the selected writer part.
    ///
    /// # Arguments
    ///
    /// * `source` - Absolute path of the source document
    /// * `writer` - Writer name (e.g., `"html"`)
    /// * `writer_part` - Part of the writer output to return (e.g., `"html_body"`)
    fn render(
        &self,
        source: &Path,
        writer: &str,
        writer_part: &str,
    ) -> impl Future<Output = Result<String, RendererError>> + Send;
}

/// Project build backend state query.
pub trait BuildBackend: Send + Sync {
    /// Current backend state.
    ///
    /// Called synchronously from the async preview pipeline, so it must not
    /// do more than a cheap, non-waiting check.
    fn state(&self) -> BackendState;

    /// Build configuration for the project rooted at `conf_dir`.
    ///
    /// Returns `None` when the backend has no configuration for that project
    /// (yet). Absence is a normal state, not an error of the backend.
    fn build_config(&self, conf_dir: &Path) -> Option<BuildConfig>;
}

/// No build backend at all.
///
/// `None` reports ready and never has a configuration, so project requests
/// end on the configuration-missing page.
impl<B: BuildBackend> BuildBackend for Option<B> {
    fn state(&self) -> BackendState {
        self.as_ref().map_or(BackendState::READY, BuildBackend::state)
    }

    fn build_config(&self, conf_dir: &Path) -> Option<BuildConfig> {
        self.as_ref()?.build_config(conf_dir)
    }
}

/// Maps absolute filesystem paths to URIs the preview surface may load.
pub trait SandboxUriMapper: Send + Sync {
    /// Sandbox URI for `path`.
    fn to_sandbox_uri(&self, path: &Path) -> String;
}

/// Reads generated output files.
pub trait OutputReader: Send + Sync {
    /// Read the whole file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_state_default_is_busy() {
        assert_eq!(BackendState::default(), BackendState::BUSY);
    }

    #[test]
    fn test_backend_state_constants() {
        assert!(BackendState::READY.ready);
        assert!(!BackendState::READY.error);
        assert!(!BackendState::FAILED.ready);
        assert!(BackendState::FAILED.error);
    }

    #[test]
    fn test_missing_backend_has_no_configuration() {
        let backend: Option<Fixed> = None;

        assert_eq!(backend.state(), BackendState::READY);
        assert_eq!(backend.build_config(Path::new("/p")), None);
    }

    #[test]
    fn test_present_backend_is_delegated_to() {
        let backend = Some(Fixed);

        assert_eq!(backend.state(), BackendState::FAILED);
        assert_eq!(
            backend.build_config(Path::new("/p")).map(|c| c.output_dir),
            Some(PathBuf::from("/p/out"))
        );
    }

    struct Fixed;

    impl BuildBackend for Fixed {
        fn state(&self) -> BackendState {
            BackendState::FAILED
        }

        fn build_config(&self, conf_dir: &Path) -> Option<BuildConfig> {
            Some(BuildConfig {
                conf_dir: conf_dir.to_path_buf(),
                output_dir: conf_dir.join("out"),
            })
        }
    }
}
