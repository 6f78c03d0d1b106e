//! Build backend for an already built Sphinx project.

use std::path::{Path, PathBuf};

use crate::backend::{BackendState, BuildBackend, BuildConfig};
use crate::util::normalize_path;

/// Marker file Sphinx writes into the HTML output after a complete build.
pub const BUILD_INFO_FILE: &str = ".buildinfo";

/// [`BuildBackend`] reading the output of an external `sphinx-build` run.
///
/// The project counts as ready once the output directory contains
/// [`BUILD_INFO_FILE`], and as busy until then. Failures of the external
/// build are not observable, so the error flag is never set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrebuiltBuild {
    config: BuildConfig,
}

impl PrebuiltBuild {
    /// Create a backend for the project at `conf_dir` built into `output_dir`.
    ///
    /// A relative `output_dir` is taken relative to `conf_dir`.
    #[must_use]
    pub fn new(conf_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let conf_dir = normalize_path(&conf_dir.into());
        let output_dir = normalize_path(&conf_dir.join(output_dir.into()));
        Self {
            config: BuildConfig {
                conf_dir,
                output_dir,
            },
        }
    }

    /// Configuration of the served project.
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }
}

impl BuildBackend for PrebuiltBuild {
    /// Single blocking `stat` of the marker file; short enough to run on the
    /// async runtime directly.
    fn state(&self) -> BackendState {
        if self.config.output_dir.join(BUILD_INFO_FILE).is_file() {
            BackendState::READY
        } else {
            BackendState::BUSY
        }
    }

    fn build_config(&self, conf_dir: &Path) -> Option<BuildConfig> {
        (normalize_path(conf_dir) == self.config.conf_dir).then(|| self.config.clone())
    }
}
