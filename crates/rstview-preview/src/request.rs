//! Preview requests and per-request settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One preview compile call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewRequest {
    /// Absolute path of the source document.
    pub source_path: PathBuf,
    /// Opaque identifier of the source document (used for logging only).
    pub source_uri: String,
    /// Project configuration directory, `None` when the document has no project.
    pub conf_dir: Option<PathBuf>,
    /// Rewrite relative resource links in project build output.
    pub rewrite_links: bool,
}

impl PreviewRequest {
    /// Create a request for `source_path` without a project and with link rewriting on.
    #[must_use]
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let source_uri = format!("file://{}", source_path.display());
        Self {
            source_path,
            source_uri,
            conf_dir: None,
            rewrite_links: true,
        }
    }

    /// Set the source document identifier.
    #[must_use]
    pub fn with_source_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = uri.into();
        self
    }

    /// Set the project configuration directory.
    ///
    /// An empty path means "no project".
    #[must_use]
    pub fn with_conf_dir(mut self, conf_dir: impl Into<PathBuf>) -> Self {
        let conf_dir = conf_dir.into();
        self.conf_dir = (!conf_dir.as_os_str().is_empty()).then_some(conf_dir);
        self
    }

    /// Enable or disable link rewriting.
    #[must_use]
    pub fn with_rewrite_links(mut self, rewrite_links: bool) -> Self {
        self.rewrite_links = rewrite_links;
        self
    }
}

/// Preferred preview engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Engine {
    /// Always render the single file with docutils.
    Docutils,
    /// Use the Sphinx project build when the document belongs to a project.
    #[default]
    Sphinx,
}

impl Engine {
    /// Setting value for this engine.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docutils => "docutils",
            Self::Sphinx => "sphinx",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown engine name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown preview engine '{0}' (expected 'docutils' or 'sphinx')")]
pub struct UnknownEngine(String);

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docutils" => Ok(Self::Docutils),
            "sphinx" => Ok(Self::Sphinx),
            _ => Err(UnknownEngine(s.to_owned())),
        }
    }
}

/// Settings read once per request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewSettings {
    /// Preferred engine; [`Engine::Docutils`] forces single-file mode.
    pub engine: Engine,
    /// Docutils writer name.
    pub writer: String,
    /// Docutils writer part returned to the caller.
    pub writer_part: String,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            writer: "html".to_owned(),
            writer_part: "html_body".to_owned(),
        }
    }
}
