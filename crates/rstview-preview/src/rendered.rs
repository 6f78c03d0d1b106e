//! Engine output.

/// Which status page was produced instead of genuine content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// The build backend has no configuration for the project.
    ConfigurationMissing,
    /// The build backend reported a build failure.
    BuildError,
    /// The build backend is still working.
    Busy,
    /// The generated output file could not be read.
    ReadError,
    /// The preview pipeline failed unexpectedly (e.g., renderer crash).
    CompileError,
}

impl StatusKind {
    /// Short machine-readable name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "configuration-missing",
            Self::BuildError => "build-error",
            Self::Busy => "busy",
            Self::ReadError => "read-error",
            Self::CompileError => "compile-error",
        }
    }
}

/// Kind of HTML returned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HtmlKind {
    /// Compiled document content, optionally link-rewritten.
    Content,
    /// Synthetic status page.
    Status(StatusKind),
}

/// HTML returned for one preview request.
///
/// Either genuine content or exactly one status page, never a mix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedHtml {
    /// HTML text.
    pub html: String,
    /// What the HTML represents.
    pub kind: HtmlKind,
}

impl RenderedHtml {
    /// Wrap compiled document content.
    #[must_use]
    pub fn content(html: String) -> Self {
        Self {
            html,
            kind: HtmlKind::Content,
        }
    }

    /// Wrap a status page.
    #[must_use]
    pub fn status(kind: StatusKind, html: String) -> Self {
        Self {
            html,
            kind: HtmlKind::Status(kind),
        }
    }

    /// Status page kind, if this is not genuine content.
    #[must_use]
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self.kind {
            HtmlKind::Content => None,
            HtmlKind::Status(kind) => Some(kind),
        }
    }

    /// Consume and return the HTML text.
    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }
}
