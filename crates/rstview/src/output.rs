//! Styled status messages on stderr.
//!
//! stdout carries preview HTML, so every message goes to stderr.

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    plain: Style,
    warning: Style,
    error: Style,
    highlight: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            plain: Style::new(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            highlight: Style::new().cyan().bold(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(&self.plain, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.error, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.line(&self.highlight, msg);
    }

    /// Write one styled line. Terminal write failures are ignored.
    fn line(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
