//! Status pages shown in place of a preview.
//!
//! All functions are pure: no I/O, no failure modes. Dynamic text is
//! HTML-escaped before it is embedded.

use std::error::Error;
use std::io;
use std::path::Path;

/// Troubleshooting guide linked from every status page.
pub const TROUBLESHOOTING_URL: &str = "https://docs.restructuredtext.net/articles/troubleshooting";

/// Possible causes listed when the generated file cannot be read.
const READ_FAILURE_CAUSES: [&str; 3] = [
    "The page has not been built yet, or it is excluded from the build.",
    "A wrong configuration is selected for this document.",
    "The output directory setting does not match where the build writes HTML.",
];

/// Escape special HTML characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Error page with a human description and detailed error text.
#[must_use]
pub fn error_page(description: &str, detail: &str) -> String {
    page(
        "Preview error",
        &format!(
            "<p>{}</p>\n<pre>{}</pre>",
            escape_html(description),
            escape_html(detail)
        ),
    )
}

/// Page shown while the build backend is still working.
#[must_use]
pub fn busy_page() -> String {
    page(
        "Preview not ready",
        "<p>The Sphinx build is still running. The preview will be available once it completes.</p>\n\
         <p>Refresh the preview in a moment.</p>",
    )
}

/// Minimal page wrapping an unexpected pipeline error.
#[must_use]
pub fn compile_error_snippet(error: &str) -> String {
    format!("<html><body>{}</body></html>", escape_html(error))
}

/// Page shown when the generated output file cannot be read.
///
/// Embeds the failed path, the likely causes, and the error name, message
/// and source chain joined by newlines.
#[must_use]
pub fn read_error_page(path: &Path, error: &io::Error) -> String {
    let causes: String = READ_FAILURE_CAUSES
        .iter()
        .map(|cause| format!("<li>{}</li>", escape_html(cause)))
        .collect();
    page(
        "Cannot read preview",
        &format!(
            "<p>Cannot read the generated file <code>{}</code>.</p>\n\
             <p>Possible causes:</p>\n<ul>{causes}</ul>\n<pre>{}</pre>",
            escape_html(&path.display().to_string()),
            escape_html(&error_detail(error)),
        ),
    )
}

/// Error name, message and source chain, one per line.
fn error_detail(error: &io::Error) -> String {
    let mut lines = vec![format!("{:?}", error.kind()), error.to_string()];
    let mut source = error.source();
    while let Some(err) = source {
        lines.push(err.to_string());
        source = err.source();
    }
    lines.join("\n")
}

/// Wrap a body fragment with a heading and the diagnostics footer.
fn page(title: &str, body: &str) -> String {
    format!(
        "<html><body>\n<h1>{title}</h1>\n{body}\n\
         <p>See the <a href=\"{TROUBLESHOOTING_URL}\">troubleshooting guide</a> for help.</p>\n\
         <p>Check the preview log output for diagnostics.</p>\n\
         </body></html>"
    )
}
