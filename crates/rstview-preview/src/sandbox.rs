//! Prefix-based sandbox URI mapping.

use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

use crate::backend::SandboxUriMapper;

/// Characters escaped in mapped paths. `/` stays literal.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// [`SandboxUriMapper`] prepending a fixed prefix to the percent-encoded path.
///
/// ```
/// use std::path::Path;
/// use rstview_preview::{PrefixUriMapper, SandboxUriMapper};
///
/// let mapper = PrefixUriMapper::new("/_resource");
/// assert_eq!(
///     mapper.to_sandbox_uri(Path::new("/docs/_static/my logo.png")),
///     "/_resource/docs/_static/my%20logo.png"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixUriMapper {
    prefix: String,
}

impl PrefixUriMapper {
    /// Create a mapper with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Mapper producing `file://` URIs.
    #[must_use]
    pub fn file() -> Self {
        Self::new("file://")
    }

    /// Prefix prepended to every path.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl SandboxUriMapper for PrefixUriMapper {
    fn to_sandbox_uri(&self, path: &Path) -> String {
        let encoded = percent_encode(path.as_os_str().as_encoded_bytes(), PATH_ENCODE_SET);
        format!("{}{encoded}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rewrite::rewrite_links;

    #[test]
    fn test_file_mapper() {
        let mapper = PrefixUriMapper::file();

        assert_eq!(
            mapper.to_sandbox_uri(Path::new("/p/_build/html/_static/a.css")),
            "file:///p/_build/html/_static/a.css"
        );
    }

    #[test]
    fn test_encodes_reserved_characters() {
        let mapper = PrefixUriMapper::new("x:");

        assert_eq!(
            mapper.to_sandbox_uri(Path::new("/a b/c#d?e%f.png")),
            "x:/a%20b/c%23d%3Fe%25f.png"
        );
    }

    #[test]
    fn test_encodes_utf8_names_per_byte() {
        let mapper = PrefixUriMapper::new("/_resource");

        assert_eq!(
            mapper.to_sandbox_uri(Path::new("/docs/café.png")),
            "/_resource/docs/caf%C3%A9.png"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_keep_raw_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mapper = PrefixUriMapper::new("/_resource");

        assert_eq!(
            mapper.to_sandbox_uri(Path::new(OsStr::from_bytes(b"/docs/caf\xe9.png"))),
            "/_resource/docs/caf%E9.png"
        );
    }

    #[test]
    fn test_rewrite_round_trips_encoded_names() {
        let html = rewrite_links(
            r#"<img src="my%20image.png">"#,
            Path::new("/site/index.html"),
            &PrefixUriMapper::file(),
        );

        assert_eq!(html, r#"<img src="file:///site/my%20image.png">"#);
    }
}
