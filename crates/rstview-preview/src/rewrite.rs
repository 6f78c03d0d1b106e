//! Resource link rewriting.
//!
//! Generated HTML references images, stylesheets and scripts relative to
//! its own location. The preview surface cannot load raw filesystem paths,
//! so every relative `src`/`href` value is resolved to an absolute path and
//! mapped through a [`SandboxUriMapper`].

use std::path::Path;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

use crate::backend::SandboxUriMapper;
use crate::util::normalize_path;

/// `src=` / `href=` attributes with a double- or single-quoted value.
///
/// Groups 1-3 hold prefix, value and closing quote for double quotes,
/// groups 4-6 the same for single quotes.
static LINK_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)((?:src|href)=")([^"]*)(")|((?:src|href)=')([^']*)(')"#).unwrap()
});

/// Rewrite relative `src`/`href` values in `html` to sandbox URIs.
///
/// Values starting with `#`, `http://` or `https://` are left alone. Query
/// strings and fragments are dropped from rewritten values. Everything
/// outside rewritten values is copied verbatim; a document without any
/// relative reference comes back byte-identical.
///
/// # Arguments
///
/// * `html` - HTML text to rewrite
/// * `document_path` - Absolute path of the file `html` was read from
/// * `mapper` - Sandbox URI mapper of the preview surface
pub fn rewrite_links<M>(html: &str, document_path: &Path, mapper: &M) -> String
where
    M: SandboxUriMapper + ?Sized,
{
    let base_dir = document_path.parent().unwrap_or(Path::new(""));
    let mut rewritten = 0usize;

    let result = LINK_ATTR_RE.replace_all(html, |caps: &Captures| {
        let (prefix, value, suffix) = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(prefix), Some(value), Some(suffix)) => {
                (prefix.as_str(), value.as_str(), suffix.as_str())
            }
            _ => (&caps[4], &caps[5], &caps[6]),
        };

        if is_external_or_anchor(value) {
            return caps[0].to_owned();
        }

        let target = strip_query_and_fragment(value);
        let target = percent_decode_str(target).decode_utf8_lossy();
        let resolved = normalize_path(&base_dir.join(&*target));
        rewritten += 1;

        format!("{prefix}{}{suffix}", mapper.to_sandbox_uri(&resolved))
    });

    tracing::debug!(
        document = %document_path.display(),
        rewritten,
        "Rewrote preview links"
    );

    result.into_owned()
}

/// Same-page anchors and absolute web URLs are never rewritten.
fn is_external_or_anchor(value: &str) -> bool {
    value.starts_with('#')
        || starts_with_ignore_ascii_case(value, "http://")
        || starts_with_ignore_ascii_case(value, "https://")
}

fn starts_with_ignore_ascii_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Path part of a reference, without `?query` or `#fragment`.
fn strip_query_and_fragment(value: &str) -> &str {
    value.split(['?', '#']).next().unwrap_or(value)
}
