//! Output path resolution for project builds.
//!
//! Sphinx mirrors the source tree under its output directory. The output
//! directory may sit inside the project, next to it, or anywhere else on
//! disk, so both the source directory and the output directory are first
//! made relative to the same anchor (`conf_dir`) and then recombined.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::util::{normalize_path, relative_path};

/// Compute the generated HTML path for `source_path`.
///
/// No existence check is performed; the result is validated when the file
/// is read.
///
/// # Arguments
///
/// * `source_path` - Absolute path of the source document
/// * `conf_dir` - Project root containing the build configuration
/// * `output_dir` - Directory the build writes HTML into
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use rstview_preview::resolve_output_path;
///
/// let path = resolve_output_path(
///     Path::new("/p/docs/guide/intro.rst"),
///     Path::new("/p/docs"),
///     Path::new("/p/docs/_build/html"),
/// );
/// assert_eq!(path, PathBuf::from("/p/docs/_build/html/guide/intro.html"));
/// ```
#[must_use]
pub fn resolve_output_path(source_path: &Path, conf_dir: &Path, output_dir: &Path) -> PathBuf {
    let html_path = source_path.with_file_name(html_file_name(source_path));
    let file_name = html_path.file_name().unwrap_or_default();
    let source_dir = html_path.parent().unwrap_or(Path::new(""));

    let source_relative = relative_path(conf_dir, source_dir);
    let output_relative = relative_path(conf_dir, output_dir);

    normalize_path(
        &conf_dir
            .join(output_relative)
            .join(source_relative)
            .join(file_name),
    )
}

/// Replace the file name's extension with `html`.
///
/// Truncates after the last `.` of the file name and appends `html`. A
/// name without any `.` is used whole as the stem. Non-UTF-8 names are kept
/// byte for byte.
fn html_file_name(source_path: &Path) -> OsString {
    let name = Path::new(source_path.file_name().unwrap_or_default());
    let last_dot = name.as_os_str().as_encoded_bytes().iter().rposition(|&b| b == b'.');
    match last_dot {
        // Dotfile: the whole name is the extension.
        Some(0) => OsString::from(".html"),
        Some(_) => name.with_extension("html").into_os_string(),
        None => {
            let mut html = name.as_os_str().to_os_string();
            html.push(".html");
            html
        }
    }
}
