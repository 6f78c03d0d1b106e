//! CLI command implementations.

pub(crate) mod preview;
pub(crate) mod serve;

pub(crate) use preview::PreviewArgs;
pub(crate) use serve::ServeArgs;

use std::path::{Path, PathBuf};

/// Make a command-line path absolute against the current directory.
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    let path = std::env::current_dir()?.join(path);
    Ok(rstview_preview::normalize_path(&path))
}
