//! Single-file rendering through docutils.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::backend::SingleFileRenderer;
use crate::error::RendererError;

/// Python snippet rendering one file and printing the requested writer part.
///
/// Arguments: source path, writer name, writer part.
const PUBLISH_SCRIPT: &str = "\
import sys
from docutils.core import publish_parts
source, writer, part = sys.argv[1:4]
with open(source, encoding='utf-8') as handle:
    parts = publish_parts(handle.read(), source_path=source, writer_name=writer)
sys.stdout.write(parts[part])
";

/// [`SingleFileRenderer`] running docutils in a Python subprocess.
///
/// The subprocess runs in the source file's directory so relative
/// `include` directives resolve. No timeout is imposed.
#[derive(Clone, Debug)]
pub struct DocutilsRenderer {
    python: PathBuf,
}

impl DocutilsRenderer {
    /// Create a renderer using the given Python interpreter.
    #[must_use]
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Python interpreter in use.
    #[must_use]
    pub fn python(&self) -> &Path {
        &self.python
    }
}

impl Default for DocutilsRenderer {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl SingleFileRenderer for DocutilsRenderer {
    fn render(
        &self,
        source: &Path,
        writer: &str,
        writer_part: &str,
    ) -> impl Future<Output = Result<String, RendererError>> + Send {
        async move {
            let started_at = Instant::now();
            let mut command = Command::new(&self.python);
            command
                .arg("-c")
                .arg(PUBLISH_SCRIPT)
                .arg(source)
                .arg(writer)
                .arg(writer_part)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);
            if let Some(dir) = source.parent().filter(|d| !d.as_os_str().is_empty()) {
                command.current_dir(dir);
            }

            let output = command.output().await.map_err(|err| {
                warn!(
                    python = %self.python.display(),
                    error = %err,
                    "Failed to spawn docutils"
                );
                if err.kind() == ErrorKind::NotFound {
                    RendererError::NotFound(err)
                } else {
                    RendererError::Io(err)
                }
            })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                warn!(
                    source = %source.display(),
                    status = %output.status,
                    stderr = %stderr,
                    "Docutils render failed"
                );
                return Err(RendererError::Process {
                    status: output.status,
                    stderr,
                });
            }

            #[allow(clippy::cast_possible_truncation)]
            let elapsed_ms = started_at.elapsed().as_millis() as u64;
            debug!(
                source = %source.display(),
                writer,
                writer_part,
                elapsed_ms,
                "Rendered with docutils"
            );

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        }
    }
}
