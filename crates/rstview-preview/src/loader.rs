//! Generated document loading.

use std::future::Future;
use std::io;
use std::path::Path;

use crate::backend::{OutputReader, SandboxUriMapper};
use crate::error::PreviewError;
use crate::rendered::RenderedHtml;
use crate::rewrite::rewrite_links;

/// [`OutputReader`] backed by the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsReader;

impl OutputReader for FsReader {
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send {
        tokio::fs::read_to_string(path)
    }
}

/// Load a generated document, rewriting its links when a mapper is given.
///
/// Never fails: a read error turns into the read-error status page. Exactly
/// one read attempt is made.
pub async fn load_document<F, M>(reader: &F, path: &Path, mapper: Option<&M>) -> RenderedHtml
where
    F: OutputReader + ?Sized,
    M: SandboxUriMapper + ?Sized,
{
    match read_document(reader, path, mapper).await {
        Ok(html) => RenderedHtml::content(html),
        Err(err) => err.into_rendered(),
    }
}

async fn read_document<F, M>(
    reader: &F,
    path: &Path,
    mapper: Option<&M>,
) -> Result<String, PreviewError>
where
    F: OutputReader + ?Sized,
    M: SandboxUriMapper + ?Sized,
{
    let html = reader.read_to_string(path).await.map_err(|source| {
        tracing::warn!(path = %path.display(), error = %source, "Cannot read preview file");
        PreviewError::ReadFailure {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(match mapper {
        Some(mapper) => rewrite_links(&html, path, mapper),
        None => html,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rendered::{HtmlKind, StatusKind};

    struct PrefixMapper;

    impl SandboxUriMapper for PrefixMapper {
        fn to_sandbox_uri(&self, path: &Path) -> String {
            format!("sandbox:{}", path.display())
        }
    }

    #[tokio::test]
    async fn test_load_existing_document_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, r#"<img src="a.png">"#).unwrap();

        let rendered = load_document(&FsReader, &path, None::<&PrefixMapper>).await;

        assert_eq!(rendered.kind, HtmlKind::Content);
        assert_eq!(rendered.html, r#"<img src="a.png">"#);
    }

    #[tokio::test]
    async fn test_load_existing_document_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, r#"<img src="a.png">"#).unwrap();

        let rendered = load_document(&FsReader, &path, Some(&PrefixMapper)).await;

        let expected = format!(
            r#"<img src="sandbox:{}">"#,
            dir.path().join("a.png").display()
        );
        assert_eq!(rendered.html, expected);
    }

    #[tokio::test]
    async fn test_missing_document_returns_read_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.html");

        let rendered = load_document(&FsReader, &path, Some(&PrefixMapper)).await;

        assert_eq!(rendered.status_kind(), Some(StatusKind::ReadError));
        assert!(rendered.html.contains(&path.display().to_string()));
        assert!(rendered.html.contains("has not been built yet"));
        assert!(rendered.html.contains("wrong configuration"));
        assert!(rendered.html.contains("output directory setting"));
        assert!(rendered.html.contains("NotFound"));
    }
}
