//! Preview engine.
//!
//! Ties backend selection, the readiness gate, output path resolution,
//! document loading and link rewriting together. Every failure ends in a
//! status page; callers always receive renderable HTML.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::backend::{BuildBackend, OutputReader, SandboxUriMapper, SingleFileRenderer};
use crate::error::PreviewError;
use crate::gate::check_readiness;
use crate::loader::{FsReader, load_document};
use crate::mode::BackendMode;
use crate::output_path::resolve_output_path;
use crate::rendered::RenderedHtml;
use crate::request::{PreviewRequest, PreviewSettings};

/// Resolves preview HTML for source documents.
///
/// Holds no per-request state, so a single engine can serve concurrent
/// requests behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use rstview_preview::{
///     DocutilsRenderer, PrebuiltBuild, PrefixUriMapper, PreviewEngine, PreviewRequest,
///     PreviewSettings,
/// };
///
/// let engine = PreviewEngine::new(
///     DocutilsRenderer::default(),
///     PrebuiltBuild::new("/p/docs", "/p/docs/_build/html"),
///     PrefixUriMapper::file(),
/// );
/// let request = PreviewRequest::new("/p/docs/index.rst").with_conf_dir("/p/docs");
/// let html = engine.preview(&request, &PreviewSettings::default()).await;
/// ```
#[derive(Debug)]
pub struct PreviewEngine<R, B, M, F = FsReader> {
    renderer: R,
    backend: B,
    mapper: M,
    reader: F,
}

impl<R, B, M> PreviewEngine<R, B, M> {
    /// Create an engine reading generated output from the filesystem.
    #[must_use]
    pub fn new(renderer: R, backend: B, mapper: M) -> Self {
        Self {
            renderer,
            backend,
            mapper,
            reader: FsReader,
        }
    }
}

impl<R, B, M, F> PreviewEngine<R, B, M, F> {
    /// Replace the output reader.
    #[must_use]
    pub fn with_reader<G>(self, reader: G) -> PreviewEngine<R, B, M, G> {
        PreviewEngine {
            renderer: self.renderer,
            backend: self.backend,
            mapper: self.mapper,
            reader,
        }
    }

    /// Build backend used for project builds.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Sandbox URI mapper used for link rewriting.
    pub fn mapper(&self) -> &M {
        &self.mapper
    }
}

impl<R, B, M, F> PreviewEngine<R, B, M, F>
where
    R: SingleFileRenderer,
    B: BuildBackend,
    M: SandboxUriMapper,
    F: OutputReader,
{
    /// Produce preview HTML for one request.
    ///
    /// Returns genuine content or a status page, never an error.
    pub async fn preview(
        &self,
        request: &PreviewRequest,
        settings: &PreviewSettings,
    ) -> RenderedHtml {
        let mode = BackendMode::select(request, settings);
        info!(
            mode = mode.name(),
            uri = %request.source_uri,
            conf_dir = ?mode.conf_dir(),
            engine = %settings.engine,
            "Resolving preview"
        );

        let result = match &mode {
            BackendMode::SingleFile => self.render_single_file(request, settings).await,
            BackendMode::ProjectBuild { conf_dir } => {
                self.resolve_project_build(request, conf_dir).await
            }
        };

        result.unwrap_or_else(PreviewError::into_rendered)
    }

    /// Delegate to the single-file renderer; output is returned verbatim.
    async fn render_single_file(
        &self,
        request: &PreviewRequest,
        settings: &PreviewSettings,
    ) -> Result<RenderedHtml, PreviewError> {
        let html = self
            .renderer
            .render(&request.source_path, &settings.writer, &settings.writer_part)
            .await
            .inspect_err(|err| {
                warn!(source = %request.source_path.display(), error = %err, "Single-file render failed");
            })?;
        Ok(RenderedHtml::content(html))
    }

    /// Gate on backend readiness, then load the generated output.
    async fn resolve_project_build(
        &self,
        request: &PreviewRequest,
        conf_dir: &Path,
    ) -> Result<RenderedHtml, PreviewError> {
        check_readiness(self.backend.state())?;

        let build = self.backend.build_config(conf_dir).ok_or_else(|| {
            PreviewError::ConfigurationMissing {
                conf_dir: conf_dir.to_path_buf(),
            }
        })?;

        let output_path =
            resolve_output_path(&request.source_path, &build.conf_dir, &build.output_dir);
        debug!(
            source = %request.source_path.display(),
            output = %output_path.display(),
            output_dir = %build.output_dir.display(),
            "Resolved build output"
        );

        let mapper = request.rewrite_links.then_some(&self.mapper);
        Ok(load_document(&self.reader, &output_path, mapper).await)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::{BackendState, BuildConfig};
    use crate::error::RendererError;
    use crate::rendered::{HtmlKind, StatusKind};
    use crate::request::Engine;

    /// Renderer recording its arguments and returning a fixed body.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Mutex<Vec<(PathBuf, String, String)>>,
        fail: bool,
    }

    impl SingleFileRenderer for RecordingRenderer {
        async fn render(
            &self,
            source: &Path,
            writer: &str,
            writer_part: &str,
        ) -> Result<String, RendererError> {
            self.calls.lock().unwrap().push((
                source.to_path_buf(),
                writer.to_owned(),
                writer_part.to_owned(),
            ));
            if self.fail {
                return Err(RendererError::Io(io::Error::other("renderer crashed")));
            }
            Ok(r#"<p><img src="rel.png"></p>"#.to_owned())
        }
    }

    /// Backend with fixed state and configuration.
    struct FixedBackend {
        state: BackendState,
        config: Option<BuildConfig>,
    }

    impl BuildBackend for FixedBackend {
        fn state(&self) -> BackendState {
            self.state
        }

        fn build_config(&self, _conf_dir: &Path) -> Option<BuildConfig> {
            self.config.clone()
        }
    }

    struct TestMapper;

    impl SandboxUriMapper for TestMapper {
        fn to_sandbox_uri(&self, path: &Path) -> String {
            format!("sandbox:/{}", path.display())
        }
    }

    /// In-memory reader counting read attempts.
    #[derive(Default)]
    struct CountingReader {
        files: Vec<(PathBuf, String)>,
        reads: AtomicUsize,
    }

    impl CountingReader {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.push((PathBuf::from(path), content.to_owned()));
            self
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl OutputReader for CountingReader {
        async fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.files
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, content)| content.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No such file"))
        }
    }

    fn project_config() -> BuildConfig {
        BuildConfig {
            conf_dir: PathBuf::from("/p"),
            output_dir: PathBuf::from("/p/_build/html"),
        }
    }

    fn engine(
        state: BackendState,
        reader: CountingReader,
    ) -> PreviewEngine<RecordingRenderer, FixedBackend, TestMapper, CountingReader> {
        PreviewEngine::new(
            RecordingRenderer::default(),
            FixedBackend {
                state,
                config: Some(project_config()),
            },
            TestMapper,
        )
        .with_reader(reader)
    }

    fn project_request() -> PreviewRequest {
        PreviewRequest::new("/p/docs/index.rst").with_conf_dir("/p")
    }

    fn built_reader() -> CountingReader {
        CountingReader::default().with_file(
            "/p/_build/html/docs/index.html",
            r##"<img src="../_static/logo.png"><a href="#top">top</a>"##,
        )
    }

    #[tokio::test]
    async fn test_project_build_loads_and_rewrites() {
        let engine = engine(BackendState::READY, built_reader());

        let rendered = engine
            .preview(&project_request(), &PreviewSettings::default())
            .await;

        assert_eq!(rendered.kind, HtmlKind::Content);
        assert_eq!(
            rendered.html,
            r##"<img src="sandbox://p/_build/html/_static/logo.png"><a href="#top">top</a>"##
        );
        assert_eq!(engine.reader.reads(), 1);
    }

    #[tokio::test]
    async fn test_project_build_without_rewrite_returns_verbatim() {
        let engine = engine(BackendState::READY, built_reader());
        let request = project_request().with_rewrite_links(false);

        let rendered = engine.preview(&request, &PreviewSettings::default()).await;

        assert_eq!(
            rendered.html,
            r##"<img src="../_static/logo.png"><a href="#top">top</a>"##
        );
    }

    #[tokio::test]
    async fn test_busy_backend_returns_wait_page_without_reading() {
        let engine = engine(BackendState::BUSY, built_reader());

        let rendered = engine
            .preview(&project_request(), &PreviewSettings::default())
            .await;

        assert_eq!(rendered.status_kind(), Some(StatusKind::Busy));
        assert_eq!(engine.reader.reads(), 0);
    }

    #[tokio::test]
    async fn test_failed_backend_returns_error_page_without_reading() {
        let state = BackendState {
            ready: true,
            error: true,
        };
        let engine = engine(state, built_reader());

        let rendered = engine
            .preview(&project_request(), &PreviewSettings::default())
            .await;

        assert_eq!(rendered.status_kind(), Some(StatusKind::BuildError));
        assert_eq!(engine.reader.reads(), 0);
    }

    #[tokio::test]
    async fn test_missing_build_config_returns_error_page() {
        let engine = PreviewEngine::new(
            RecordingRenderer::default(),
            FixedBackend {
                state: BackendState::READY,
                config: None,
            },
            TestMapper,
        )
        .with_reader(built_reader());

        let rendered = engine
            .preview(&project_request(), &PreviewSettings::default())
            .await;

        assert_eq!(
            rendered.status_kind(),
            Some(StatusKind::ConfigurationMissing)
        );
        assert_eq!(engine.reader.reads(), 0);
    }

    #[tokio::test]
    async fn test_missing_output_returns_read_error_page() {
        let engine = engine(BackendState::READY, CountingReader::default());

        let rendered = engine
            .preview(&project_request(), &PreviewSettings::default())
            .await;

        assert_eq!(rendered.status_kind(), Some(StatusKind::ReadError));
        assert!(rendered.html.contains("/p/_build/html/docs/index.html"));
        assert_eq!(engine.reader.reads(), 1);
    }

    #[tokio::test]
    async fn test_single_file_mode_returns_renderer_output_verbatim() {
        let engine = engine(BackendState::BUSY, CountingReader::default());
        let request = PreviewRequest::new("/d/page.rst");
        let settings = PreviewSettings {
            writer: "html5".to_owned(),
            writer_part: "whole".to_owned(),
            ..PreviewSettings::default()
        };

        let rendered = engine.preview(&request, &settings).await;

        assert_eq!(rendered.kind, HtmlKind::Content);
        assert_eq!(rendered.html, r#"<p><img src="rel.png"></p>"#);
        assert_eq!(
            *engine.renderer.calls.lock().unwrap(),
            vec![(
                PathBuf::from("/d/page.rst"),
                "html5".to_owned(),
                "whole".to_owned()
            )]
        );
        assert_eq!(engine.reader.reads(), 0);
    }

    #[tokio::test]
    async fn test_docutils_override_ignores_project() {
        let engine = engine(BackendState::READY, built_reader());
        let settings = PreviewSettings {
            engine: Engine::Docutils,
            ..PreviewSettings::default()
        };

        let rendered = engine.preview(&project_request(), &settings).await;

        assert_eq!(rendered.html, r#"<p><img src="rel.png"></p>"#);
        assert_eq!(engine.renderer.calls.lock().unwrap().len(), 1);
        assert_eq!(engine.reader.reads(), 0);
    }

    #[tokio::test]
    async fn test_renderer_failure_returns_compile_error_snippet() {
        let engine = PreviewEngine::new(
            RecordingRenderer {
                fail: true,
                ..RecordingRenderer::default()
            },
            FixedBackend {
                state: BackendState::READY,
                config: None,
            },
            TestMapper,
        );

        let rendered = engine
            .preview(&PreviewRequest::new("/d/page.rst"), &PreviewSettings::default())
            .await;

        assert_eq!(rendered.status_kind(), Some(StatusKind::CompileError));
        assert!(rendered.html.contains("renderer crashed"));
    }
}
