//! Chart file service
//!
//! Connects a [`ChartContext`] to the filesystem: importing charts, writing
//! exports and embedding image files into the node being edited.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::export::{self, ExportKind};
use crate::application::snapshot_codec;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{tree, ChartContext, ViewState};
use crate::infrastructure::image::load_image_data_url;
use crate::infrastructure::traits::{ChartRenderer, FileSystem};

/// Service for chart import, export and image loading.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
    renderer: Arc<dyn ChartRenderer>,
    settings: Arc<Settings>,
}

impl ChartService {
    /// Create a new chart service.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn ChartRenderer>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            fs,
            renderer,
            settings,
        }
    }

    /// Empty chart using the configured templates and image toggle.
    pub fn new_context(&self) -> ChartContext {
        ChartContext::new(
            self.settings.template.node_template(),
            ViewState::new(self.settings.show_images),
        )
    }

    /// Replace the chart in `ctx` with the one stored at `path`.
    ///
    /// Nothing in `ctx` changes unless the whole file parses and validates.
    pub fn import_file(&self, ctx: &mut ChartContext, path: &Path) -> ApplicationResult<()> {
        debug!("import_file: {}", path.display());
        let bytes = self.fs.read(path).with_path_context("read chart", path)?;
        let snapshot = snapshot_codec::decode_bytes(&path.display().to_string(), &bytes)?;
        info!(
            "imported {} nodes from {}",
            tree::node_count(&snapshot),
            path.display()
        );
        ctx.replace_snapshot(snapshot);
        Ok(())
    }

    /// Export the current chart and write it to disk.
    ///
    /// Without `target` the file lands in the configured export directory as
    /// `<base_name>.<extension>`. Returns the written path. Failing to write
    /// the file is an export failure of `kind`.
    pub fn export_file(
        &self,
        kind: ExportKind,
        ctx: &mut ChartContext,
        target: Option<&Path>,
    ) -> ApplicationResult<PathBuf> {
        let artifact = export::export(kind, ctx, self.renderer.as_ref())?;
        let path = match target {
            Some(path) => path.to_path_buf(),
            None => self
                .settings
                .export_dir
                .join(artifact.file_name(&self.settings.export.base_name)),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.fs.exists(parent) {
                self.fs.create_dir_all(parent).map_err(|e| {
                    ApplicationError::export_failure(
                        kind,
                        format!("create directory {}: {}", parent.display(), e),
                    )
                })?;
            }
        }
        self.fs.write_atomic(&path, &artifact.bytes).map_err(|e| {
            ApplicationError::export_failure(kind, format!("write {}: {}", path.display(), e))
        })?;
        info!("wrote {} export to {}", kind, path.display());
        Ok(path)
    }

    /// Embed the image at `path` into the edit buffer of the selected node.
    ///
    /// Returns `false` when nothing is selected; the file is not read then.
    pub fn attach_image(&self, ctx: &mut ChartContext, path: &Path) -> ApplicationResult<bool> {
        if ctx.session.is_idle() {
            debug!("attach_image: no node selected");
            return Ok(false);
        }
        let url = load_image_data_url(self.fs.as_ref(), path)?;
        debug!("attach_image: {} ({} chars)", path.display(), url.len());
        Ok(ctx.session.edit(|buffer| buffer.set_image_url(Some(url))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::render::TextChartRenderer;
    use crate::infrastructure::traits::RealFileSystem;
    use tempfile::TempDir;

    fn service(export_dir: &Path) -> ChartService {
        let settings = Settings {
            export_dir: export_dir.to_path_buf(),
            ..Default::default()
        };
        ChartService::new(
            Arc::new(RealFileSystem),
            Arc::new(TextChartRenderer::default()),
            Arc::new(settings),
        )
    }

    #[test]
    fn given_no_target_when_exporting_then_writes_into_export_dir() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir.path().join("out"));
        let mut ctx = svc.new_context();

        let path = svc
            .export_file(ExportKind::Structured, &mut ctx, None)
            .unwrap();

        assert_eq!(path, dir.path().join("out").join("organization-chart.json"));
        assert!(path.exists());
    }

    #[test]
    fn given_nothing_selected_when_attaching_image_then_returns_false() {
        let dir = TempDir::new().unwrap();
        let svc = service(dir.path());
        let mut ctx = svc.new_context();

        let attached = svc
            .attach_image(&mut ctx, &dir.path().join("missing.png"))
            .unwrap();

        assert!(!attached);
    }
}
