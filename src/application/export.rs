//! Export dispatcher: structured data, picture, document.
//!
//! Pictures and documents are produced by a [`ChartRenderer`] from a
//! snapshot plus a view state. While the renderer runs, interactive controls
//! are hidden (and, for documents, zoom and pan are reset); the previous view
//! state is restored when the [`PresentationGuard`] drops, on success and on
//! failure alike. The snapshot is only ever read.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::snapshot_codec;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ChartContext, OrgNode, ViewState};
use crate::infrastructure::traits::ChartRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Re-importable JSON
    Structured,
    /// Rasterized image of the chart
    Picture,
    /// Paginated document
    Document,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportKind::Structured => "structured",
            ExportKind::Picture => "picture",
            ExportKind::Document => "document",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "structured" | "data" => Ok(ExportKind::Structured),
            "picture" | "image" | "png" => Ok(ExportKind::Picture),
            "document" | "pdf" => Ok(ExportKind::Document),
            other => Err(format!(
                "unknown export kind '{other}' (expected json, picture or document)"
            )),
        }
    }
}

/// Rendered export output, ready to be written somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    /// File extension without the dot
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// `<base_name>.<extension>`
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.extension)
    }
}

/// Temporarily switches a view into presentation mode; restores the saved
/// state on drop.
pub struct PresentationGuard<'a> {
    view: &'a mut ViewState,
    saved: ViewState,
}

impl<'a> PresentationGuard<'a> {
    pub fn new(view: &'a mut ViewState, kind: ExportKind) -> Self {
        let saved = view.clone();
        view.controls_visible = false;
        view.pointer_up();
        if kind == ExportKind::Document {
            view.reset();
        }
        Self { view, saved }
    }

    pub fn view(&self) -> &ViewState {
        &*self.view
    }
}

impl Drop for PresentationGuard<'_> {
    fn drop(&mut self) {
        *self.view = self.saved.clone();
        debug!("presentation mode ended, view restored");
    }
}

/// Render `root` as `kind` without touching any live state.
pub fn render(
    kind: ExportKind,
    root: &OrgNode,
    view: &ViewState,
    renderer: &dyn ChartRenderer,
) -> ApplicationResult<ExportArtifact> {
    let bytes = match kind {
        ExportKind::Structured => snapshot_codec::encode(root)
            .map(String::into_bytes)
            .map_err(|e| ApplicationError::export_failure(kind, e.to_string()))?,
        ExportKind::Picture => renderer
            .rasterize(root, view)
            .map_err(|e| ApplicationError::export_failure(kind, e))?,
        ExportKind::Document => renderer
            .paginate(root, view)
            .map_err(|e| ApplicationError::export_failure(kind, e))?,
    };
    let extension = match kind {
        ExportKind::Structured => "json".to_string(),
        _ => renderer.extension(kind).to_string(),
    };
    Ok(ExportArtifact {
        kind,
        extension,
        bytes,
    })
}

/// Export the current snapshot of `ctx`.
///
/// Pictures and documents are rendered in presentation mode; the view of
/// `ctx` is back to what it was when this returns, whatever the outcome.
pub fn export(
    kind: ExportKind,
    ctx: &mut ChartContext,
    renderer: &dyn ChartRenderer,
) -> ApplicationResult<ExportArtifact> {
    let snapshot = Arc::clone(ctx.snapshot());
    let result = match kind {
        ExportKind::Structured => render(kind, &snapshot, &ctx.view, renderer),
        ExportKind::Picture | ExportKind::Document => {
            let guard = PresentationGuard::new(&mut ctx.view, kind);
            render(kind, &snapshot, guard.view(), renderer)
        }
    };
    match &result {
        Ok(artifact) => info!("exported {} ({} bytes)", kind, artifact.bytes.len()),
        Err(e) => warn!("{}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_kind_names_when_parsing_then_maps_aliases() {
        assert_eq!("json".parse::<ExportKind>(), Ok(ExportKind::Structured));
        assert_eq!("PNG".parse::<ExportKind>(), Ok(ExportKind::Picture));
        assert_eq!("pdf".parse::<ExportKind>(), Ok(ExportKind::Document));
        assert!("gif".parse::<ExportKind>().is_err());
    }

    #[test]
    fn given_document_guard_then_view_is_reset_and_restored() {
        let mut view = ViewState::default();
        view.zoom_in();
        view.set_pan(crate::domain::PanOffset::new(30.0, -4.0));
        let before = view.clone();

        {
            let guard = PresentationGuard::new(&mut view, ExportKind::Document);
            assert_eq!(guard.view().zoom_percent(), 100);
            assert!(!guard.view().controls_visible);
        }

        assert_eq!(view, before);
    }

    #[test]
    fn given_picture_guard_then_zoom_is_kept() {
        let mut view = ViewState::default();
        view.zoom_out();
        let guard = PresentationGuard::new(&mut view, ExportKind::Picture);
        assert_eq!(guard.view().zoom_percent(), 90);
    }

    #[test]
    fn given_artifact_then_file_name_uses_extension() {
        let artifact = ExportArtifact {
            kind: ExportKind::Structured,
            extension: "json".into(),
            bytes: vec![],
        };
        assert_eq!(artifact.file_name("organization-chart"), "organization-chart.json");
    }
}
