//! Tests for ChartService against the real filesystem

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use orgchart::application::services::ChartService;
use orgchart::application::{ApplicationError, ExportKind};
use orgchart::config::Settings;
use orgchart::domain::tree;
use orgchart::infrastructure::render::TextChartRenderer;
use orgchart::infrastructure::traits::RealFileSystem;
use orgchart::util::testing;

fn service(export_dir: &Path) -> ChartService {
    testing::init_test_setup();
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

/// Helper to create a file in the temp dir
fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write file");
    path
}

#[test]
fn given_new_context_then_root_uses_default_template() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());

    let ctx = svc.new_context();

    assert_eq!(ctx.snapshot().title, "Công Ty ABC");
    assert_eq!(ctx.snapshot().description.as_deref(), Some("Trụ sở chính"));
    assert!(ctx.view.show_images);
}

#[test]
fn given_exported_chart_when_imported_into_other_context_then_trees_match() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let mut source = svc.new_context();
    let root = source.root_id().clone();
    let sales = source.add_child(root.as_str()).unwrap();
    source.add_child(sales.as_str()).unwrap();

    // Act
    let path = svc
        .export_file(ExportKind::Structured, &mut source, None)
        .unwrap();
    let mut target = svc.new_context();
    svc.import_file(&mut target, &path).unwrap();

    // Assert
    assert_eq!(**target.snapshot(), **source.snapshot());
    assert_eq!(target.root_id(), &root);
}

#[test]
fn given_invalid_file_when_importing_then_context_is_unchanged() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let bad = write_file(&temp, "bad.json", br#"{"id": "r", "title": 3, "children": []}"#);
    let mut ctx = svc.new_context();
    let root = ctx.root_id().clone();
    ctx.select(root.as_str());
    let before = ctx.snapshot().clone();

    let err = svc.import_file(&mut ctx, &bad).unwrap_err();

    assert!(matches!(err, ApplicationError::ImportParse { .. }));
    assert!(ctx.is_current(&before));
    assert!(!ctx.session.is_idle());
}

#[test]
fn given_missing_file_when_importing_then_io_error_and_context_unchanged() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let mut ctx = svc.new_context();
    let before = ctx.snapshot().clone();

    let err = svc
        .import_file(&mut ctx, &temp.path().join("nope.json"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(ctx.is_current(&before));
}

#[test]
fn given_explicit_target_when_exporting_document_then_writes_paged_text() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let mut ctx = svc.new_context();
    let target = temp.path().join("nested").join("chart.txt");

    let written = svc
        .export_file(ExportKind::Document, &mut ctx, Some(&target))
        .unwrap();

    assert_eq!(written, target);
    let text = fs::read_to_string(&target).unwrap();
    assert!(text.starts_with("Công Ty ABC - page 1/1"));
}

#[test]
fn given_unwritable_target_when_exporting_then_export_failure_of_that_kind() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let mut ctx = svc.new_context();
    let blocker = write_file(&temp, "file.txt", b"not a directory");

    let err = svc
        .export_file(ExportKind::Structured, &mut ctx, Some(&blocker.join("chart.json")))
        .unwrap_err();

    match err {
        ApplicationError::ExportFailure { kind, message } => {
            assert_eq!(kind, ExportKind::Structured);
            assert!(message.contains("chart.json"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_picture_export_without_target_then_uses_renderer_extension() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let mut ctx = svc.new_context();

    let written = svc
        .export_file(ExportKind::Picture, &mut ctx, None)
        .unwrap();

    assert_eq!(written, temp.path().join("organization-chart.txt"));
}

#[test]
fn given_selected_node_when_attaching_image_then_buffer_holds_data_url() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let image = write_file(&temp, "logo.png", b"abc");
    let mut ctx = svc.new_context();
    let root = ctx.root_id().clone();
    ctx.select(root.as_str());

    assert!(svc.attach_image(&mut ctx, &image).unwrap());
    ctx.commit();

    let node = tree::find(ctx.snapshot(), root.as_str()).unwrap();
    assert_eq!(node.image_url.as_deref(), Some("data:image/png;base64,YWJj"));
}

#[test]
fn given_non_image_file_when_attaching_then_fails_and_buffer_is_kept() {
    let temp = TempDir::new().unwrap();
    let svc = service(temp.path());
    let notes = write_file(&temp, "notes.txt", b"hello");
    let mut ctx = svc.new_context();
    let root = ctx.root_id().clone();
    ctx.select(root.as_str());

    assert!(svc.attach_image(&mut ctx, &notes).is_err());
    assert_eq!(
        ctx.session.buffer().unwrap().image_url.as_deref(),
        Some("")
    );
}
