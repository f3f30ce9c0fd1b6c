//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::ChartService;
use crate::config::Settings;
use crate::infrastructure::render::TextChartRenderer;
use crate::infrastructure::traits::{ChartRenderer, FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Terminal view of the chart
    pub text: TextChartRenderer,

    pub chart: ChartService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let renderer = Arc::new(TextChartRenderer::new(settings.export.page_lines));
        Self::with_deps(settings, Arc::new(RealFileSystem), renderer)
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// `renderer` backs picture and document exports.
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        let settings = Arc::new(settings);
        let text = TextChartRenderer::new(settings.export.page_lines);
        let chart = ChartService::new(fs, renderer, Arc::clone(&settings));

        Self {
            settings,
            text,
            chart,
        }
    }
}
