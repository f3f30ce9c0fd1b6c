//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgchart/orgchart.toml`
//! 3. Explicit config file (`--config`)
//!
//! There is no environment variable layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::node::{
    NodeTemplate, DEFAULT_CHILD_DESCRIPTION, DEFAULT_CHILD_TITLE, DEFAULT_ROOT_DESCRIPTION,
    DEFAULT_ROOT_TITLE,
};
use crate::infrastructure::render::DEFAULT_PAGE_LINES;

/// Placeholder content for new charts and new nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateConfig {
    pub root_title: String,
    pub root_description: String,
    pub child_title: String,
    pub child_description: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            root_title: DEFAULT_ROOT_TITLE.into(),
            root_description: DEFAULT_ROOT_DESCRIPTION.into(),
            child_title: DEFAULT_CHILD_TITLE.into(),
            child_description: DEFAULT_CHILD_DESCRIPTION.into(),
        }
    }
}

impl TemplateConfig {
    pub fn node_template(&self) -> NodeTemplate {
        NodeTemplate {
            root_title: self.root_title.clone(),
            root_description: self.root_description.clone(),
            child_title: self.child_title.clone(),
            child_description: self.child_description.clone(),
        }
    }
}

/// Export file naming and document layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// File name without extension
    pub base_name: String,
    /// Lines per page for document exports
    pub page_lines: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_name: "organization-chart".into(),
            page_lines: DEFAULT_PAGE_LINES,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub export_dir: Option<PathBuf>,
    pub show_images: Option<bool>,
    pub template: RawTemplateConfig,
    pub export: RawExportConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTemplateConfig {
    pub root_title: Option<String>,
    pub root_description: Option<String>,
    pub child_title: Option<String>,
    pub child_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExportConfig {
    pub base_name: Option<String>,
    pub page_lines: Option<usize>,
}

/// Unified configuration for orgchart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory for exports without an explicit path (default: cwd)
    pub export_dir: PathBuf,
    /// Initial state of the show-images toggle
    pub show_images: bool,
    pub template: TemplateConfig,
    pub export: ExportConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            show_images: true,
            template: TemplateConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Get the XDG config directory for orgchart.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgchart").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgchart.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .build()
        .map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
    config.try_deserialize().map_err(config_err)
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let t = &overlay.template;
        let e = &overlay.export;
        Self {
            export_dir: overlay
                .export_dir
                .clone()
                .unwrap_or_else(|| self.export_dir.clone()),
            show_images: overlay.show_images.unwrap_or(self.show_images),
            template: TemplateConfig {
                root_title: t
                    .root_title
                    .clone()
                    .unwrap_or_else(|| self.template.root_title.clone()),
                root_description: t
                    .root_description
                    .clone()
                    .unwrap_or_else(|| self.template.root_description.clone()),
                child_title: t
                    .child_title
                    .clone()
                    .unwrap_or_else(|| self.template.child_title.clone()),
                child_description: t
                    .child_description
                    .clone()
                    .unwrap_or_else(|| self.template.child_description.clone()),
            },
            export: ExportConfig {
                base_name: e
                    .base_name
                    .clone()
                    .unwrap_or_else(|| self.export.base_name.clone()),
                page_lines: e.page_lines.unwrap_or(self.export.page_lines),
            },
        }
    }

    /// Expand `~` in path-like fields.
    fn expand_paths(&mut self) {
        let raw = self.export_dir.to_string_lossy().to_string();
        self.export_dir = PathBuf::from(shellexpand::tilde(&raw).into_owned());
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must
    ///   exist when given
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.export.page_lines == 0 {
            return Err(ApplicationError::Config {
                message: "export.page_lines must be at least 1".into(),
            });
        }
        if self.export.base_name.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "export.base_name must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgchart configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/orgchart/orgchart.toml
#   Explicit: orgchart --config <file>

# Directory for exports written without an explicit path
# export_dir = "~/Documents/charts"

# Show node images when the chart opens
# show_images = true

[template]
# root_title = "Công Ty ABC"
# root_description = "Trụ sở chính"
# child_title = "Node mới"
# child_description = "Mô tả node"

[export]
# base_name = "organization-chart"
# page_lines = 60
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_then_template_matches_domain_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.template.node_template(), NodeTemplate::default());
        assert_eq!(settings.export.base_name, "organization-chart");
        assert!(settings.show_images);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_are_kept() {
        let base = Settings::default();
        let overlay = RawSettings {
            show_images: Some(false),
            template: RawTemplateConfig {
                child_title: Some("New unit".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert!(!merged.show_images);
        assert_eq!(merged.template.child_title, "New unit");
        assert_eq!(merged.template.root_title, DEFAULT_ROOT_TITLE);
        assert_eq!(merged.export, ExportConfig::default());
    }

    #[test]
    fn given_tilde_in_export_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            export_dir: PathBuf::from("~/charts"),
            ..Default::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.export_dir.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("parse template");
        assert!(raw.export_dir.is_none());
    }

    #[test]
    fn given_settings_when_rendered_as_toml_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
