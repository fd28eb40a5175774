use crate::draw::model::{BrushShape, Color, Tool};
use crate::draw::save::{ExportConfig, DEFAULT_EXPORT_FILE_NAME};
use crate::draw::session::{EraserMode, LeavePolicy, SessionConfig};
use crate::draw::text::FontBook;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const MIN_CANVAS_SIZE: u32 = 1;
pub const MAX_CANVAS_SIZE: u32 = 8192;
pub const MAX_BRUSH_SIZE: u32 = 200;
pub const MIN_FONT_SIZE: f32 = 4.0;
pub const MAX_FONT_SIZE: f32 = 512.0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    /// Tool active when a session starts.
    #[serde(default)]
    pub tool: Tool,
    #[serde(default = "default_brush_size")]
    pub brush_size: u32,
    #[serde(default = "default_brush_color")]
    pub brush_color: Color,
    #[serde(default)]
    pub brush_shape: BrushShape,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Solid color exported images are flattened onto.
    #[serde(default = "default_export_background")]
    pub export_background: Color,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    #[serde(default)]
    pub eraser_mode: EraserMode,
    #[serde(default = "default_redo_enabled")]
    pub redo_enabled: bool,
    /// What happens to a gesture when the pointer leaves the canvas.
    #[serde(default)]
    pub leave_policy: LeavePolicy,
    /// JSON file backing the saved palette. If `None`, the palette is kept in
    /// memory only.
    #[serde(default)]
    pub palette_store: Option<PathBuf>,
    /// Font files keyed by the family name they provide.
    #[serde(default)]
    pub font_sources: BTreeMap<String, PathBuf>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_brush_size() -> u32 {
    5
}

fn default_brush_color() -> Color {
    Color::BLACK
}

fn default_font_family() -> String {
    "Arial".into()
}

fn default_font_size() -> f32 {
    16.0
}

fn default_export_background() -> Color {
    Color::WHITE
}

fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.into()
}

fn default_redo_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            tool: Tool::Brush,
            brush_size: default_brush_size(),
            brush_color: default_brush_color(),
            brush_shape: BrushShape::Circle,
            font_family: default_font_family(),
            font_size: default_font_size(),
            export_background: default_export_background(),
            export_file_name: default_export_file_name(),
            eraser_mode: EraserMode::Clear,
            redo_enabled: default_redo_enabled(),
            leave_policy: LeavePolicy::Cancel,
            palette_store: None,
            font_sources: BTreeMap::new(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("parse settings file {}", path.display()))?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("write settings file {}", path.display()))?;
        Ok(())
    }

    /// Copy with every size clamped into its usable range and an empty
    /// export file name replaced by the default.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.canvas_width = out.canvas_width.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE);
        out.canvas_height = out.canvas_height.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE);
        out.brush_size = out.brush_size.clamp(1, MAX_BRUSH_SIZE);
        out.font_size = if out.font_size.is_finite() {
            out.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            default_font_size()
        };
        if out.export_file_name.trim().is_empty() {
            out.export_file_name = default_export_file_name();
        }
        if out.font_family.trim().is_empty() {
            out.font_family = default_font_family();
        }
        out
    }

    pub fn session_config(&self) -> SessionConfig {
        let settings = self.sanitized();
        SessionConfig {
            width: settings.canvas_width,
            height: settings.canvas_height,
            tool: settings.tool,
            brush_shape: settings.brush_shape,
            brush_size: settings.brush_size,
            color: settings.brush_color,
            font_family: settings.font_family,
            font_size: settings.font_size,
            eraser_mode: settings.eraser_mode,
            redo_enabled: settings.redo_enabled,
            leave_policy: settings.leave_policy,
            export: ExportConfig {
                background: settings.export_background,
                file_name: settings.export_file_name,
            },
        }
    }

    /// Loads every configured font file on top of the bundled default font.
    /// Files that fail to load are logged and skipped; the configured font
    /// family becomes the fallback when it was loaded.
    pub fn font_book(&self) -> FontBook {
        let mut book = FontBook::new();
        for (family, path) in &self.font_sources {
            if let Err(err) = book.load_file(family, path) {
                tracing::warn!(family = %family, error = %format!("{err:#}"), "font not loaded");
            }
        }
        let preferred = self.font_family.trim().to_ascii_lowercase();
        if book.families().contains(&preferred) {
            book.set_fallback(&self.font_family);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = Settings::load(dir.path().join("settings.json")).expect("load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.canvas_width, 800);
        assert_eq!(settings.brush_color, Color::BLACK);
        assert_eq!(settings.export_file_name, "drawing.png");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r##"{"brush_size": 12, "brush_color": "#ff0000", "eraser_mode": "paint",
                "tool": {"kind": "shape", "shape": "ellipse"}}"##,
        )
        .expect("write");
        let settings = Settings::load(&path).expect("load");
        assert_eq!(settings.brush_size, 12);
        assert_eq!(settings.brush_color, Color::rgb(255, 0, 0));
        assert_eq!(settings.eraser_mode, EraserMode::Paint);
        assert_eq!(
            settings.tool,
            Tool::Shape(crate::draw::model::ShapeKind::Ellipse)
        );
        assert_eq!(settings.font_family, "Arial");
        assert!(settings.redo_enabled);
    }

    #[test]
    fn invalid_json_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ nope").expect("write");
        let err = Settings::load(&path).expect_err("invalid json");
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        let settings = Settings {
            leave_policy: LeavePolicy::Commit,
            export_background: Color::rgb(1, 2, 3),
            ..Settings::default()
        };
        settings.save(&path).expect("save");
        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"#010203\""));
        assert_eq!(Settings::load(&path).expect("load"), settings);
    }

    #[test]
    fn sanitized_clamps_sizes() {
        let settings = Settings {
            canvas_width: 0,
            brush_size: 0,
            font_size: f32::NAN,
            export_file_name: "  ".into(),
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.canvas_width, 1);
        assert_eq!(settings.brush_size, 1);
        assert_eq!(settings.font_size, 16.0);
        assert_eq!(settings.export_file_name, "drawing.png");

        let large = Settings {
            brush_size: 10_000,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(large.brush_size, MAX_BRUSH_SIZE);
    }

    #[test]
    fn session_config_carries_export_settings() {
        let config = Settings {
            export_background: Color::rgb(9, 9, 9),
            export_file_name: "out.png".into(),
            ..Settings::default()
        }
        .session_config();
        assert_eq!(config.export.background, Color::rgb(9, 9, 9));
        assert_eq!(config.export.file_name, "out.png");
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn unreadable_font_sources_are_skipped() {
        let mut settings = Settings::default();
        settings
            .font_sources
            .insert("Arial".into(), PathBuf::from("/definitely/missing.ttf"));
        let book = settings.font_book();
        assert!(!book.families().contains(&"arial".to_string()));
        assert!(book.font_for("Arial").is_some());
    }

    #[test]
    fn default_settings_font_book_can_draw() {
        let book = Settings::default().font_book();
        assert_eq!(
            book.families(),
            vec![crate::draw::text::DEFAULT_FONT_FAMILY.to_ascii_lowercase()]
        );
    }
}
