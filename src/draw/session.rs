//! The drawing session: owns the surface, the history and all tool state and
//! turns input events into surface mutations and commits.

use crate::draw::cursor::{cursor_for, CursorIcon};
use crate::draw::history::DrawHistory;
use crate::draw::import::ImageOverlay;
use crate::draw::keyboard::{map_key_event_to_command, KeyCommand, KeyEvent};
use crate::draw::model::{BrushShape, Color, Point, Tool};
use crate::draw::palette::{KeyValueStore, Palette};
use crate::draw::preview::ShapePreview;
use crate::draw::render::{Stamp, StrokeRenderer};
use crate::draw::save::{export_surface, ExportArtifact, ExportConfig};
use crate::draw::surface::Surface;
use crate::draw::text::{FontBook, GlyphRasterizer, TextEntry, TextStyle};
use anyhow::Result;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// What the eraser writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraserMode {
    /// Clears pixels to transparent.
    #[default]
    Clear,
    /// Paints the export background color.
    Paint,
}

/// How a gesture still in progress is resolved when the pointer leaves the
/// surface or a new pointer-down arrives first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeavePolicy {
    /// Drop the gesture and restore the last committed state.
    #[default]
    Cancel,
    /// Keep it, as if the pointer had been released.
    Commit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub tool: Tool,
    pub brush_shape: BrushShape,
    pub brush_size: u32,
    pub color: Color,
    pub font_family: String,
    pub font_size: f32,
    pub eraser_mode: EraserMode,
    pub redo_enabled: bool,
    pub leave_policy: LeavePolicy,
    pub export: ExportConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            tool: Tool::Brush,
            brush_shape: BrushShape::Circle,
            brush_size: 5,
            color: Color::BLACK,
            font_family: "Arial".to_string(),
            font_size: 16.0,
            eraser_mode: EraserMode::Clear,
            redo_enabled: true,
            leave_policy: LeavePolicy::Cancel,
            export: ExportConfig::default(),
        }
    }
}

enum Gesture {
    Stroke(StrokeRenderer),
    Shape(ShapePreview),
    ImageDrag,
}

pub struct Session {
    surface: Surface,
    history: DrawHistory,
    tool: Tool,
    brush_shape: BrushShape,
    brush_size: u32,
    color: Color,
    font_family: String,
    font_size: f32,
    eraser_mode: EraserMode,
    leave_policy: LeavePolicy,
    export: ExportConfig,
    gesture: Option<Gesture>,
    text: Option<TextEntry>,
    overlay: Option<ImageOverlay>,
    palette: Palette,
    rasterizer: Box<dyn GlyphRasterizer>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let surface = Surface::new(config.width, config.height);
        let history = DrawHistory::new(&surface).with_redo(config.redo_enabled);
        tracing::debug!(
            width = config.width,
            height = config.height,
            "drawing session created"
        );
        Self {
            surface,
            history,
            tool: config.tool,
            brush_shape: config.brush_shape,
            brush_size: config.brush_size.max(1),
            color: config.color,
            font_family: config.font_family,
            font_size: config.font_size,
            eraser_mode: config.eraser_mode,
            leave_policy: config.leave_policy,
            export: config.export,
            gesture: None,
            text: None,
            overlay: None,
            palette: Palette::default(),
            rasterizer: Box::new(FontBook::new()),
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Box<dyn GlyphRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &DrawHistory {
        &self.history
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn brush_shape(&self) -> BrushShape {
        self.brush_shape
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        self.text.as_ref()
    }

    pub fn image_overlay(&self) -> Option<&ImageOverlay> {
        self.overlay.as_ref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Cursor to show over the surface for the current tool and size.
    pub fn cursor(&self) -> CursorIcon {
        cursor_for(self.tool, self.brush_shape, self.brush_size)
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let point = Point::new(x, y);
        if self.gesture.is_some() {
            tracing::debug!("pointer down during active gesture");
            self.resolve_gesture(self.leave_policy);
        }

        if let Some(overlay) = self.overlay.as_mut() {
            if overlay.begin_drag(point) {
                tracing::debug!(x, y, "image drag started");
                self.gesture = Some(Gesture::ImageDrag);
                return;
            }
        }

        match self.tool {
            Tool::Brush => {
                let stamp = Stamp::paint(self.brush_shape, self.color, self.brush_size);
                let stroke = StrokeRenderer::begin(&mut self.surface, point, stamp);
                self.gesture = Some(Gesture::Stroke(stroke));
            }
            Tool::Eraser => {
                let stamp = Stamp::erase(self.eraser_fill(), self.brush_size);
                let stroke = StrokeRenderer::begin(&mut self.surface, point, stamp);
                self.gesture = Some(Gesture::Stroke(stroke));
            }
            Tool::Shape(kind) => {
                let preview = ShapePreview::begin(&mut self.surface, kind, point, self.color);
                self.gesture = Some(Gesture::Shape(preview));
            }
            Tool::Text => {
                if self.text.take().is_some() {
                    tracing::debug!("open text entry discarded by new text click");
                }
                self.text = Some(TextEntry::open(point, self.text_style()));
                return;
            }
        }
        tracing::debug!(tool = ?self.tool, x, y, "gesture started");
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let point = Point::new(x, y);
        match self.gesture.as_mut() {
            Some(Gesture::Stroke(stroke)) => {
                stroke.extend(&mut self.surface, point);
            }
            Some(Gesture::Shape(preview)) => preview.update(&mut self.surface, point),
            Some(Gesture::ImageDrag) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.drag_to(&mut self.surface, point);
                }
            }
            None => {}
        }
    }

    /// Finishes the active gesture. Returns `true` when it was committed.
    pub fn pointer_up(&mut self) -> bool {
        self.resolve_gesture(LeavePolicy::Commit)
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.resolve_gesture(self.leave_policy)
    }

    /// Handles a key press and returns the command it triggered, if any.
    pub fn key_down(&mut self, event: KeyEvent) -> Option<KeyCommand> {
        let command = map_key_event_to_command(self.text.is_some(), event)?;
        match command {
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
            KeyCommand::FinalizeText => {
                self.finalize_text();
            }
            KeyCommand::CancelText => self.cancel_text(),
        }
        Some(command)
    }

    /// Switches tool. Leaving the text tool discards any open text entry.
    pub fn select_tool(&mut self, tool: Tool) {
        if tool != Tool::Text {
            self.cancel_text();
        }
        self.tool = tool;
        tracing::debug!(?tool, "tool selected");
    }

    pub fn select_brush_shape(&mut self, shape: BrushShape) {
        self.cancel_text();
        self.brush_shape = shape;
    }

    pub fn set_size(&mut self, size: u32) {
        self.brush_size = size.max(1);
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        if let Some(entry) = self.text.as_mut() {
            entry.set_color(color);
        }
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
        if let Some(entry) = self.text.as_mut() {
            entry.set_family(family);
        }
    }

    pub fn set_font_size(&mut self, size: f32) {
        if !size.is_finite() || size <= 0.0 {
            tracing::warn!(size, "ignoring invalid font size");
            return;
        }
        self.font_size = size;
        if let Some(entry) = self.text.as_mut() {
            entry.set_size(size);
        }
    }

    /// Replaces the text of the open entry. Returns `false` when no entry is
    /// open.
    pub fn set_text(&mut self, text: &str) -> bool {
        match self.text.as_mut() {
            Some(entry) => {
                entry.set_text(text);
                true
            }
            None => false,
        }
    }

    /// Rasterizes the open text entry and commits it. Blank entries are
    /// dropped without a commit.
    pub fn finalize_text(&mut self) -> bool {
        let Some(entry) = self.text.take() else {
            return false;
        };
        if !entry.finalize(&mut self.surface, self.rasterizer.as_ref()) {
            tracing::debug!("blank text entry discarded");
            return false;
        }
        self.commit();
        true
    }

    pub fn cancel_text(&mut self) {
        if self.text.take().is_some() {
            tracing::debug!("text entry cancelled");
        }
    }

    pub fn clear(&mut self) {
        self.abandon_transient_state();
        self.surface.clear();
        self.commit();
    }

    pub fn undo(&mut self) -> bool {
        self.abandon_transient_state();
        self.history.undo(&mut self.surface)
    }

    pub fn redo(&mut self) -> bool {
        self.abandon_transient_state();
        self.history.redo(&mut self.surface)
    }

    pub fn export(&self) -> Result<ExportArtifact> {
        export_surface(&self.surface, &self.export)
    }

    /// Resizes the surface keeping content anchored top-left. An active
    /// gesture is resolved first and a live image overlay is baked.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gesture.is_some() {
            self.resolve_gesture(self.leave_policy);
        }
        self.overlay = None;
        self.surface.resize(width, height);
        tracing::debug!(width, height, "surface resized");
    }

    /// Places an imported image centred on the surface and commits it. The
    /// image stays draggable until it has been moved once.
    pub fn import_image(&mut self, image: RgbaImage) {
        if self.gesture.is_some() {
            self.resolve_gesture(self.leave_policy);
        }
        if let Some(previous) = self.overlay.take() {
            previous.remove(&mut self.surface);
        }
        let overlay = ImageOverlay::place(&mut self.surface, image);
        self.history.commit(&self.surface);
        self.overlay = Some(overlay);
    }

    /// Adds the current color to the saved palette.
    pub fn save_palette_color(&mut self, store: &mut dyn KeyValueStore) -> Result<bool> {
        self.palette.save_color(self.color, store)
    }

    pub fn load_palette(&mut self, store: &dyn KeyValueStore) -> Result<bool> {
        self.palette.load(store)
    }

    fn eraser_fill(&self) -> Color {
        match self.eraser_mode {
            EraserMode::Clear => Color::TRANSPARENT,
            EraserMode::Paint => self.export.background,
        }
    }

    fn text_style(&self) -> TextStyle {
        TextStyle {
            family: self.font_family.clone(),
            size: self.font_size,
            color: self.color,
        }
    }

    fn commit(&mut self) {
        self.history.commit(&self.surface);
        if self.overlay.take().is_some() {
            tracing::debug!("image overlay baked");
        }
    }

    fn resolve_gesture(&mut self, policy: LeavePolicy) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        match (gesture, policy) {
            (Gesture::ImageDrag, LeavePolicy::Commit) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.end_drag();
                }
                self.commit();
                tracing::debug!("image drag committed");
                true
            }
            (Gesture::ImageDrag, LeavePolicy::Cancel) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.cancel_drag(&mut self.surface);
                }
                tracing::debug!("image drag cancelled");
                false
            }
            (Gesture::Stroke(stroke), LeavePolicy::Commit) => {
                self.commit();
                tracing::debug!(stamps = stroke.stamp_count(), "stroke committed");
                true
            }
            (Gesture::Stroke(_), LeavePolicy::Cancel) => {
                self.history.revert(&mut self.surface);
                tracing::debug!("stroke cancelled");
                false
            }
            (Gesture::Shape(preview), LeavePolicy::Commit) => {
                self.commit();
                tracing::debug!(kind = ?preview.kind(), "shape committed");
                true
            }
            (Gesture::Shape(preview), LeavePolicy::Cancel) => {
                preview.cancel(&mut self.surface);
                tracing::debug!("shape cancelled");
                false
            }
        }
    }

    // Undo, redo and clear act on committed state only; whatever is in flight
    // is dropped first.
    fn abandon_transient_state(&mut self) {
        if self.gesture.is_some() {
            self.resolve_gesture(LeavePolicy::Cancel);
        }
        self.cancel_text();
        self.overlay = None;
    }
}
