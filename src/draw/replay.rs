//! Scripted input: a JSON list of events applied to a [`Session`] in order.

use crate::draw::keyboard::{KeyCode, KeyEvent, KeyModifiers};
use crate::draw::model::{BrushShape, Color, Tool};
use crate::draw::palette::KeyValueStore;
use crate::draw::session::Session;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    Key {
        key: KeyCode,
        #[serde(default)]
        modifiers: KeyModifiers,
    },
    SelectTool { tool: Tool },
    SelectBrushShape { shape: BrushShape },
    SetSize { size: u32 },
    SetColor { color: Color },
    SetFontFamily { family: String },
    SetFontSize { size: f32 },
    SetText { text: String },
    Clear,
    Undo,
    Redo,
    Resize { width: u32, height: u32 },
    /// Image file to import, relative to the script's folder.
    ImportImage { path: PathBuf },
    SavePaletteColor,
    LoadPalette,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read script {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parse script {}", path.display()))
    }
}

/// Applies script events to a session, resolving relative paths against
/// `base_dir` and persisting palette changes through `store`.
pub struct Replayer<'a> {
    base_dir: PathBuf,
    store: &'a mut dyn KeyValueStore,
}

impl<'a> Replayer<'a> {
    pub fn new(base_dir: impl Into<PathBuf>, store: &'a mut dyn KeyValueStore) -> Self {
        Self {
            base_dir: base_dir.into(),
            store,
        }
    }

    pub fn run(&mut self, session: &mut Session, script: &Script) -> Result<()> {
        for (index, event) in script.events.iter().enumerate() {
            self.apply(session, event)
                .with_context(|| format!("script event {index}"))?;
        }
        tracing::info!(events = script.events.len(), "script replayed");
        Ok(())
    }

    pub fn apply(&mut self, session: &mut Session, event: &ScriptEvent) -> Result<()> {
        match event {
            ScriptEvent::PointerDown { x, y } => session.pointer_down(*x, *y),
            ScriptEvent::PointerMove { x, y } => session.pointer_move(*x, *y),
            ScriptEvent::PointerUp => {
                session.pointer_up();
            }
            ScriptEvent::PointerLeave => {
                session.pointer_leave();
            }
            ScriptEvent::Key { key, modifiers } => {
                session.key_down(KeyEvent {
                    key: *key,
                    modifiers: *modifiers,
                });
            }
            ScriptEvent::SelectTool { tool } => session.select_tool(*tool),
            ScriptEvent::SelectBrushShape { shape } => session.select_brush_shape(*shape),
            ScriptEvent::SetSize { size } => session.set_size(*size),
            ScriptEvent::SetColor { color } => session.set_color(*color),
            ScriptEvent::SetFontFamily { family } => session.set_font_family(family),
            ScriptEvent::SetFontSize { size } => session.set_font_size(*size),
            ScriptEvent::SetText { text } => {
                session.set_text(text);
            }
            ScriptEvent::Clear => session.clear(),
            ScriptEvent::Undo => {
                session.undo();
            }
            ScriptEvent::Redo => {
                session.redo();
            }
            ScriptEvent::Resize { width, height } => session.resize(*width, *height),
            ScriptEvent::ImportImage { path } => {
                let path = self.base_dir.join(path);
                let image = image::open(&path)
                    .with_context(|| format!("decode image {}", path.display()))?
                    .to_rgba8();
                session.import_image(image);
            }
            ScriptEvent::SavePaletteColor => {
                session.save_palette_color(&mut *self.store)?;
            }
            ScriptEvent::LoadPalette => {
                session.load_palette(&*self.store)?;
            }
        }
        Ok(())
    }
}
