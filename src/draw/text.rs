//! Pending text entries and their rasterization into the surface.

use crate::draw::model::{Color, Point};
use crate::draw::surface::Surface;
use ab_glyph::{point as glyph_point, Font, FontArc, GlyphId, ScaleFont};
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Baseline spacing as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Family name of the font compiled into the crate.
pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans";

static DEFAULT_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size: f32,
    pub color: Color,
}

/// Draws glyphs onto the surface. Implemented by [`FontBook`]; tests and
/// embedders can substitute their own.
pub trait GlyphRasterizer {
    /// Draws one line of text whose baseline starts at `origin`. Returns the
    /// number of pixels touched.
    fn draw_line(&self, surface: &mut Surface, line: &str, origin: Point, style: &TextStyle)
        -> u64;
}

/// One laid-out line: its text and the left end of its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine<'a> {
    pub text: &'a str,
    pub origin: Point,
}

/// Text being edited at an anchor point. Style changes made while the entry
/// is open apply to the whole block when it is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    anchor: Point,
    style: TextStyle,
    buffer: String,
}

impl TextEntry {
    pub fn open(anchor: Point, style: TextStyle) -> Self {
        Self {
            anchor,
            style,
            buffer: String::new(),
        }
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
    }

    pub fn set_family(&mut self, family: &str) {
        self.style.family = family.to_string();
    }

    pub fn set_size(&mut self, size: f32) {
        self.style.size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Splits the buffer on line breaks and places each line left-aligned at
    /// the anchor, baseline `anchor.y + (index + 1) * size * LINE_HEIGHT`.
    pub fn layout(&self) -> Vec<TextLine<'_>> {
        let line_height = self.style.size * LINE_HEIGHT;
        self.buffer
            .split('\n')
            .enumerate()
            .map(|(index, line)| TextLine {
                text: line.strip_suffix('\r').unwrap_or(line),
                origin: Point::new(
                    self.anchor.x,
                    self.anchor.y + (index + 1) as f32 * line_height,
                ),
            })
            .collect()
    }

    /// Rasterizes the entry. Blank entries leave the surface untouched and
    /// return `false`.
    pub fn finalize(self, surface: &mut Surface, rasterizer: &dyn GlyphRasterizer) -> bool {
        if self.is_blank() {
            return false;
        }
        let mut touched = 0u64;
        for line in self.layout() {
            if line.text.is_empty() {
                continue;
            }
            touched += rasterizer.draw_line(surface, line.text, line.origin, &self.style);
        }
        tracing::debug!(
            lines = self.buffer.split('\n').count(),
            touched,
            "text entry rasterized"
        );
        true
    }
}

/// Fonts keyed by family name (case-insensitive) with an optional fallback
/// family used when a requested family is not registered.
///
/// [`FontBook::new`] starts with the bundled [`DEFAULT_FONT_FAMILY`] as the
/// fallback, so text always renders. [`FontBook::empty`] has no fonts at all.
#[derive(Clone)]
pub struct FontBook {
    fonts: HashMap<String, FontArc>,
    fallback: Option<String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    pub fn new() -> Self {
        let mut book = Self::empty();
        match FontArc::try_from_slice(DEFAULT_FONT) {
            Ok(font) => {
                let key = family_key(DEFAULT_FONT_FAMILY);
                book.fonts.insert(key.clone(), font);
                book.fallback = Some(key);
            }
            Err(err) => tracing::error!(error = %err, "bundled font could not be parsed"),
        }
        book
    }

    pub fn empty() -> Self {
        Self {
            fonts: HashMap::new(),
            fallback: None,
        }
    }

    /// Registers font data for `family`. In an empty book the first
    /// registered family becomes the fallback.
    pub fn insert_font(&mut self, family: &str, bytes: Vec<u8>) -> Result<()> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|err| anyhow!("parse font data for family '{family}': {err}"))?;
        let key = family_key(family);
        if self.fallback.is_none() {
            self.fallback = Some(key.clone());
        }
        self.fonts.insert(key, font);
        Ok(())
    }

    pub fn load_file(&mut self, family: &str, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file {}", path.display()))?;
        self.insert_font(family, bytes)
            .with_context(|| format!("load font file {}", path.display()))?;
        tracing::info!(family, path = %path.display(), "font registered");
        Ok(())
    }

    pub fn set_fallback(&mut self, family: &str) {
        self.fallback = Some(family_key(family));
    }

    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self.fonts.keys().cloned().collect();
        families.sort();
        families
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn font_for(&self, family: &str) -> Option<&FontArc> {
        self.fonts.get(&family_key(family)).or_else(|| {
            self.fallback
                .as_ref()
                .and_then(|fallback| self.fonts.get(fallback))
        })
    }
}

impl GlyphRasterizer for FontBook {
    fn draw_line(
        &self,
        surface: &mut Surface,
        line: &str,
        origin: Point,
        style: &TextStyle,
    ) -> u64 {
        let Some(font) = self.font_for(&style.family) else {
            tracing::warn!(family = %style.family, "no font available; text not drawn");
            return 0;
        };
        if line.is_empty() || style.size <= 0.0 {
            return 0;
        }

        let scaled = font.as_scaled(style.size);
        let mut caret_x = origin.x;
        let mut previous: Option<GlyphId> = None;
        let mut touched = 0u64;

        for ch in line.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                caret_x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(style.size, glyph_point(caret_x, origin.y));
            caret_x += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let alpha = (style.color.a as f32 * coverage).round().clamp(0.0, 255.0) as u8;
                if alpha == 0 {
                    return;
                }
                let px = bounds.min.x as i32 + x as i32;
                let py = bounds.min.y as i32 + y as i32;
                let color = Color::rgba(style.color.r, style.color.g, style.color.b, alpha);
                if surface.blend_pixel(px, py, color) {
                    touched += 1;
                }
            });
        }
        touched
    }
}

fn family_key(family: &str) -> String {
    family.trim().to_ascii_lowercase()
}
