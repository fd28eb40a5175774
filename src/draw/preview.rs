use crate::draw::model::{Color, Point, ShapeKind};
use crate::draw::render::fill_shape;
use crate::draw::surface::{Snapshot, Surface};

/// Live preview of a drag-to-size shape.
///
/// Every update puts the pre-drag pixels back before filling the candidate
/// shape, so the surface only ever shows the latest candidate. The preview is
/// the final output: finishing the drag needs no extra render.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePreview {
    kind: ShapeKind,
    color: Color,
    start: Point,
    end: Point,
    before: Snapshot,
}

impl ShapePreview {
    pub fn begin(surface: &mut Surface, kind: ShapeKind, start: Point, color: Color) -> Self {
        let mut preview = Self {
            kind,
            color,
            start,
            end: start,
            before: surface.snapshot(),
        };
        preview.redraw(surface);
        preview
    }

    pub fn update(&mut self, surface: &mut Surface, end: Point) {
        self.end = end;
        self.redraw(surface);
    }

    /// Removes the preview, leaving the surface as it was before the drag.
    pub fn cancel(self, surface: &mut Surface) {
        surface.restore(&self.before);
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn before(&self) -> &Snapshot {
        &self.before
    }

    fn redraw(&self, surface: &mut Surface) {
        surface.restore(&self.before);
        fill_shape(surface, self.kind, self.start, self.end, self.color);
    }
}
