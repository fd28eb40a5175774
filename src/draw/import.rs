use crate::draw::model::Point;
use crate::draw::surface::{PixelRect, Snapshot, Surface};
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Imported images are shrunk to fit inside this share of the surface.
pub const IMPORT_FIT_RATIO: f32 = 0.8;

/// Size of an imported image after fitting it inside
/// `IMPORT_FIT_RATIO` of the surface. Aspect ratio is kept and images are
/// never enlarged.
pub fn fit_within(image: (u32, u32), surface: (u32, u32)) -> (u32, u32) {
    let (w, h) = (image.0 as f32, image.1 as f32);
    let max_w = surface.0 as f32 * IMPORT_FIT_RATIO;
    let max_h = surface.1 as f32 * IMPORT_FIT_RATIO;
    if w <= max_w && h <= max_h {
        return image;
    }
    let ratio = (max_w / w).min(max_h / h);
    (
        ((w * ratio).round() as u32).max(1),
        ((h * ratio).round() as u32).max(1),
    )
}

/// An imported image drawn over a saved background. Until it has been
/// dragged once it can be picked up and moved; each move restores the
/// background and redraws the image at the new spot.
#[derive(Debug, Clone)]
pub struct ImageOverlay {
    image: RgbaImage,
    origin: Point,
    background: Snapshot,
    drag: Option<Drag>,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    offset: Point,
    from: Point,
}

impl ImageOverlay {
    /// Scales `image` to fit, centres it and draws it onto `surface`.
    pub fn place(surface: &mut Surface, image: RgbaImage) -> Self {
        let (width, height) = fit_within(image.dimensions(), (surface.width(), surface.height()));
        let image = if (width, height) == image.dimensions() {
            image
        } else {
            imageops::resize(&image, width, height, FilterType::Triangle)
        };
        let origin = Point::new(
            (surface.width() as f32 - width as f32) / 2.0,
            (surface.height() as f32 - height as f32) / 2.0,
        );
        let overlay = Self {
            image,
            origin,
            background: surface.snapshot(),
            drag: None,
            moved: false,
        };
        overlay.draw(surface);
        tracing::debug!(width, height, x = origin.x, y = origin.y, "image placed");
        overlay
    }

    /// Removes the image, putting the background back.
    pub fn remove(self, surface: &mut Surface) {
        surface.restore(&self.background);
    }

    pub fn contains(&self, point: Point) -> bool {
        let (w, h) = self.image.dimensions();
        point.x >= self.origin.x
            && point.x <= self.origin.x + w as f32
            && point.y >= self.origin.y
            && point.y <= self.origin.y + h as f32
    }

    /// Picks the image up when `point` is on it and it has not been moved yet.
    pub fn begin_drag(&mut self, point: Point) -> bool {
        if self.moved || !self.contains(point) {
            return false;
        }
        self.drag = Some(Drag {
            offset: Point::new(point.x - self.origin.x, point.y - self.origin.y),
            from: self.origin,
        });
        true
    }

    pub fn drag_to(&mut self, surface: &mut Surface, point: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        self.origin = Point::new(point.x - drag.offset.x, point.y - drag.offset.y);
        self.redraw(surface);
        true
    }

    /// Abandons a drag, moving the image back to where it was picked up. The
    /// image stays movable.
    pub fn cancel_drag(&mut self, surface: &mut Surface) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.origin = drag.from;
        self.redraw(surface);
        true
    }

    /// Drops the image. Returns `true` when a drag was in progress; the image
    /// can no longer be moved afterwards.
    pub fn end_drag(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.moved = true;
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn rect(&self) -> PixelRect {
        let (w, h) = self.image.dimensions();
        PixelRect::new(
            self.origin.x.round() as i32,
            self.origin.y.round() as i32,
            w as i32,
            h as i32,
        )
    }

    fn redraw(&self, surface: &mut Surface) {
        surface.restore(&self.background);
        self.draw(surface);
    }

    fn draw(&self, surface: &mut Surface) {
        surface.composite_image(&self.image, self.rect());
    }
}
