use crate::draw::composite::blend_pixel;
use crate::draw::model::Color;
use image::RgbaImage;
use std::sync::Arc;

/// Integer pixel rectangle. May extend past the surface; every surface
/// operation clips it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.x as i64 && y >= self.y as i64 && x < self.right() && y < self.bottom()
    }

    /// Exclusive right edge. Computed in `i64` so rects near the `i32` limits
    /// cannot overflow.
    pub fn right(self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn union(self, other: PixelRect) -> PixelRect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        PixelRect::new(
            min_x,
            min_y,
            saturate_i32(max_x - min_x as i64),
            saturate_i32(max_y - min_y as i64),
        )
    }

    pub fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 as i64 || y1 <= y0 as i64 {
            return None;
        }
        Some(PixelRect::new(
            x0,
            y0,
            saturate_i32(x1 - x0 as i64),
            saturate_i32(y1 - y0 as i64),
        ))
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<PixelRect> {
        self.intersect(PixelRect::new(
            0,
            0,
            saturate_i32(width as i64),
            saturate_i32(height as i64),
        ))
    }
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Immutable copy of a rectangular block of surface pixels. Cloning shares
/// the pixel storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = pixel_index(self.width, x, y);
        Some(Color::rgba(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ))
    }

    pub fn shares_storage(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// The RGBA8 drawing buffer. Starts fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; buffer_len(width, height)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some(Color::from_rgba_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Writes one pixel, silently ignoring coordinates outside the surface.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_rgba_array());
        true
    }

    /// Source-over blends `color` onto one pixel; clipped like `put_pixel`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        let bottom = Color::from_rgba_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]);
        let out = blend_pixel(bottom, color);
        self.pixels[idx..idx + 4].copy_from_slice(&out.to_rgba_array());
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            pixels: Arc::from(self.pixels.as_slice()),
        }
    }

    /// Copies the clipped `region` out of the surface.
    pub fn get_pixels(&self, region: PixelRect) -> Snapshot {
        let Some(region) = region.clamp(self.width, self.height) else {
            return Snapshot {
                width: 0,
                height: 0,
                pixels: Arc::from(Vec::<u8>::new()),
            };
        };
        let row_bytes = region.width as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * region.height as usize);
        for y in region.y..region.y + region.height {
            let start = self.index(region.x as u32, y as u32);
            pixels.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        Snapshot {
            width: region.width as u32,
            height: region.height as u32,
            pixels: Arc::from(pixels),
        }
    }

    /// Writes `snapshot` with its top-left corner at `offset`, clipping
    /// whatever falls outside the surface.
    pub fn set_pixels(&mut self, snapshot: &Snapshot, offset: (i32, i32)) {
        let target = PixelRect::new(
            offset.0,
            offset.1,
            snapshot.width as i32,
            snapshot.height as i32,
        );
        let Some(visible) = target.clamp(self.width, self.height) else {
            return;
        };
        let row_bytes = visible.width as usize * 4;
        for y in visible.y..visible.y + visible.height {
            let src_x = (visible.x - offset.0) as u32;
            let src_y = (y - offset.1) as u32;
            let src = pixel_index(snapshot.width, src_x, src_y);
            let dst = self.index(visible.x as u32, y as u32);
            self.pixels[dst..dst + row_bytes].copy_from_slice(&snapshot.pixels[src..src + row_bytes]);
        }
    }

    /// Replaces the whole surface with `snapshot`. A snapshot taken at another
    /// size is anchored at the top-left corner over a cleared surface.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.width == self.width && snapshot.height == self.height {
            self.pixels.copy_from_slice(&snapshot.pixels);
            return;
        }
        self.pixels.fill(0);
        self.set_pixels(snapshot, (0, 0));
    }

    /// True when the surface holds exactly the pixels of `snapshot`.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        snapshot.width == self.width
            && snapshot.height == self.height
            && *snapshot.pixels == *self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn clear_region(&mut self, rect: PixelRect) {
        self.fill_region(rect, Color::TRANSPARENT);
    }

    pub fn fill_region(&mut self, rect: PixelRect, color: Color) {
        let Some(rect) = rect.clamp(self.width, self.height) else {
            return;
        };
        let rgba = color.to_rgba_array();
        for y in rect.y..rect.y + rect.height {
            let start = self.index(rect.x as u32, y as u32);
            let end = start + rect.width as usize * 4;
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Draws `image` scaled into `rect` (nearest neighbour) with source-over
    /// blending.
    pub fn composite_image(&mut self, image: &RgbaImage, rect: PixelRect) {
        if rect.is_empty() || image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(visible) = rect.clamp(self.width, self.height) else {
            return;
        };
        let sx = image.width() as f32 / rect.width as f32;
        let sy = image.height() as f32 / rect.height as f32;
        for y in visible.y..visible.y + visible.height {
            let src_y = (((y as i64 - rect.y as i64) as f32 + 0.5) * sy) as u32;
            let src_y = src_y.min(image.height() - 1);
            for x in visible.x..visible.x + visible.width {
                let src_x = (((x as i64 - rect.x as i64) as f32 + 0.5) * sx) as u32;
                let src_x = src_x.min(image.width() - 1);
                let top = Color::from_rgba_array(image.get_pixel(src_x, src_y).0);
                self.blend_pixel(x, y, top);
            }
        }
    }

    /// Changes the surface size, keeping existing pixels anchored at the
    /// top-left corner. Nothing is rescaled.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let saved = self.snapshot();
        self.width = width;
        self.height = height;
        self.pixels = vec![0; buffer_len(width, height)];
        self.set_pixels(&saved, (0, 0));
    }

    fn index(&self, x: u32, y: u32) -> usize {
        pixel_index(self.width, x, y)
    }
}

/// Byte offset of pixel `(x, y)` in a row-major RGBA8 buffer `width` pixels wide.
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

fn buffer_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}
