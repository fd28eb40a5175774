//! Rasterization of freehand strokes and filled shapes.
//!
//! A pixel is covered by a footprint or shape when its centre lies inside the
//! geometry. A footprint or shape that covers no pixel centre at all writes
//! the pixel under its anchor point, so tiny brushes and zero-size shapes
//! still leave a mark.

use crate::draw::model::{BrushShape, Color, Point, ShapeKind};
use crate::draw::surface::Surface;

/// What one footprint application writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StampKind {
    Paint { shape: BrushShape, color: Color },
    /// Eraser footprint: always a square, written with `fill`.
    Erase { fill: Color },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub kind: StampKind,
    /// Footprint diameter in pixels.
    pub size: u32,
}

impl Stamp {
    pub fn paint(shape: BrushShape, color: Color, size: u32) -> Self {
        Self {
            kind: StampKind::Paint { shape, color },
            size: size.max(1),
        }
    }

    pub fn erase(fill: Color, size: u32) -> Self {
        Self {
            kind: StampKind::Erase { fill },
            size: size.max(1),
        }
    }

    /// Largest distance between consecutive interpolated stamps.
    pub fn spacing(self) -> f32 {
        self.size.max(1) as f32 / 2.0
    }
}

/// Number of interpolation steps between two samples:
/// `ceil(distance / (size / 2))`.
pub fn interpolation_steps(from: Point, to: Point, size: u32) -> u32 {
    let distance = from.distance(to);
    if distance <= f32::EPSILON {
        return 0;
    }
    (distance / (size.max(1) as f32 / 2.0)).ceil() as u32
}

/// Stamps `stamp` at `steps + 1` evenly spaced points from `from` to `to`,
/// both ends included. Returns the number of stamps applied.
pub fn stamp_segment(surface: &mut Surface, from: Point, to: Point, stamp: Stamp) -> usize {
    let steps = interpolation_steps(from, to, stamp.size);
    if steps == 0 {
        stamp_footprint(surface, from, stamp);
        return 1;
    }
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        stamp_footprint(surface, from.lerp(to, t), stamp);
    }
    steps as usize + 1
}

/// Applies a single footprint centred at `center`. Returns the number of
/// pixels written.
pub fn stamp_footprint(surface: &mut Surface, center: Point, stamp: Stamp) -> u64 {
    let size = stamp.size.max(1) as f32;
    let half = size / 2.0;
    let min = Point::new(center.x - half, center.y - half);
    let max = Point::new(center.x + half, center.y + half);

    match stamp.kind {
        StampKind::Paint { shape, color } => match shape {
            BrushShape::Circle => {
                let r_sq = half * half;
                fill_where(surface, min, max, center, color, |x, y| {
                    let dx = x - center.x;
                    let dy = y - center.y;
                    dx * dx + dy * dy <= r_sq
                })
            }
            BrushShape::Square => fill_square(surface, min, size, center, color),
            BrushShape::Triangle => {
                let apex = Point::new(center.x, min.y);
                let right = Point::new(max.x, max.y);
                let left = Point::new(min.x, max.y);
                fill_where(surface, min, max, center, color, |x, y| {
                    inside_triangle(Point::new(x, y), apex, right, left)
                })
            }
        },
        StampKind::Erase { fill } => fill_square(surface, min, size, center, fill),
    }
}

/// An in-progress freehand stroke: remembers the previous sample so each new
/// one is joined with interpolated stamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeRenderer {
    stamp: Stamp,
    last: Point,
    stamps: usize,
}

impl StrokeRenderer {
    /// Starts a stroke by stamping the first sample.
    pub fn begin(surface: &mut Surface, point: Point, stamp: Stamp) -> Self {
        stamp_footprint(surface, point, stamp);
        Self {
            stamp,
            last: point,
            stamps: 1,
        }
    }

    pub fn extend(&mut self, surface: &mut Surface, point: Point) -> usize {
        let applied = stamp_segment(surface, self.last, point, self.stamp);
        self.last = point;
        self.stamps += applied;
        applied
    }

    pub fn stamp(&self) -> Stamp {
        self.stamp
    }

    pub fn last_point(&self) -> Point {
        self.last
    }

    pub fn stamp_count(&self) -> usize {
        self.stamps
    }
}

/// Fills the drag-to-size shape described by `start` and `end`.
///
/// * rectangle: `start` and `end` are opposite corners
/// * ellipse: centred on `start`, radii `|end - start|` per axis
/// * triangle: vertices `start`, `end` and `(start.x, end.y)`
pub fn fill_shape(
    surface: &mut Surface,
    kind: ShapeKind,
    start: Point,
    end: Point,
    color: Color,
) -> u64 {
    match kind {
        ShapeKind::Rectangle => {
            let min = Point::new(start.x.min(end.x), start.y.min(end.y));
            let max = Point::new(start.x.max(end.x), start.y.max(end.y));
            fill_where(surface, min, max, start, color, |x, y| {
                x >= min.x && x <= max.x && y >= min.y && y <= max.y
            })
        }
        ShapeKind::Ellipse => {
            let rx = (end.x - start.x).abs();
            let ry = (end.y - start.y).abs();
            let min = Point::new(start.x - rx, start.y - ry);
            let max = Point::new(start.x + rx, start.y + ry);
            fill_where(surface, min, max, start, color, |x, y| {
                if rx <= f32::EPSILON || ry <= f32::EPSILON {
                    return false;
                }
                let nx = (x - start.x) / rx;
                let ny = (y - start.y) / ry;
                nx * nx + ny * ny <= 1.0
            })
        }
        ShapeKind::Triangle => {
            let corner = Point::new(start.x, end.y);
            let min = Point::new(start.x.min(end.x), start.y.min(end.y));
            let max = Point::new(start.x.max(end.x), start.y.max(end.y));
            fill_where(surface, min, max, start, color, |x, y| {
                inside_triangle(Point::new(x, y), start, end, corner)
            })
        }
    }
}

fn fill_square(surface: &mut Surface, min: Point, size: f32, anchor: Point, color: Color) -> u64 {
    let max = Point::new(min.x + size, min.y + size);
    fill_where(surface, min, max, anchor, color, |x, y| {
        x >= min.x && x < max.x && y >= min.y && y < max.y
    })
}

/// Writes `color` to every surface pixel in the `min..=max` box whose centre
/// satisfies `covers`. When no pixel centre is covered the pixel under
/// `anchor` is written instead.
fn fill_where<F>(
    surface: &mut Surface,
    min: Point,
    max: Point,
    anchor: Point,
    color: Color,
    covers: F,
) -> u64
where
    F: Fn(f32, f32) -> bool,
{
    let width = surface.width() as i64;
    let height = surface.height() as i64;
    let x0 = (min.x.floor() as i64).max(0);
    let y0 = (min.y.floor() as i64).max(0);
    let x1 = (max.x.ceil() as i64).min(width - 1);
    let y1 = (max.y.ceil() as i64).min(height - 1);

    let mut writes = 0u64;
    for y in y0..=y1 {
        let cy = y as f32 + 0.5;
        for x in x0..=x1 {
            let cx = x as f32 + 0.5;
            if covers(cx, cy) && surface.put_pixel(x as i32, y as i32, color) {
                writes += 1;
            }
        }
    }

    if writes == 0 && anchor.x.is_finite() && anchor.y.is_finite() {
        let ax = anchor.x.floor() as i32;
        let ay = anchor.y.floor() as i32;
        if surface.put_pixel(ax, ay, color) {
            writes += 1;
        }
    }
    writes
}

/// Cross product of `b - a` and `p - a`.
fn edge(p: Point, a: Point, b: Point) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

/// Inclusive point-in-triangle test, independent of winding order.
fn inside_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = edge(p, a, b);
    let d2 = edge(p, b, c);
    let d3 = edge(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
