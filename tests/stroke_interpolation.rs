use sketchboard::draw::model::{BrushShape, Color, Point};
use sketchboard::draw::render::{interpolation_steps, stamp_segment, Stamp, StrokeRenderer};
use sketchboard::draw::{Session, SessionConfig, Surface, Tool};

#[test]
fn segment_stamp_count_follows_half_size_spacing() {
    let cases = [
        (Point::new(0.0, 0.0), Point::new(10.0, 0.0), 4, 6),
        (Point::new(0.0, 0.0), Point::new(3.0, 4.0), 5, 3),
        (Point::new(5.0, 5.0), Point::new(5.0, 5.0), 5, 1),
        (Point::new(0.0, 0.0), Point::new(0.0, 1.0), 1, 3),
    ];
    for (from, to, size, expected) in cases {
        let mut surface = Surface::new(32, 32);
        let stamp = Stamp::paint(BrushShape::Circle, Color::BLACK, size);
        assert_eq!(
            stamp_segment(&mut surface, from, to, stamp),
            expected,
            "{from:?} -> {to:?} size {size}"
        );
    }
}

#[test]
fn consecutive_stamps_never_exceed_half_size() {
    let from = Point::new(1.0, 2.0);
    let to = Point::new(57.0, 31.0);
    for size in [1, 2, 5, 9, 20] {
        let steps = interpolation_steps(from, to, size);
        let gap = from.distance(to) / steps as f32;
        assert!(gap <= size as f32 / 2.0 + 1e-4, "size {size} gap {gap}");
    }
}

#[test]
fn long_fast_stroke_leaves_no_gaps() {
    let mut session = Session::new(SessionConfig {
        width: 120,
        height: 20,
        brush_size: 4,
        ..SessionConfig::default()
    });
    session.pointer_down(5.0, 10.0);
    session.pointer_move(115.0, 10.0);
    session.pointer_up();
    for x in 5..115 {
        assert_eq!(
            session.surface().pixel(x, 10),
            Some(Color::BLACK),
            "gap at x={x}"
        );
    }
}

#[test]
fn restamping_is_idempotent() {
    let stamp = Stamp::paint(BrushShape::Triangle, Color::rgba(10, 20, 30, 128), 7);
    let mut surface = Surface::new(30, 30);
    let mut stroke = StrokeRenderer::begin(&mut surface, Point::new(10.0, 10.0), stamp);
    stroke.extend(&mut surface, Point::new(20.0, 15.0));
    let once = surface.snapshot();

    let mut again = StrokeRenderer::begin(&mut surface, Point::new(10.0, 10.0), stamp);
    again.extend(&mut surface, Point::new(20.0, 15.0));
    assert!(surface.matches(&once));
}

#[test]
fn eraser_ignores_brush_shape() {
    let mut session = Session::new(SessionConfig {
        width: 20,
        height: 20,
        brush_size: 6,
        ..SessionConfig::default()
    });
    session.select_tool(Tool::Shape(sketchboard::draw::ShapeKind::Rectangle));
    session.pointer_down(0.0, 0.0);
    session.pointer_move(20.0, 20.0);
    session.pointer_up();

    session.select_tool(Tool::Eraser);
    session.select_brush_shape(BrushShape::Circle);
    session.pointer_down(10.0, 10.0);
    session.pointer_up();

    // Square footprint: the corner pixel of the 6x6 box is cleared too.
    assert_eq!(session.surface().pixel(7, 7), Some(Color::TRANSPARENT));
    assert_eq!(session.surface().pixel(12, 12), Some(Color::TRANSPARENT));
    assert_eq!(session.surface().pixel(13, 13), Some(Color::BLACK));
}
