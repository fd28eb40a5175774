use sketchboard::draw::model::{Color, Point, ShapeKind, Tool};
use sketchboard::draw::render::{Stamp, StrokeRenderer};
use sketchboard::draw::{DrawHistory, Session, SessionConfig, Surface};

fn session(width: u32, height: u32) -> Session {
    Session::new(SessionConfig {
        width,
        height,
        ..SessionConfig::default()
    })
}

#[test]
fn fresh_session_click_undo_redo() {
    let mut session = Session::default();
    assert_eq!(session.history().undo_len(), 1);

    session.pointer_down(10.0, 10.0);
    session.pointer_up();
    assert_eq!(session.history().undo_len(), 2);
    let drawn = session.surface().snapshot();

    session.undo();
    assert!(session.surface().pixels().iter().all(|b| *b == 0));
    assert_eq!(session.history().redo_len(), 1);

    session.redo();
    assert!(session.surface().matches(&drawn));
    assert_eq!(session.history().redo_len(), 0);
}

#[test]
fn commit_after_undo_discards_redo() {
    let mut surface = Surface::new(20, 20);
    let mut history = DrawHistory::new(&surface);
    let stamp = Stamp::paint(Default::default(), Color::BLACK, 3);

    StrokeRenderer::begin(&mut surface, Point::new(2.0, 2.0), stamp);
    history.commit(&surface);
    let a = surface.snapshot();

    StrokeRenderer::begin(&mut surface, Point::new(10.0, 10.0), stamp);
    history.commit(&surface);

    history.undo(&mut surface);
    StrokeRenderer::begin(&mut surface, Point::new(17.0, 3.0), stamp);
    history.commit(&surface);
    let c = surface.snapshot();

    assert_eq!(history.redo_len(), 0);
    assert_eq!(history.undo_len(), 3);
    assert_eq!(history.entries()[1], a);
    assert_eq!(history.entries()[2], c);
    assert!(history.entries()[0].pixels().iter().all(|b| *b == 0));
}

#[test]
fn any_undo_redo_sequence_matches_top_snapshot() {
    let mut session = session(40, 40);
    session.select_tool(Tool::Shape(ShapeKind::Ellipse));
    for i in 0..4 {
        let offset = 5.0 + i as f32 * 8.0;
        session.pointer_down(offset, offset);
        session.pointer_move(offset + 3.0, offset + 2.0);
        session.pointer_up();
    }

    let ops = [true, true, false, true, true, true, true, false, false, true, false];
    for undo in ops {
        if undo {
            session.undo();
        } else {
            session.redo();
        }
        let top = session.history().current().expect("history never empty");
        assert!(session.surface().matches(top));
        assert!(session.history().undo_len() >= 1);
    }
}

#[test]
fn undo_on_initial_state_is_noop() {
    let mut session = session(8, 8);
    assert!(!session.undo());
    assert_eq!(session.history().undo_len(), 1);
    assert!(!session.redo());
}

#[test]
fn snapshots_are_shared_between_stacks() {
    let mut session = session(8, 8);
    session.pointer_down(3.0, 3.0);
    session.pointer_up();
    let committed = session.history().current().expect("top").clone();
    session.undo();
    let parked = &session.history().redo_entries()[0];
    assert!(parked.shares_storage(&committed));
}

#[test]
fn undo_drops_uncommitted_stroke() {
    let mut session = session(30, 30);
    session.pointer_down(5.0, 5.0);
    session.pointer_up();
    let after_first = session.surface().snapshot();

    session.pointer_down(20.0, 20.0);
    session.pointer_move(25.0, 25.0);
    session.undo();
    assert!(!session.is_gesture_active());
    assert!(session.surface().pixels().iter().all(|b| *b == 0));
    session.redo();
    assert!(session.surface().matches(&after_first));
}
