use crate::draw::surface::{Snapshot, Surface};

/// Snapshot-based undo/redo. The undo stack always holds at least the
/// initial state; its top is the state the surface was last committed or
/// restored to.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    redo_enabled: bool,
}

impl DrawHistory {
    /// Starts a history whose base entry is the current content of `surface`.
    pub fn new(surface: &Surface) -> Self {
        Self {
            undo_stack: vec![surface.snapshot()],
            redo_stack: Vec::new(),
            redo_enabled: true,
        }
    }

    /// Disables redo: undone snapshots are dropped instead of kept.
    pub fn with_redo(mut self, enabled: bool) -> Self {
        self.redo_enabled = enabled;
        self
    }

    pub fn commit(&mut self, surface: &Surface) {
        self.undo_stack.push(surface.snapshot());
        self.redo_stack.clear();
        tracing::debug!(
            undo_len = self.undo_stack.len(),
            "committed surface snapshot"
        );
    }

    /// Steps back one entry and restores `surface` from the new top. Does
    /// nothing when only the initial state remains.
    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        if self.undo_stack.len() <= 1 {
            return false;
        }
        let Some(undone) = self.undo_stack.pop() else {
            return false;
        };
        if self.redo_enabled {
            self.redo_stack.push(undone);
        }
        if let Some(top) = self.undo_stack.last() {
            surface.restore(top);
        }
        tracing::debug!(
            undo_len = self.undo_stack.len(),
            redo_len = self.redo_stack.len(),
            "undo"
        );
        true
    }

    pub fn redo(&mut self, surface: &mut Surface) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        surface.restore(&snapshot);
        self.undo_stack.push(snapshot);
        tracing::debug!(
            undo_len = self.undo_stack.len(),
            redo_len = self.redo_stack.len(),
            "redo"
        );
        true
    }

    /// Puts the last committed state back on `surface`, discarding any
    /// uncommitted drawing on top of it.
    pub fn revert(&self, surface: &mut Surface) {
        if let Some(top) = self.undo_stack.last() {
            surface.restore(top);
        }
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.undo_stack
    }

    pub fn redo_entries(&self) -> &[Snapshot] {
        &self.redo_stack
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Approximate pixel memory held by both stacks.
    pub fn memory_size(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(|s| s.pixels().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::model::Color;
    use crate::draw::surface::PixelRect;

    fn paint(surface: &mut Surface, x: i32, shade: u8) {
        surface.fill_region(PixelRect::new(x, 0, 1, 1), Color::rgb(shade, shade, shade));
    }

    #[test]
    fn starts_with_initial_state_only() {
        let surface = Surface::new(4, 4);
        let history = DrawHistory::new(&surface);
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_past_initial_state_is_a_noop() {
        let mut surface = Surface::new(4, 4);
        let mut history = DrawHistory::new(&surface);
        paint(&mut surface, 0, 9);
        // Uncommitted change: undo must not touch it.
        assert!(!history.undo(&mut surface));
        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(9, 9, 9)));
        assert!(!history.redo(&mut surface));
    }

    #[test]
    fn new_commit_clears_redo_stack() {
        let mut surface = Surface::new(4, 4);
        let mut history = DrawHistory::new(&surface);
        paint(&mut surface, 0, 1);
        history.commit(&surface);
        paint(&mut surface, 1, 2);
        history.commit(&surface);
        history.undo(&mut surface);
        history.undo(&mut surface);
        assert_eq!(history.redo_len(), 2);

        paint(&mut surface, 2, 3);
        history.commit(&surface);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn undo_redo_roundtrip_is_pixel_exact() {
        let mut surface = Surface::new(4, 4);
        let mut history = DrawHistory::new(&surface);
        let blank = surface.snapshot();

        paint(&mut surface, 0, 50);
        history.commit(&surface);
        let first = surface.snapshot();
        paint(&mut surface, 1, 100);
        history.commit(&surface);
        let second = surface.snapshot();

        assert!(history.undo(&mut surface));
        assert!(surface.matches(&first));
        assert!(history.undo(&mut surface));
        assert!(surface.matches(&blank));
        assert!(!history.undo(&mut surface));

        assert!(history.redo(&mut surface));
        assert!(surface.matches(&first));
        assert!(history.redo(&mut surface));
        assert!(surface.matches(&second));
        assert!(!history.redo(&mut surface));
    }

    #[test]
    fn redo_disabled_drops_undone_states() {
        let mut surface = Surface::new(2, 2);
        let mut history = DrawHistory::new(&surface).with_redo(false);
        paint(&mut surface, 0, 7);
        history.commit(&surface);
        assert!(history.undo(&mut surface));
        assert_eq!(history.redo_len(), 0);
        assert!(!history.redo(&mut surface));
    }

    #[test]
    fn revert_discards_uncommitted_pixels() {
        let mut surface = Surface::new(2, 2);
        let history = DrawHistory::new(&surface);
        paint(&mut surface, 1, 200);
        history.revert(&mut surface);
        assert!(surface.matches(history.current().expect("initial state")));
    }

    #[test]
    fn redo_moves_the_same_snapshot_back() {
        let mut surface = Surface::new(2, 2);
        let mut history = DrawHistory::new(&surface);
        paint(&mut surface, 0, 7);
        history.commit(&surface);
        let committed = history.current().cloned().expect("top");
        history.undo(&mut surface);
        history.redo(&mut surface);
        assert!(history
            .current()
            .expect("top")
            .shares_storage(&committed));
        assert_eq!(history.memory_size(), 2 * 2 * 2 * 4);
    }
}
