/// The guess tray and its drag-and-drop editor.
///
/// Editor states:
///   Idle ──begin_move(i)──▶ Dragging(i)
///   Dragging(i) ──complete_move(j)──▶ Idle   (tray reordered)
///   Dragging(i) ──cancel_move()────▶ Idle   (tray untouched)
///
/// A move is remove-then-insert, not a swap: the lifted icon is taken out,
/// and re-inserted at the target index of the shortened sequence, so every
/// icon in between shifts by one slot.

use crate::domain::catalog::Icon;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuessTray {
    icons: Vec<Icon>,
    drag: DragState,
}

impl GuessTray {
    pub fn new(icons: Vec<Icon>) -> Self {
        GuessTray { icons, drag: DragState::Idle }
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Index of the slot currently lifted, if any.
    pub fn dragging(&self) -> Option<usize> {
        match self.drag {
            DragState::Dragging(i) => Some(i),
            DragState::Idle => None,
        }
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.icons.len()
    }

    /// Pick up the icon at `source`. A second pick-up replaces the first.
    pub fn begin_move(&mut self, source: usize) {
        debug_assert!(self.is_valid_index(source), "begin_move({source}) out of range");
        self.drag = DragState::Dragging(source);
    }

    /// Drop the lifted icon at `target`. Returns the `(source, target)` pair
    /// that was applied, or `None` when nothing was being dragged.
    pub fn complete_move(&mut self, target: usize) -> Option<(usize, usize)> {
        let source = self.dragging()?;
        self.drag = DragState::Idle;
        debug_assert!(self.is_valid_index(target), "complete_move({target}) out of range");
        let icon = self.icons.remove(source);
        self.icons.insert(target, icon);
        Some((source, target))
    }

    /// Abort the drag. Returns the slot that had been lifted.
    pub fn cancel_move(&mut self) -> Option<usize> {
        let source = self.dragging();
        self.drag = DragState::Idle;
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tray(icons: &[Icon]) -> GuessTray {
        GuessTray::new(icons.to_vec())
    }

    fn multiset(icons: &[Icon]) -> Vec<Icon> {
        let mut v = icons.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn move_forward_shifts_between() {
        let mut t = tray(&["A", "B", "C", "D"]);
        t.begin_move(0);
        assert_eq!(t.complete_move(2), Some((0, 2)));
        assert_eq!(t.icons(), &["B", "C", "A", "D"]);
        assert_eq!(t.drag, DragState::Idle);
    }

    #[test]
    fn move_backward_shifts_between() {
        let mut t = tray(&["A", "B", "C", "D"]);
        t.begin_move(3);
        t.complete_move(1);
        assert_eq!(t.icons(), &["A", "D", "B", "C"]);
    }

    #[test]
    fn move_to_same_slot_is_identity() {
        let mut t = tray(&["A", "B", "C"]);
        t.begin_move(1);
        t.complete_move(1);
        assert_eq!(t.icons(), &["A", "B", "C"]);
    }

    #[test]
    fn move_to_last_slot() {
        let mut t = tray(&["A", "B", "C", "D"]);
        t.begin_move(0);
        t.complete_move(3);
        assert_eq!(t.icons(), &["B", "C", "D", "A"]);
    }

    #[test]
    fn complete_without_begin_is_noop() {
        let mut t = tray(&["A", "B", "C"]);
        assert_eq!(t.complete_move(2), None);
        assert_eq!(t.icons(), &["A", "B", "C"]);
    }

    #[test]
    fn cancel_leaves_tray_untouched() {
        let mut t = tray(&["A", "B", "C"]);
        t.begin_move(2);
        assert_eq!(t.dragging(), Some(2));
        assert_eq!(t.cancel_move(), Some(2));
        assert_eq!(t.drag, DragState::Idle);
        assert_eq!(t.icons(), &["A", "B", "C"]);
        // A drop after cancel does nothing
        assert_eq!(t.complete_move(0), None);
        assert_eq!(t.icons(), &["A", "B", "C"]);
    }

    #[test]
    fn second_begin_replaces_source() {
        let mut t = tray(&["A", "B", "C"]);
        t.begin_move(0);
        t.begin_move(2);
        t.complete_move(0);
        assert_eq!(t.icons(), &["C", "A", "B"]);
    }

    #[test]
    fn move_sequences_preserve_multiset() {
        let start = ["🐶", "🐱", "🐼", "🦊", "🦁", "🐯", "🐮"];
        let mut t = tray(&start);
        let n = start.len();
        // Deterministic sweep over many (source, target) pairs
        for k in 0..200usize {
            let src = (k * 5 + 1) % n;
            let dst = (k * 3 + 2) % n;
            t.begin_move(src);
            t.complete_move(dst);
            assert_eq!(t.len(), n);
            assert_eq!(multiset(t.icons()), multiset(&start));
        }
    }
}
