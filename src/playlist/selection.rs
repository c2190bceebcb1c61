//! Multi-selection with shift-click range support.
//!
//! Ranges are always computed over the visible list (filtered, sorted and
//! paginated), never over the full collection, so hidden entries are never
//! touched by a range click.

use std::collections::HashSet;

use crate::model::PlaylistItemId;

/// Aggregate checkbox state over the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    None,
    Partial,
    All,
}

/// Selection set plus the anchor for range clicks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<PlaylistItemId>,
    /// Most recently clicked row, if range continuity is intact
    anchor: Option<PlaylistItemId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<&PlaylistItemId> {
        self.anchor.as_ref()
    }

    pub fn is_selected(&self, id: &PlaylistItemId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistItemId> {
        self.selected.iter()
    }

    /// Handle a click on a row's checkbox.
    ///
    /// A plain click toggles the row. A shift-click with an anchor that is
    /// visible and differs from the clicked row toggles the row and then
    /// applies its new state to every visible row between anchor and target
    /// (inclusive). Either way the clicked row becomes the anchor.
    ///
    /// Returns the clicked row's resulting state. Clicks on rows that are not
    /// visible are ignored and return the current state unchanged.
    pub fn click(&mut self, id: &PlaylistItemId, shift: bool, visible: &[PlaylistItemId]) -> bool {
        let Some(target_index) = visible.iter().position(|v| v == id) else {
            tracing::debug!(target: "playlist::selection", "Ignoring click on hidden row {}", id);
            return self.is_selected(id);
        };

        let checked = !self.is_selected(id);

        let anchor_index = if shift {
            self.anchor
                .as_ref()
                .filter(|a| *a != id)
                .and_then(|a| visible.iter().position(|v| v == a))
        } else {
            None
        };

        match anchor_index {
            Some(anchor_index) => {
                let (start, end) = if anchor_index <= target_index {
                    (anchor_index, target_index)
                } else {
                    (target_index, anchor_index)
                };
                for row in &visible[start..=end] {
                    self.set(row, checked);
                }
                tracing::debug!(
                    target: "playlist::selection",
                    "Range {}..={} set to {}",
                    start,
                    end,
                    checked
                );
            }
            None => self.set(id, checked),
        }

        self.anchor = Some(id.clone());
        checked
    }

    /// Set every visible row to `checked`; breaks range continuity.
    pub fn set_all(&mut self, visible: &[PlaylistItemId], checked: bool) {
        for row in visible {
            self.set(row, checked);
        }
        self.anchor = None;
    }

    /// Drop rows that are no longer visible and reset the anchor.
    pub fn retain_visible(&mut self, visible: &[PlaylistItemId]) {
        let visible: HashSet<&PlaylistItemId> = visible.iter().collect();
        self.selected.retain(|id| visible.contains(id));
        self.anchor = None;
    }

    /// Drop rows that are no longer visible. The anchor survives if it is
    /// still visible.
    pub fn prune_to(&mut self, visible: &[PlaylistItemId]) {
        let visible: HashSet<&PlaylistItemId> = visible.iter().collect();
        self.selected.retain(|id| visible.contains(id));
        if self.anchor.as_ref().is_some_and(|a| !visible.contains(a)) {
            self.anchor = None;
        }
    }

    /// Forget removed rows; the anchor goes too if it was one of them.
    pub fn remove<'a>(&mut self, ids: impl IntoIterator<Item = &'a PlaylistItemId>) {
        for id in ids {
            self.selected.remove(id);
            if self.anchor.as_ref() == Some(id) {
                self.anchor = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Checkbox state for the "select all" control.
    pub fn select_all_state(&self, visible: &[PlaylistItemId]) -> SelectAllState {
        let checked = visible.iter().filter(|id| self.is_selected(id)).count();
        if checked == 0 {
            SelectAllState::None
        } else if checked == visible.len() {
            SelectAllState::All
        } else {
            SelectAllState::Partial
        }
    }

    fn set(&mut self, id: &PlaylistItemId, checked: bool) {
        if checked {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{item, items};

    fn selected_sorted(selection: &Selection) -> Vec<PlaylistItemId> {
        let mut ids: Vec<_> = selection.iter().cloned().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_plain_click_toggles_and_sets_anchor() {
        let visible = items(1..=5);
        let mut selection = Selection::new();

        assert!(selection.click(&item(2), false, &visible));
        assert!(selection.is_selected(&item(2)));
        assert_eq!(selection.anchor(), Some(&item(2)));

        assert!(!selection.click(&item(2), false, &visible));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_shift_click_selects_range_either_direction() {
        let visible = items(1..=6);
        let mut selection = Selection::new();

        selection.click(&item(5), false, &visible);
        selection.click(&item(2), true, &visible);

        assert_eq!(selected_sorted(&selection), items(2..=5));
        assert_eq!(selection.anchor(), Some(&item(2)));
    }

    #[test]
    fn test_shift_click_applies_target_state_to_range() {
        let visible = items(1..=5);
        let mut selection = Selection::new();
        selection.set_all(&visible, true);

        // Anchor on 1 (unchecks it), then shift-click 4 which becomes unchecked
        selection.click(&item(1), false, &visible);
        let state = selection.click(&item(4), true, &visible);

        assert!(!state);
        assert_eq!(selected_sorted(&selection), vec![item(5)]);
    }

    #[test]
    fn test_shift_click_without_anchor_is_plain_click() {
        let visible = items(1..=5);
        let mut selection = Selection::new();

        selection.click(&item(3), true, &visible);

        assert_eq!(selected_sorted(&selection), vec![item(3)]);
    }

    #[test]
    fn test_shift_click_on_anchor_itself_is_plain_click() {
        let visible = items(1..=5);
        let mut selection = Selection::new();

        selection.click(&item(3), false, &visible);
        selection.click(&item(3), true, &visible);

        assert!(selection.is_empty());
    }

    #[test]
    fn test_shift_click_with_hidden_anchor_degrades_to_plain_click() {
        let mut selection = Selection::new();
        selection.click(&item(1), false, &items(1..=5));

        // Anchor (1) is filtered out of the new visible list
        selection.click(&item(4), true, &items(3..=5));

        assert_eq!(selected_sorted(&selection), vec![item(1), item(4)]);
    }

    #[test]
    fn test_range_over_filtered_list_skips_hidden_rows() {
        // Visible rows are the odd ids; 2, 4, 6, 8 are hidden between them
        let visible = items([1, 3, 5, 7, 9, 11, 13, 15, 17, 19]);
        let mut selection = Selection::new();

        selection.click(&item(1), false, &visible);
        selection.click(&item(19), true, &visible);

        assert_eq!(selection.len(), 10);
        for hidden in [2, 4, 6, 8, 10] {
            assert!(!selection.is_selected(&item(hidden)));
        }
    }

    #[test]
    fn test_click_on_hidden_row_is_ignored() {
        let mut selection = Selection::new();
        assert!(!selection.click(&item(9), false, &items(1..=3)));
        assert!(selection.is_empty());
        assert!(selection.anchor().is_none());
    }

    #[test]
    fn test_set_all_resets_anchor() {
        let visible = items(1..=3);
        let mut selection = Selection::new();
        selection.click(&item(1), false, &visible);

        selection.set_all(&visible, true);

        assert_eq!(selection.len(), 3);
        assert!(selection.anchor().is_none());
        assert_eq!(selection.select_all_state(&visible), SelectAllState::All);

        selection.set_all(&visible, false);
        assert_eq!(selection.select_all_state(&visible), SelectAllState::None);
    }

    #[test]
    fn test_retain_visible_prunes_hidden_rows() {
        let mut selection = Selection::new();
        selection.set_all(&items(1..=4), true);
        selection.click(&item(4), false, &items(1..=4));

        selection.retain_visible(&items(1..=2));

        assert_eq!(selected_sorted(&selection), items(1..=2));
        assert!(selection.anchor().is_none());
    }

    #[test]
    fn test_prune_to_keeps_visible_anchor() {
        let mut selection = Selection::new();
        selection.click(&item(1), false, &items(1..=4));
        selection.click(&item(3), false, &items(1..=4));

        selection.prune_to(&items(2..=4));

        assert_eq!(selected_sorted(&selection), vec![item(3)]);
        assert_eq!(selection.anchor(), Some(&item(3)));

        selection.prune_to(&items(1..=2));
        assert!(selection.is_empty());
        assert!(selection.anchor().is_none());
    }

    #[test]
    fn test_remove_prunes_selection_and_anchor() {
        let visible = items(1..=3);
        let mut selection = Selection::new();
        selection.click(&item(1), false, &visible);
        selection.click(&item(2), false, &visible);

        selection.remove(&[item(2)]);

        assert_eq!(selected_sorted(&selection), vec![item(1)]);
        assert!(selection.anchor().is_none());
        assert_eq!(selection.select_all_state(&visible), SelectAllState::Partial);
    }
}
