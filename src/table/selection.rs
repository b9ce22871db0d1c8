use std::collections::HashSet;

use crate::models::ServiceId;

/// Set of selected record ids. The owner keeps it a subset of the loaded
/// universe by calling `retain_universe` whenever the store changes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: HashSet<ServiceId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &ServiceId) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    /// Clear the selection when everything is selected, otherwise select the
    /// whole universe (not just the visible page).
    pub fn toggle_all<'a, I>(&mut self, universe: I)
    where
        I: IntoIterator<Item = &'a ServiceId>,
    {
        let universe: HashSet<ServiceId> = universe.into_iter().cloned().collect();
        if self.all_selected(&universe) {
            self.selected.clear();
        } else {
            self.selected = universe;
        }
    }

    /// True only when the selection covers every id of a non-empty universe.
    pub fn all_selected(&self, universe: &HashSet<ServiceId>) -> bool {
        !universe.is_empty()
            && !self.selected.is_empty()
            && self.selected.len() == universe.len()
            && self.selected.iter().all(|id| universe.contains(id))
    }

    /// Drop ids that are no longer loaded.
    pub fn retain_universe(&mut self, universe: &HashSet<ServiceId>) {
        self.selected.retain(|id| universe.contains(id));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: &ServiceId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<ServiceId> {
        raw.iter().copied().map(ServiceId::from).collect()
    }

    #[test]
    fn toggle_flips_membership() {
        let mut tracker = SelectionTracker::new();
        let id = ServiceId::from(1);

        assert!(tracker.toggle(&id));
        assert!(tracker.contains(&id));
        assert!(!tracker.toggle(&id));
        assert!(tracker.is_empty());
    }

    #[test]
    fn all_selected_tracks_universe() {
        let universe: HashSet<ServiceId> = ids(&[1, 2]).into_iter().collect();
        let mut tracker = SelectionTracker::new();

        tracker.toggle(&ServiceId::from(2));
        assert!(!tracker.all_selected(&universe));
        tracker.toggle(&ServiceId::from(1));
        assert!(tracker.all_selected(&universe));
    }

    #[test]
    fn empty_universe_is_never_all_selected() {
        let tracker = SelectionTracker::new();
        assert!(!tracker.all_selected(&HashSet::new()));
    }

    #[test]
    fn toggle_all_twice_restores_selection() {
        let universe = ids(&[1, 2, 3]);
        let mut tracker = SelectionTracker::new();

        tracker.toggle_all(&universe);
        assert_eq!(tracker.len(), 3);
        tracker.toggle_all(&universe);
        assert!(tracker.is_empty());

        tracker.toggle_all(&universe);
        let full = tracker.clone();
        tracker.toggle_all(&universe);
        tracker.toggle_all(&universe);
        assert_eq!(tracker, full);
    }

    #[test]
    fn toggle_all_from_partial_selects_everything() {
        let universe = ids(&[1, 2, 3]);
        let mut tracker = SelectionTracker::new();
        tracker.toggle(&universe[0]);

        tracker.toggle_all(&universe);
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn stale_ids_do_not_count_towards_all_selected() {
        let universe: HashSet<ServiceId> = ids(&[1, 2]).into_iter().collect();
        let mut tracker = SelectionTracker::new();
        tracker.toggle(&ServiceId::from(1));
        tracker.toggle(&ServiceId::from(9));

        assert!(!tracker.all_selected(&universe));
        tracker.retain_universe(&universe);
        assert_eq!(tracker.len(), 1);
    }
}
