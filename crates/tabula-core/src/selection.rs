// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::RecordId;

/// Selected record ids. Knows nothing about records, filters or pages, so a
/// selection survives every view change until someone clears or prunes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ascending id order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.ids.iter().copied()
    }

    pub fn select(&mut self, id: RecordId) -> bool {
        self.ids.insert(id)
    }

    pub fn deselect(&mut self, id: RecordId) -> bool {
        self.ids.remove(&id)
    }

    /// Returns the new membership of `id`.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Page-scoped select-all: a fully selected page is deselected,
    /// anything else selects the whole page. Ids off the page are untouched.
    /// Returns whether the page ended up selected.
    pub fn toggle_all_on_page(&mut self, page_ids: &[RecordId]) -> bool {
        if page_ids.is_empty() {
            return false;
        }
        if self.is_all_on_page_selected(page_ids) {
            for id in page_ids {
                self.ids.remove(id);
            }
            false
        } else {
            self.ids.extend(page_ids.iter().copied());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_all_on_page_selected(&self, page_ids: &[RecordId]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.ids.contains(id))
    }

    pub fn is_any_on_page_selected(&self, page_ids: &[RecordId]) -> bool {
        page_ids.iter().any(|id| self.ids.contains(id))
    }

    /// Drops ids that are no longer in the collection. Callers run this
    /// after replacing their records; nothing prunes implicitly.
    pub fn prune<I>(&mut self, live_ids: I) -> usize
    where
        I: IntoIterator<Item = RecordId>,
    {
        let live: BTreeSet<RecordId> = live_ids.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| live.contains(id));
        before - self.ids.len()
    }

    /// Selected ids outside `visible_ids`, e.g. hidden by the current filters.
    pub fn hidden_count<I>(&self, visible_ids: I) -> usize
    where
        I: IntoIterator<Item = RecordId>,
    {
        let visible: BTreeSet<RecordId> = visible_ids.into_iter().collect();
        self.ids.iter().filter(|id| !visible.contains(id)).count()
    }
}

impl FromIterator<RecordId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = RecordId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;
    use crate::ids::RecordId;

    fn ids(values: &[i64]) -> Vec<RecordId> {
        values.iter().copied().map(RecordId::new).collect()
    }

    fn members(selection: &SelectionSet) -> Vec<i64> {
        selection.ids().map(RecordId::get).collect()
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(RecordId::new(7)));
        assert!(selection.contains(RecordId::new(7)));
        assert!(!selection.toggle(RecordId::new(7)));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_selects_partial_page() {
        let mut selection: SelectionSet = ids(&[1]).into_iter().collect();
        assert!(selection.toggle_all_on_page(&ids(&[1, 2, 3])));
        assert_eq!(members(&selection), vec![1, 2, 3]);
    }

    #[test]
    fn toggle_all_deselects_full_page_only() {
        let mut selection: SelectionSet = ids(&[1, 2, 6, 7]).into_iter().collect();
        assert!(!selection.toggle_all_on_page(&ids(&[6, 7])));
        assert_eq!(members(&selection), vec![1, 2]);
    }

    #[test]
    fn toggle_all_on_empty_page_is_noop() {
        let mut selection: SelectionSet = ids(&[4]).into_iter().collect();
        assert!(!selection.toggle_all_on_page(&[]));
        assert_eq!(members(&selection), vec![4]);
    }

    #[test]
    fn all_on_page_requires_non_empty_page() {
        let selection: SelectionSet = ids(&[1, 2]).into_iter().collect();
        assert!(!selection.is_all_on_page_selected(&[]));
        assert!(selection.is_all_on_page_selected(&ids(&[2, 1])));
        assert!(!selection.is_all_on_page_selected(&ids(&[1, 3])));
        assert!(selection.is_any_on_page_selected(&ids(&[1, 3])));
        assert!(!selection.is_any_on_page_selected(&ids(&[3])));
    }

    #[test]
    fn prune_keeps_live_ids() {
        let mut selection: SelectionSet = ids(&[2, 4, 9]).into_iter().collect();
        let removed = selection.prune(ids(&[1, 2, 3, 4]));
        assert_eq!(removed, 1);
        assert_eq!(members(&selection), vec![2, 4]);
    }

    #[test]
    fn hidden_count_counts_selected_outside_view() {
        let selection: SelectionSet = ids(&[2, 4]).into_iter().collect();
        assert_eq!(selection.hidden_count(ids(&[1, 2, 3])), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut selection: SelectionSet = ids(&[1, 2, 3]).into_iter().collect();
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn serializes_as_plain_id_list() -> anyhow::Result<()> {
        let selection: SelectionSet = ids(&[3, 1]).into_iter().collect();
        assert_eq!(serde_json::to_string(&selection)?, "[1,3]");
        Ok(())
    }
}
