// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::{FilterState, filter_records};
use crate::ids::RecordId;
use crate::model::{Record, Schema};
use crate::paginate::{PageSummary, PaginationState, paginate};
use crate::selection::SelectionSet;
use crate::sort::{SortState, sort_records};

/// One recomputed page of a table. Derived from its inputs every time and
/// never edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'r, R> {
    pub page_records: Vec<&'r R>,
    pub total_records: usize,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub all_on_page_selected: bool,
    pub some_on_page_selected: bool,
    pub selected_count: usize,
    /// Selected ids the current filters hide.
    pub hidden_selected_count: usize,
}

impl<R: Record> View<'_, R> {
    pub fn page_ids(&self) -> Vec<RecordId> {
        self.page_records.iter().map(|record| record.id()).collect()
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary::new(self.total_filtered, self.current_page, self.page_size)
    }

    /// The pagination that produced this view, page already clamped.
    pub fn pagination(&self) -> PaginationState {
        PaginationState::new(self.current_page, self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.page_records.is_empty()
    }
}

/// Filter, then sort, then paginate, then read the selection against the
/// visible page.
pub fn compute_view<'r, R: Record>(
    records: &'r [R],
    schema: &Schema,
    filters: &FilterState,
    sort: &SortState,
    pagination: PaginationState,
    selection: &SelectionSet,
) -> View<'r, R> {
    let filtered = filter_records(records, filters, schema);
    let total_filtered = filtered.len();
    let sorted = sort_records(&filtered, sort, schema);
    let pagination = pagination.clamped(total_filtered);
    let page = paginate(&sorted, pagination);

    let page_ids: Vec<RecordId> = page.records.iter().map(|record| record.id()).collect();
    let view = View {
        all_on_page_selected: selection.is_all_on_page_selected(&page_ids),
        some_on_page_selected: selection.is_any_on_page_selected(&page_ids),
        selected_count: selection.len(),
        hidden_selected_count: selection.hidden_count(filtered.iter().map(|record| record.id())),
        page_records: page.records,
        total_records: records.len(),
        total_filtered,
        total_pages: page.total_pages,
        current_page: page.current_page,
        page_size: pagination.page_size(),
    };

    tracing::debug!(
        total = view.total_records,
        filtered = view.total_filtered,
        page = view.current_page,
        total_pages = view.total_pages,
        page_size = view.page_size,
        selected = view.selected_count,
        hidden = view.hidden_selected_count,
        "view recomputed"
    );
    view
}

#[cfg(test)]
mod tests {
    use super::compute_view;
    use crate::filter::{FilterState, FilterValue};
    use crate::ids::RecordId;
    use crate::model::{FieldDescriptor, FieldKind, FieldRef, Record, Schema};
    use crate::paginate::PaginationState;
    use crate::selection::SelectionSet;
    use crate::sort::{SortDirection, SortState};

    struct Row {
        id: i64,
        status: &'static str,
    }

    impl Record for Row {
        fn id(&self) -> RecordId {
            RecordId::new(self.id)
        }

        fn field(&self, name: &str) -> Option<FieldRef<'_>> {
            match name {
                "id" => Some(FieldRef::Number(self.id as f64)),
                "status" => Some(FieldRef::Category(self.status)),
                _ => None,
            }
        }
    }

    const FIELDS: [FieldDescriptor; 2] = [
        FieldDescriptor::new("id", "ID", FieldKind::Number),
        FieldDescriptor::new("status", "Status", FieldKind::Category),
    ];
    const SCHEMA: Schema = Schema::new(&FIELDS, &[]);

    fn rows() -> Vec<Row> {
        ["pending", "resolved", "pending", "rejected", "pending"]
            .into_iter()
            .enumerate()
            .map(|(index, status)| Row {
                id: index as i64 + 1,
                status,
            })
            .collect()
    }

    fn ids(records: &[&Row]) -> Vec<i64> {
        records.iter().map(|row| row.id).collect()
    }

    #[test]
    fn pending_sorted_desc_across_two_pages() {
        let data = rows();
        let filters = FilterState::new().with("status", FilterValue::text("pending"));
        let sort = SortState::by("id", SortDirection::Desc);
        let selection = SelectionSet::new();

        let first = compute_view(
            &data,
            &SCHEMA,
            &filters,
            &sort,
            PaginationState::new(1, 2),
            &selection,
        );
        assert_eq!(ids(&first.page_records), vec![5, 3]);
        assert_eq!(first.total_filtered, 3);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.total_records, 5);

        let second = compute_view(
            &data,
            &SCHEMA,
            &filters,
            &sort,
            PaginationState::new(2, 2),
            &selection,
        );
        assert_eq!(ids(&second.page_records), vec![1]);
        assert_eq!(second.current_page, 2);
    }

    #[test]
    fn stale_page_is_clamped() {
        let data = rows();
        let filters = FilterState::new().with("status", FilterValue::text("rejected"));
        let view = compute_view(
            &data,
            &SCHEMA,
            &filters,
            &SortState::unsorted(),
            PaginationState::new(3, 2),
            &SelectionSet::new(),
        );
        assert_eq!(view.current_page, 1);
        assert_eq!(view.pagination(), PaginationState::new(1, 2));
        assert_eq!(ids(&view.page_records), vec![4]);
    }

    #[test]
    fn empty_result_is_single_empty_page() {
        let data = rows();
        let filters = FilterState::new().with("status", FilterValue::text("escalated"));
        let view = compute_view(
            &data,
            &SCHEMA,
            &filters,
            &SortState::unsorted(),
            PaginationState::new(4, 2),
            &[RecordId::new(1)].into_iter().collect(),
        );
        assert!(view.is_empty());
        assert_eq!((view.current_page, view.total_pages), (1, 1));
        assert!(!view.all_on_page_selected);
        assert_eq!(view.selected_count, 1);
        assert_eq!(view.hidden_selected_count, 1);
    }

    #[test]
    fn off_page_selection_is_not_hidden() {
        let data = rows();
        let filters = FilterState::new().with("status", FilterValue::text("pending"));
        let selection: SelectionSet = [1, 2, 5].into_iter().map(RecordId::new).collect();
        let view = compute_view(
            &data,
            &SCHEMA,
            &filters,
            &SortState::unsorted(),
            PaginationState::new(1, 1),
            &selection,
        );
        assert_eq!(ids(&view.page_records), vec![1]);
        assert_eq!(view.selected_count, 3);
        assert_eq!(view.hidden_selected_count, 1);
    }

    #[test]
    fn select_all_flag_reflects_current_page() {
        let data = rows();
        let selection: SelectionSet = [1, 2].into_iter().map(RecordId::new).collect();
        let view = compute_view(
            &data,
            &SCHEMA,
            &FilterState::new(),
            &SortState::unsorted(),
            PaginationState::new(1, 2),
            &selection,
        );
        assert!(view.all_on_page_selected);
        assert!(view.some_on_page_selected);

        let next = compute_view(
            &data,
            &SCHEMA,
            &FilterState::new(),
            &SortState::unsorted(),
            PaginationState::new(2, 2),
            &selection,
        );
        assert!(!next.all_on_page_selected);
        assert!(!next.some_on_page_selected);
        assert_eq!(next.summary().to_string(), "page 2/3 | showing 3-4 of 5");
    }
}
