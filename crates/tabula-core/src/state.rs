// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::filter::{FilterState, FilterValue};
use crate::ids::RecordId;
use crate::model::{Record, Schema};
use crate::paginate::PaginationState;
use crate::selection::SelectionSet;
use crate::sort::SortState;
use crate::view::{View, compute_view};

/// Collapsed/expanded filter panel with per-field dropdowns that open and
/// close independently of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPanel {
    expanded: bool,
    open_dropdowns: BTreeSet<String>,
}

impl FilterPanel {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_open(&self, field: &str) -> bool {
        self.open_dropdowns.contains(field)
    }

    pub fn open_dropdowns(&self) -> impl Iterator<Item = &str> {
        self.open_dropdowns.iter().map(String::as_str)
    }

    /// Collapsing also closes every dropdown. Returns the new expansion.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        if !self.expanded {
            self.open_dropdowns.clear();
        }
        self.expanded
    }

    /// Returns whether the dropdown is now open.
    pub fn toggle_dropdown(&mut self, field: &str) -> bool {
        self.expanded = true;
        if self.open_dropdowns.remove(field) {
            false
        } else {
            self.open_dropdowns.insert(field.to_owned());
            true
        }
    }

    pub fn close_dropdown(&mut self, field: &str) -> bool {
        self.open_dropdowns.remove(field)
    }

    pub fn close_all(&mut self) -> bool {
        let any_open = !self.open_dropdowns.is_empty();
        self.open_dropdowns.clear();
        any_open
    }
}

/// What an external dispatcher should do with the selected records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkAction {
    Resolve,
    Reject,
    Escalate,
    Assign,
}

impl BulkAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Reject => "reject",
            Self::Escalate => "escalate",
            Self::Assign => "assign",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "resolve" => Some(Self::Resolve),
            "reject" => Some(Self::Reject),
            "escalate" => Some(Self::Escalate),
            "assign" => Some(Self::Assign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRequest {
    pub action: BulkAction,
    pub ids: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub filters: FilterState,
    pub sort: SortState,
    pub pagination: PaginationState,
    pub selection: SelectionSet,
    pub panel: FilterPanel,
    total_pages: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            sort: SortState::default(),
            pagination: PaginationState::default(),
            selection: SelectionSet::default(),
            panel: FilterPanel::default(),
            total_pages: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableCommand {
    SetFilter { name: String, value: FilterValue },
    ClearFilter(String),
    ClearFilters,
    SortBy(String),
    ClearSort,
    GoToPage(usize),
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    SetPageSize(usize),
    ToggleSelect(RecordId),
    ToggleSelectAllOnPage(Vec<RecordId>),
    ClearSelection,
    PruneSelection(Vec<RecordId>),
    CompleteBulkAction,
    TogglePanel,
    ToggleDropdown(String),
    OutsideClick,
    SelectOption { field: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    FiltersChanged,
    SortChanged,
    PageChanged(usize),
    PageSizeChanged(usize),
    SelectionChanged(usize),
    PanelChanged,
    StatusUpdated(String),
}

impl TableState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            pagination: PaginationState::new(1, page_size),
            ..Self::default()
        }
    }

    /// Page count of the most recent [`TableState::view`].
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Recomputes the view and keeps the clamped page, so a page number
    /// from an older, larger result never survives a recomputation.
    pub fn view<'r, R: Record>(&mut self, records: &'r [R], schema: &Schema) -> View<'r, R> {
        let view = compute_view(
            records,
            schema,
            &self.filters,
            &self.sort,
            self.pagination,
            &self.selection,
        );
        self.pagination = view.pagination();
        self.total_pages = view.total_pages;
        view
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.ids().collect()
    }

    pub fn bulk_request(&self, action: BulkAction) -> Option<BulkRequest> {
        if self.selection.is_empty() {
            return None;
        }
        Some(BulkRequest {
            action,
            ids: self.selected_ids(),
        })
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        tracing::trace!(?command, "table command");
        match command {
            TableCommand::SetFilter { name, value } => self.set_filter(name, value),
            TableCommand::ClearFilter(name) => match self.filters.remove(&name) {
                Some(_) => vec![
                    TableEvent::FiltersChanged,
                    status(format!("filter {name} cleared")),
                ],
                None => Vec::new(),
            },
            TableCommand::ClearFilters => {
                if self.filters.is_empty() {
                    return Vec::new();
                }
                self.filters.clear();
                vec![
                    TableEvent::FiltersChanged,
                    status("filters cleared".to_owned()),
                ]
            }
            TableCommand::SortBy(key) => {
                let direction = self.sort.toggle(&key);
                vec![
                    TableEvent::SortChanged,
                    status(format!("sort {key} {}", direction.as_str())),
                ]
            }
            TableCommand::ClearSort => {
                if !self.sort.is_active() {
                    return Vec::new();
                }
                self.sort.clear();
                vec![
                    TableEvent::SortChanged,
                    status("sort cleared".to_owned()),
                ]
            }
            TableCommand::GoToPage(page) => self.move_page(|pagination, _| pagination.go_to(page)),
            TableCommand::NextPage => {
                self.move_page(|pagination, total_pages| pagination.next_page(total_pages))
            }
            TableCommand::PrevPage => self.move_page(|pagination, _| pagination.prev_page()),
            TableCommand::FirstPage => self.move_page(|pagination, _| pagination.first_page()),
            TableCommand::LastPage => {
                self.move_page(|pagination, total_pages| pagination.last_page(total_pages))
            }
            TableCommand::SetPageSize(size) => {
                if !self.pagination.set_page_size(size) {
                    return Vec::new();
                }
                let size = self.pagination.page_size();
                vec![
                    TableEvent::PageSizeChanged(size),
                    TableEvent::PageChanged(1),
                    status(format!("page size {size}")),
                ]
            }
            TableCommand::ToggleSelect(id) => {
                let selected = self.selection.toggle(id);
                let label = if selected {
                    format!("selected {id}")
                } else {
                    format!("deselected {id}")
                };
                self.selection_events(label)
            }
            TableCommand::ToggleSelectAllOnPage(page_ids) => {
                if page_ids.is_empty() {
                    return Vec::new();
                }
                let label = if self.selection.toggle_all_on_page(&page_ids) {
                    "page selected"
                } else {
                    "page deselected"
                };
                self.selection_events(label.to_owned())
            }
            TableCommand::ClearSelection => {
                if self.selection.is_empty() {
                    return Vec::new();
                }
                self.selection.clear();
                self.selection_events("selection cleared".to_owned())
            }
            TableCommand::PruneSelection(live_ids) => {
                let removed = self.selection.prune(live_ids);
                if removed == 0 {
                    return Vec::new();
                }
                self.selection_events(format!("pruned {removed}"))
            }
            TableCommand::CompleteBulkAction => {
                self.selection.clear();
                self.selection_events("bulk action done".to_owned())
            }
            TableCommand::TogglePanel => {
                let label = if self.panel.toggle() {
                    "filters shown"
                } else {
                    "filters hidden"
                };
                vec![TableEvent::PanelChanged, status(label.to_owned())]
            }
            TableCommand::ToggleDropdown(field) => {
                self.panel.toggle_dropdown(&field);
                vec![TableEvent::PanelChanged]
            }
            TableCommand::OutsideClick => {
                if self.panel.close_all() {
                    vec![TableEvent::PanelChanged]
                } else {
                    Vec::new()
                }
            }
            TableCommand::SelectOption { field, value } => {
                self.panel.close_dropdown(&field);
                let mut events = vec![TableEvent::PanelChanged];
                events.extend(self.set_filter(field, FilterValue::Text(value)));
                events
            }
        }
    }

    fn set_filter(&mut self, name: String, value: FilterValue) -> Vec<TableEvent> {
        let label = if value.is_inert() {
            format!("filter {name} cleared")
        } else {
            format!("filter {name} = {}", value.display())
        };
        if !self.filters.set(name, value) {
            return Vec::new();
        }
        vec![TableEvent::FiltersChanged, status(label)]
    }

    fn move_page(
        &mut self,
        step: impl FnOnce(&mut PaginationState, usize),
    ) -> Vec<TableEvent> {
        let before = self.pagination.page();
        step(&mut self.pagination, self.total_pages);
        let page = self.pagination.page();
        if page == before {
            return Vec::new();
        }
        vec![
            TableEvent::PageChanged(page),
            status(format!("page {page}")),
        ]
    }

    fn selection_events(&mut self, label: String) -> Vec<TableEvent> {
        vec![
            TableEvent::SelectionChanged(self.selection.len()),
            status(label),
        ]
    }
}

fn status(message: String) -> TableEvent {
    TableEvent::StatusUpdated(message)
}
