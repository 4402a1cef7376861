// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page and page size, both kept at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    page: usize,
    page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = clamp_page(self.page.saturating_add(1), total_pages);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn last_page(&mut self, total_pages: usize) {
        self.page = total_pages.max(1);
    }

    /// A new page size always starts over at page 1. Returns whether the
    /// size changed.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.page = 1;
        true
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    /// This state with its page pulled into range for `total_items`.
    pub fn clamped(self, total_items: usize) -> Self {
        Self {
            page: clamp_page(self.page, total_pages(total_items, self.page_size)),
            page_size: self.page_size,
        }
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total_pages: usize,
    pub current_page: usize,
}

pub fn paginate<T: Clone>(items: &[T], state: PaginationState) -> Page<T> {
    let page_size = state.page_size().max(1);
    let total_pages = total_pages(items.len(), page_size);
    let current_page = clamp_page(state.page(), total_pages);

    let start = (current_page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Page {
        records: items[start..end].to_vec(),
        total_pages,
        current_page,
    }
}

/// Pager text data: which 1-based items the page shows and where it can go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub total_items: usize,
    pub first_item: usize,
    pub last_item: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageSummary {
    pub fn new(total_items: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(total_items, page_size);
        let current_page = clamp_page(page, total_pages);
        let (first_item, last_item) = if total_items == 0 {
            (0, 0)
        } else {
            let first = (current_page - 1).saturating_mul(page_size) + 1;
            (first, first.saturating_add(page_size - 1).min(total_items))
        };
        Self {
            total_items,
            first_item,
            last_item,
            current_page,
            total_pages,
            has_prev: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_items == 0 {
            return write!(f, "page 1/1 | no records");
        }
        write!(
            f,
            "page {}/{} | showing {}-{} of {}",
            self.current_page, self.total_pages, self.first_item, self.last_item, self.total_items
        )
    }
}
